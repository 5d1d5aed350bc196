//! Base58 codec between allocated ids and short codes.
//!
//! The alphabet drops the glyphs that are easy to misread (`0`, `O`, `I`, `l`)
//! and puts lowercase first, so small ids produce lowercase codes.

use crate::error::CodecError;
use bs58::Alphabet;

/// The 58 characters a short code may contain, in digit order.
pub const ALPHABET_CHARS: &[u8; 58] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ123456789";

static ALPHABET: Alphabet = Alphabet::new_unwrap(ALPHABET_CHARS);

/// Encodes `n` as a base58 string, most significant digit first.
///
/// `encode(0)` is the empty string. Allocated ids start at 1, so a live short
/// code is never empty.
pub fn encode(n: u64) -> String {
    let bytes = n.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bs58::encode(&bytes[first..])
        .with_alphabet(&ALPHABET)
        .into_string()
}

/// Decodes a short code back into the id it was encoded from.
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if let Some((index, character)) = code.chars().enumerate().find(|(_, c)| !is_alphabet(*c)) {
        return Err(CodecError::InvalidCharacter { character, index });
    }

    let bytes = bs58::decode(code)
        .with_alphabet(&ALPHABET)
        .into_vec()
        .map_err(|e| CodecError::Malformed(e.to_string()))?;

    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > 8 {
        return Err(CodecError::Overflow);
    }

    Ok(significant
        .iter()
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Returns `true` if `c` belongs to the short code alphabet.
pub fn is_alphabet(c: char) -> bool {
    c.is_ascii() && ALPHABET_CHARS.contains(&(c as u8))
}
