use crate::codec;
use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::NonZeroU64;

/// A compact short code derived from an allocated id.
///
/// Codes built with [`ShortCode::from_id`] only contain characters of the
/// [codec alphabet](crate::codec::ALPHABET_CHARS). Codes built from caller
/// input with [`ShortCode::new`] are not checked: an unknown code is a lookup
/// miss, not a validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Encodes an allocated id as a short code.
    pub fn from_id(id: NonZeroU64) -> Self {
        Self(codec::encode(id.get()))
    }

    /// Wraps a code received from a caller or read back from the store.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Decodes the id this code was generated from.
    pub fn id(&self) -> Result<u64, CodecError> {
        codec::decode(&self.0)
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical serialization of a validated URL.
///
/// Produced by [`crate::validate::normalize`]; the only other way to build one
/// is [`LongUrl::new_unchecked`] for values read back from the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LongUrl(String);

impl LongUrl {
    pub(crate) fn from_canonical(url: String) -> Self {
        Self(url)
    }

    /// Wraps a canonical URL without re-validating it.
    ///
    /// Use this only for values that went through the validator before they
    /// were persisted.
    pub fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LongUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A long URL together with its short code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub long: LongUrl,
    pub short: ShortCode,
}
