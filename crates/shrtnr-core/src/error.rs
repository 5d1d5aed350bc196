use crate::shortcode::{LongUrl, ShortCode};
use thiserror::Error;

/// Result type for shortener operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Errors raised by a key-value backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors raised while decoding a short code back into its numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("decoded value does not fit in 64 bits")]
    Overflow,
    #[error("malformed short code: {0}")]
    Malformed(String),
}

/// Every failure a [`Shortener`](crate::Shortener) can surface to its caller.
///
/// Callers are expected to match on the variant: the not-found kinds map to a
/// miss, the validation kinds to bad input, and [`ShortenerError::Store`] to a
/// backend fault.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("link is too short: {length} characters, minimum is {min}")]
    LinkTooShort { length: usize, min: usize },
    #[error("link is too long: {length} characters, maximum is {max}")]
    LinkTooLong { length: usize, max: usize },
    #[error("not a valid url: {0}")]
    NotValidUrl(String),
    #[error("short link for \"{long}\" already exists: {short}")]
    ShortLinkAlreadyExists { long: LongUrl, short: ShortCode },
    #[error("long url \"{0}\" not found")]
    LongUrlNotFound(LongUrl),
    #[error("short url \"{0}\" not found")]
    ShortUrlNotFound(ShortCode),
    #[error("search query is too short: {length} characters, minimum is {min}")]
    SearchQueryTooShort { length: usize, min: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ShortenerError {
    /// Returns `true` for the lookup-miss kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShortenerError::LongUrlNotFound(_) | ShortenerError::ShortUrlNotFound(_)
        )
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ShortenerError::LinkTooShort { .. }
                | ShortenerError::LinkTooLong { .. }
                | ShortenerError::NotValidUrl(_)
                | ShortenerError::SearchQueryTooShort { .. }
        )
    }
}
