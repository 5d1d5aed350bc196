//! Core types and traits for the shrtnr URL shortener.
//!
//! This crate holds everything that does not touch a backend: the error
//! taxonomy, URL normalization, the short code codec, key naming, and the
//! contracts that the storage, allocator and shortener crates implement.

pub mod clock;
pub mod codec;
pub mod error;
pub mod shortcode;
pub mod shortener;
pub mod store;
pub mod urn;
pub mod validate;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CodecError, Result, ShortenerError, StoreError};
pub use shortcode::{LongUrl, Mapping, ShortCode};
pub use shortener::{ExpirationPolicy, ShortenParams, Shortener};
pub use store::KeyValueStore;
pub use urn::KeySpace;
pub use validate::{normalize, NormalizedUrl};
