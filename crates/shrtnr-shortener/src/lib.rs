//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], which composes the validator,
//! codec, allocator and mapping store into the [`Shortener`] operations. Core
//! types are re-exported from `shrtnr_core`.

pub mod service;

pub use service::ShortenerService;
pub use shrtnr_core::{
    ExpirationPolicy, LongUrl, Mapping, ShortCode, ShortenParams, Shortener, ShortenerError,
};
