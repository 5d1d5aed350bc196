//! Identifier allocation for new short codes.
//!
//! Every short code is the base58 encoding of an id handed out by an
//! [`Allocator`]. Ids are unique and strictly increasing; an id whose mapping
//! never gets written is simply skipped, never handed out again.

pub mod atomic;
pub mod counter;

pub use atomic::AtomicAllocator;
pub use counter::CounterAllocator;

use async_trait::async_trait;
use shrtnr_core::StoreError;
use std::num::NonZeroU64;
use std::sync::Arc;

/// Source of unique ids.
///
/// Implementations must be safe to call from any number of tasks at once
/// without additional locking by the caller.
#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Returns the next id. Ids are never zero and never repeat.
    async fn next(&self) -> Result<NonZeroU64, StoreError>;
}

#[async_trait]
impl<A: Allocator + ?Sized> Allocator for Arc<A> {
    async fn next(&self) -> Result<NonZeroU64, StoreError> {
        (**self).next().await
    }
}
