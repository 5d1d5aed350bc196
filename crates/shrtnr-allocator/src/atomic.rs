use crate::Allocator;
use async_trait::async_trait;
use shrtnr_core::StoreError;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

/// An allocator backed by an in-process atomic counter.
///
/// Ids are only unique within one instance, so this fits tests and the
/// single-process in-memory backend. Deployments sharing a store across
/// processes should use [`CounterAllocator`](crate::CounterAllocator).
#[derive(Debug, Default)]
pub struct AtomicAllocator {
    last: AtomicU64,
}

impl AtomicAllocator {
    /// Creates an allocator whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator whose first id is `last + 1`.
    ///
    /// Useful for resuming from a known state.
    pub fn with_offset(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

#[async_trait]
impl Allocator for AtomicAllocator {
    async fn next(&self) -> Result<NonZeroU64, StoreError> {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                last.checked_add(1)
            })
            .map_err(|_| StoreError::Operation("id space exhausted".to_string()))?;

        // previous + 1 cannot overflow, fetch_update just checked it
        NonZeroU64::new(previous + 1)
            .ok_or_else(|| StoreError::Operation("allocated id zero".to_string()))
    }
}
