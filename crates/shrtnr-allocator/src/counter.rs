use crate::Allocator;
use async_trait::async_trait;
use shrtnr_core::{KeySpace, KeyValueStore, StoreError};
use std::num::NonZeroU64;
use tracing::trace;

/// An allocator backed by the store's atomic increment.
///
/// All processes sharing the store and the [`KeySpace`] draw from the same
/// counter. The store's `INCR` is the only synchronization; nothing is cached
/// locally.
#[derive(Debug, Clone)]
pub struct CounterAllocator<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CounterAllocator<S> {
    pub fn new(store: S, keys: &KeySpace) -> Self {
        Self {
            store,
            key: keys.counter(),
        }
    }

    /// The store key of the counter.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl<S: KeyValueStore> Allocator for CounterAllocator<S> {
    async fn next(&self) -> Result<NonZeroU64, StoreError> {
        let value = self.store.incr(&self.key).await?;
        trace!(counter = %self.key, id = value, "Allocated id");

        NonZeroU64::new(value).ok_or_else(|| {
            StoreError::InvalidData(format!("counter '{}' returned zero", self.key))
        })
    }
}
