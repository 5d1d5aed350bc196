use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// Result type for key-value store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The subset of a key-value store the shortener relies on.
///
/// Each call must be atomic for its own key. Nothing is assumed across keys:
/// callers that touch two keys do so with two calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// A missing key counts as zero, so the first call returns 1.
    async fn incr(&self, key: &str) -> Result<u64>;

    /// Reads one field of the hash at `key`.
    ///
    /// Returns `Ok(None)` if the key or the field does not exist or has expired.
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Writes one field of the hash at `key`.
    ///
    /// With `Some(ttl)` the whole key expires after `ttl`; with `None` any
    /// existing expiry is left as it is.
    async fn hset(&self, key: &str, field: &str, value: &str, ttl: Option<Duration>)
        -> Result<()>;

    /// Writes one field of the hash at `key` only if the field is not set yet.
    ///
    /// Returns `true` if the value was written. The expiry is applied only
    /// when the write happened.
    async fn hset_nx(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool>;

    /// Removes `key`. Returns `true` if it existed.
    async fn del(&self, key: &str) -> Result<bool>;
}
