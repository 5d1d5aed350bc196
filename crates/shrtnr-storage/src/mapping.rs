use shrtnr_core::urn::{LONG_FIELD, SHORT_FIELD};
use shrtnr_core::{KeySpace, KeyValueStore, LongUrl, Result, ShortCode, ShortenerError};
use std::time::Duration;
use tracing::{debug, trace};

/// Bidirectional long URL ⇄ short code records on top of a [`KeyValueStore`].
///
/// Each direction is its own hash record:
///
/// - `<ns>:long:<url>` with field `short`
/// - `<ns>:short:<code>` with field `long`
///
/// The two records are written and deleted with separate store calls. Between
/// those calls only one direction is visible, and that window is accepted.
#[derive(Debug, Clone)]
pub struct MappingStore<S> {
    store: S,
    keys: KeySpace,
}

impl<S: KeyValueStore> MappingStore<S> {
    pub fn new(store: S, keys: KeySpace) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes the long→short record.
    pub async fn put_long(
        &self,
        long: &LongUrl,
        short: &ShortCode,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.store
            .hset(&self.keys.long(long), SHORT_FIELD, short.as_str(), ttl)
            .await?;
        Ok(())
    }

    /// Writes the long→short record unless the long URL is already mapped.
    ///
    /// Returns `false` if another record got there first.
    pub async fn put_long_if_absent(
        &self,
        long: &LongUrl,
        short: &ShortCode,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let written = self
            .store
            .hset_nx(&self.keys.long(long), SHORT_FIELD, short.as_str(), ttl)
            .await?;
        Ok(written)
    }

    /// Writes the short→long record.
    pub async fn put_short(
        &self,
        short: &ShortCode,
        long: &LongUrl,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.store
            .hset(&self.keys.short(short), LONG_FIELD, long.as_str(), ttl)
            .await?;
        Ok(())
    }

    /// Reads the short code a long URL maps to.
    pub async fn get_long(&self, long: &LongUrl) -> Result<Option<ShortCode>> {
        let short = self.store.hget(&self.keys.long(long), SHORT_FIELD).await?;
        Ok(short.map(ShortCode::new))
    }

    /// Reads the long URL a short code maps to.
    pub async fn get_short(&self, short: &ShortCode) -> Result<Option<LongUrl>> {
        let long = self.store.hget(&self.keys.short(short), LONG_FIELD).await?;
        Ok(long.map(LongUrl::new_unchecked))
    }

    /// Removes both records of the mapping behind `short` and returns its long URL.
    ///
    /// The long record is only removed while it still points at `short`; if
    /// the long URL has meanwhile been mapped to a different code, that newer
    /// mapping is left alone.
    pub async fn delete_pair(&self, short: &ShortCode) -> Result<LongUrl> {
        let Some(long) = self.get_short(short).await? else {
            trace!(code = %short, "Nothing to delete");
            return Err(ShortenerError::ShortUrlNotFound(short.clone()));
        };

        self.store.del(&self.keys.short(short)).await?;

        match self.get_long(&long).await? {
            Some(current) if current == *short => {
                self.store.del(&self.keys.long(&long)).await?;
            }
            Some(current) => {
                debug!(code = %short, url = %long, current = %current, "Long record points elsewhere, keeping it");
            }
            None => {
                trace!(code = %short, url = %long, "Long record already gone");
            }
        }

        Ok(long)
    }
}
