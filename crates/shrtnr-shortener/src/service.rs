use async_trait::async_trait;
use shrtnr_allocator::{Allocator, CounterAllocator};
use shrtnr_core::{
    validate, KeySpace, KeyValueStore, LongUrl, Mapping, ShortCode, ShortenParams, Shortener,
    ShortenerError, StoreError,
};
use shrtnr_storage::MappingStore;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Search queries shorter than this, after trimming, are rejected.
pub const MIN_SEARCH_QUERY_LENGTH: usize = 2;

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service composes a [`MappingStore`] and an [`Allocator`]:
/// - URL validation and normalization
/// - id allocation and base58 encoding
/// - the two directional writes, reads and deletes
///
/// The service keeps no state of its own. Concurrent creates of the same URL
/// are settled by a conditional write on the long URL record: exactly one of
/// them maps the URL, the others fail with `ShortLinkAlreadyExists` carrying
/// the winner's code and their allocated ids are skipped.
#[derive(Debug)]
pub struct ShortenerService<S, A> {
    mappings: Arc<MappingStore<S>>,
    allocator: Arc<A>,
}

impl<S, A> Clone for ShortenerService<S, A> {
    fn clone(&self) -> Self {
        Self {
            mappings: Arc::clone(&self.mappings),
            allocator: Arc::clone(&self.allocator),
        }
    }
}

impl<S: KeyValueStore, A: Allocator> ShortenerService<S, A> {
    /// Creates a new `ShortenerService` with a custom allocator.
    pub fn new(mappings: MappingStore<S>, allocator: A) -> Self {
        Self {
            mappings: Arc::new(mappings),
            allocator: Arc::new(allocator),
        }
    }

    pub fn mappings(&self) -> &MappingStore<S> {
        &self.mappings
    }
}

impl<S: KeyValueStore + Clone> ShortenerService<S, CounterAllocator<S>> {
    /// Creates a service whose ids come from a counter in the same store.
    pub fn with_store(store: S, keys: KeySpace) -> Self {
        let allocator = CounterAllocator::new(store.clone(), &keys);
        Self::new(MappingStore::new(store, keys), allocator)
    }
}

#[async_trait]
impl<S: KeyValueStore, A: Allocator> Shortener for ShortenerService<S, A> {
    async fn create(&self, params: ShortenParams) -> Result<ShortCode, ShortenerError> {
        let long = validate::normalize(&params.original_url)?.into_long();
        let ttl = params.expiration.ttl();

        if let Some(existing) = self.mappings.get_long(&long).await? {
            debug!(url = %long, code = %existing, "Short link already exists");
            return Err(ShortenerError::ShortLinkAlreadyExists {
                long,
                short: existing,
            });
        }

        let id = self.allocator.next().await?;
        let short = ShortCode::from_id(id);

        if !self.mappings.put_long_if_absent(&long, &short, ttl).await? {
            // A concurrent create for the same URL won; `id` stays unused.
            let Some(existing) = self.mappings.get_long(&long).await? else {
                return Err(StoreError::Operation(format!(
                    "long url record for \"{long}\" vanished during create"
                ))
                .into());
            };
            debug!(url = %long, code = %existing, skipped_id = id.get(), "Lost create race");
            return Err(ShortenerError::ShortLinkAlreadyExists {
                long,
                short: existing,
            });
        }

        self.mappings.put_short(&short, &long, ttl).await?;

        info!(url = %long, code = %short, ttl = ?ttl, "Created short link");
        Ok(short)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<LongUrl, ShortenerError> {
        trace!(code = %code, "resolving short code");

        match self.mappings.get_short(code).await? {
            Some(long) => {
                debug!(code = %code, url = %long, "Resolved short code");
                Ok(long)
            }
            None => {
                trace!(code = %code, "Short code not found");
                Err(ShortenerError::ShortUrlNotFound(code.clone()))
            }
        }
    }

    async fn reverse_resolve(&self, url: &str) -> Result<ShortCode, ShortenerError> {
        let long = validate::normalize(url)?.into_long();
        trace!(url = %long, "resolving long url");

        match self.mappings.get_long(&long).await? {
            Some(code) => {
                debug!(url = %long, code = %code, "Resolved long url");
                Ok(code)
            }
            None => {
                trace!(url = %long, "Long url not found");
                Err(ShortenerError::LongUrlNotFound(long))
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<(), ShortenerError> {
        let long = self.mappings.delete_pair(code).await?;
        info!(code = %code, url = %long, "Deleted short link");
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Mapping>, ShortenerError> {
        let length = query.trim().chars().count();
        if length < MIN_SEARCH_QUERY_LENGTH {
            return Err(ShortenerError::SearchQueryTooShort {
                length,
                min: MIN_SEARCH_QUERY_LENGTH,
            });
        }

        // No search index is wired in; every valid query has zero results.
        trace!(query, "search index not configured");
        Ok(Vec::new())
    }
}
