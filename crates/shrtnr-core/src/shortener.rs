use crate::error::Result;
use crate::shortcode::{LongUrl, Mapping, ShortCode};
use async_trait::async_trait;
use std::time::Duration;

/// Expiration policy for a shortened URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationPolicy {
    /// The shortened URL never expires.
    #[default]
    Never,
    /// Both directions of the mapping expire after this duration.
    AfterDuration(Duration),
}

impl ExpirationPolicy {
    /// The time-to-live to hand to the store, in whole seconds.
    ///
    /// A sub-second remainder rounds up. A zero duration means no expiry.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            ExpirationPolicy::Never => None,
            ExpirationPolicy::AfterDuration(duration) => {
                let secs = duration
                    .as_secs()
                    .saturating_add(u64::from(duration.subsec_nanos() > 0));
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        }
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenParams {
    /// The URL to shorten, before validation.
    pub original_url: String,
    /// The expiration policy for the shortened URL.
    pub expiration: ExpirationPolicy,
}

impl ShortenParams {
    /// A permanent mapping for `original_url`.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            expiration: ExpirationPolicy::Never,
        }
    }

    /// Expires the mapping after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expiration = ExpirationPolicy::AfterDuration(ttl);
        self
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a mapping for a URL and returns its new short code.
    ///
    /// Fails with `ShortLinkAlreadyExists` if the normalized URL is already
    /// mapped. The error carries the existing code, so callers wanting
    /// get-or-create semantics can use it directly.
    async fn create(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Resolves a short code to its long URL.
    async fn resolve(&self, code: &ShortCode) -> Result<LongUrl>;

    /// Looks up the short code of an already shortened URL.
    async fn reverse_resolve(&self, url: &str) -> Result<ShortCode>;

    /// Deletes both directions of the mapping behind a short code.
    async fn delete(&self, code: &ShortCode) -> Result<()>;

    /// Searches existing mappings.
    async fn search(&self, query: &str) -> Result<Vec<Mapping>>;
}
