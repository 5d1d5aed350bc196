//! Namespaced keys for the shared key-value store.
//!
//! Every key has the form `<namespace>:<kind>:<value>`, so long URLs, short
//! codes and the id counter can never collide even when a long URL happens to
//! look like a short code.

use crate::shortcode::{LongUrl, ShortCode};
use std::fmt::Display;
use typed_builder::TypedBuilder;

pub const DEFAULT_NAMESPACE: &str = "shrtnr";
pub const DEFAULT_COUNTER_NAME: &str = "short_urls";

/// Hash field on a long URL record holding its short code.
pub const SHORT_FIELD: &str = "short";
/// Hash field on a short code record holding its long URL.
pub const LONG_FIELD: &str = "long";

/// The kind tag in the middle of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrnKind {
    Long,
    Short,
    Counter,
}

impl UrnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrnKind::Long => "long",
            UrnKind::Short => "short",
            UrnKind::Counter => "counter",
        }
    }
}

impl Display for UrnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the keys used by the mapping store and the counter allocator.
///
/// ```
/// use shrtnr_core::urn::KeySpace;
/// use shrtnr_core::ShortCode;
///
/// let keys = KeySpace::builder().namespace("links").build();
/// assert_eq!(keys.short(&ShortCode::new("bK3")), "links:short:bK3");
/// assert_eq!(keys.counter(), "links:counter:short_urls");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct KeySpace {
    #[builder(default = String::from(DEFAULT_NAMESPACE), setter(into))]
    namespace: String,
    #[builder(default = String::from(DEFAULT_COUNTER_NAME), setter(into))]
    counter_name: String,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KeySpace {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key of the long→short record.
    pub fn long(&self, url: &LongUrl) -> String {
        self.urn(UrnKind::Long, url.as_str())
    }

    /// Key of the short→long record.
    pub fn short(&self, code: &ShortCode) -> String {
        self.urn(UrnKind::Short, code.as_str())
    }

    /// Key of the id counter.
    pub fn counter(&self) -> String {
        self.urn(UrnKind::Counter, &self.counter_name)
    }

    fn urn(&self, kind: UrnKind, value: &str) -> String {
        format!("{}:{}:{}", self.namespace, kind, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_format() {
        let keys = KeySpace::default();
        assert_eq!(
            keys.long(&LongUrl::new_unchecked("https://example.com/")),
            "shrtnr:long:https://example.com/"
        );
        assert_eq!(keys.short(&ShortCode::new("ba")), "shrtnr:short:ba");
        assert_eq!(keys.counter(), "shrtnr:counter:short_urls");
    }

    #[test]
    fn kinds_do_not_collide() {
        let keys = KeySpace::default();
        // a long url that spells a short code still lands in its own kind
        assert_ne!(
            keys.long(&LongUrl::new_unchecked("ba")),
            keys.short(&ShortCode::new("ba"))
        );
    }

    #[test]
    fn custom_namespace_and_counter() {
        let keys = KeySpace::builder()
            .namespace("tenant-a")
            .counter_name("ids")
            .build();
        assert_eq!(keys.namespace(), "tenant-a");
        assert_eq!(keys.counter(), "tenant-a:counter:ids");
    }
}
