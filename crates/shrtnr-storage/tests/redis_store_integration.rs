use redis::AsyncCommands;
use std::time::Duration;

use shrtnr_core::{KeySpace, KeyValueStore, LongUrl, ShortCode, ShortenerError};
use shrtnr_storage::{MappingStore, RedisStore};
use shrtnr_test_infra::redis::RedisServer;

/// Test fixture that manages a Redis container using test-infra.
pub struct RedisTestContainer {
    redis: RedisServer,
    redis_url: String,
}

impl RedisTestContainer {
    /// Starts a new Redis container with a random available port.
    pub async fn start() -> Self {
        let redis = RedisServer::start()
            .await
            .expect("Failed to start Redis server");
        let redis_url = redis.url().await.expect("Failed to get Redis url");

        Self { redis, redis_url }
    }

    pub async fn raw(&self) -> redis::aio::MultiplexedConnection {
        self.redis
            .connection()
            .await
            .expect("Failed to open raw Redis connection")
    }

    pub async fn store(&self) -> RedisStore {
        RedisStore::connect(&self.redis_url)
            .await
            .expect("Failed to connect to Redis")
    }
}

#[tokio::test]
async fn test_redis_store_incr() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;

    assert_eq!(store.incr("counter").await.unwrap(), 1);
    assert_eq!(store.incr("counter").await.unwrap(), 2);
    assert_eq!(store.incr("other").await.unwrap(), 1);
}

#[tokio::test]
async fn test_redis_store_hash_fields() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;

    assert_eq!(store.hget("h", "a").await.unwrap(), None);

    store.hset("h", "a", "1", None).await.unwrap();
    store.hset("h", "b", "2", None).await.unwrap();

    assert_eq!(store.hget("h", "a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.hget("h", "b").await.unwrap().as_deref(), Some("2"));
    assert_eq!(store.hget("h", "c").await.unwrap(), None);
}

#[tokio::test]
async fn test_redis_store_hset_nx() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;

    assert!(store.hset_nx("h", "a", "first", None).await.unwrap());
    assert!(!store.hset_nx("h", "a", "second", None).await.unwrap());
    assert_eq!(
        store.hget("h", "a").await.unwrap().as_deref(),
        Some("first")
    );
}

#[tokio::test]
async fn test_redis_store_ttl() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;

    store
        .hset("plain", "a", "1", Some(Duration::from_secs(1)))
        .await
        .unwrap();
    store
        .hset_nx("conditional", "a", "1", Some(Duration::from_secs(1)))
        .await
        .unwrap();
    store.hset("permanent", "a", "1", None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(store.hget("plain", "a").await.unwrap(), None);
    assert_eq!(store.hget("conditional", "a").await.unwrap(), None);
    assert_eq!(
        store.hget("permanent", "a").await.unwrap().as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn test_redis_store_hset_nx_sets_expiry_with_the_write() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;
    let mut raw = fixture.raw().await;

    assert!(store
        .hset_nx("expiring", "a", "1", Some(Duration::from_secs(100)))
        .await
        .unwrap());
    let ttl: i64 = raw.ttl("expiring").await.unwrap();
    assert!((1..=100).contains(&ttl), "ttl was {ttl}");

    // a refused write leaves the existing expiry untouched
    assert!(!store
        .hset_nx("expiring", "a", "2", Some(Duration::from_secs(5000)))
        .await
        .unwrap());
    let ttl: i64 = raw.ttl("expiring").await.unwrap();
    assert!(ttl <= 100, "ttl was {ttl}");

    assert!(store.hset_nx("forever", "a", "1", None).await.unwrap());
    let ttl: i64 = raw.ttl("forever").await.unwrap();
    assert_eq!(ttl, -1);

    // a sub-second ttl still expires instead of becoming permanent
    assert!(store
        .hset_nx("brief", "a", "1", Some(Duration::from_millis(10)))
        .await
        .unwrap());
    let ttl: i64 = raw.ttl("brief").await.unwrap();
    assert!(ttl >= 0, "ttl was {ttl}");

    // a ttl far beyond any real deadline is still accepted
    assert!(store
        .hset_nx("distant", "a", "1", Some(Duration::MAX))
        .await
        .unwrap());
    let ttl: i64 = raw.ttl("distant").await.unwrap();
    assert!(ttl > 0, "ttl was {ttl}");
}

#[tokio::test]
async fn test_redis_store_del() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store().await;

    store.hset("h", "a", "1", None).await.unwrap();
    assert!(store.del("h").await.unwrap());
    assert!(!store.del("h").await.unwrap());
    assert_eq!(store.hget("h", "a").await.unwrap(), None);
}

#[tokio::test]
async fn test_redis_mapping_store_pair_lifecycle() {
    let fixture = RedisTestContainer::start().await;
    let mappings = MappingStore::new(fixture.store().await, KeySpace::default());

    let long = LongUrl::new_unchecked("https://example.com/");
    let short = ShortCode::new("b");

    assert!(mappings
        .put_long_if_absent(&long, &short, None)
        .await
        .unwrap());
    mappings.put_short(&short, &long, None).await.unwrap();

    assert_eq!(mappings.get_long(&long).await.unwrap(), Some(short.clone()));
    assert_eq!(mappings.get_short(&short).await.unwrap(), Some(long.clone()));

    assert_eq!(mappings.delete_pair(&short).await.unwrap(), long);
    assert_eq!(mappings.get_long(&long).await.unwrap(), None);
    assert_eq!(mappings.get_short(&short).await.unwrap(), None);

    let err = mappings.delete_pair(&short).await.unwrap_err();
    assert!(matches!(err, ShortenerError::ShortUrlNotFound(_)));
}

#[tokio::test]
async fn test_redis_unreachable_server() {
    let result = RedisStore::connect("redis://127.0.0.1:1").await;
    assert!(result.is_err(), "connecting to a closed port should fail");
}
