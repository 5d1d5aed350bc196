use async_trait::async_trait;
use redis::AsyncCommands;
use shrtnr_core::store::{KeyValueStore, Result};
use shrtnr_core::StoreError;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A Redis-backed implementation of [`KeyValueStore`].
///
/// Records are Redis hashes and expiry is Redis' own per-key TTL. The counter
/// is a plain integer key driven by `INCR`, which Redis serializes across all
/// clients.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// `HSETNX`, then `EXPIRE` only if the field was written. Runs atomically on
/// the server, so a written field is never left without its expiry.
///
/// `KEYS[1]` is the hash; `ARGV` is field, value, TTL in seconds (`0` for none).
const HSET_NX_EXPIRE: &str = r#"
if redis.call('HSETNX', KEYS[1], ARGV[1], ARGV[2]) == 0 then
    return 0
end
if ARGV[3] ~= '0' then
    redis.call('EXPIRE', KEYS[1], ARGV[3])
end
return 1
"#;

/// Redis rejects expiries whose millisecond deadline overflows an `i64`.
const MAX_TTL_SECS: i64 = 1 << 40;

/// Whole seconds for `EXPIRE`, rounded up and kept within `1..=MAX_TTL_SECS`.
fn ttl_secs(ttl: Duration) -> i64 {
    let secs = ttl
        .as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0));
    i64::try_from(secs).unwrap_or(i64::MAX).clamp(1, MAX_TTL_SECS)
}

impl RedisStore {
    /// Creates a store on top of an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("failed to open Redis client", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        debug!("Connected to Redis");
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<u64> {
        trace!(key, "Incrementing counter in Redis");

        let mut conn = self.conn.clone();
        conn.incr::<_, _, u64>(key, 1).await.map_err(|e| {
            warn!(key, error = %e, "Redis error on incr");
            map_redis_error("failed to increment counter in Redis", e)
        })
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        trace!(key, field, "Fetching hash field from Redis");

        let mut conn = self.conn.clone();
        match conn.hget::<_, _, Option<String>>(key, field).await {
            Ok(Some(value)) => {
                debug!(key, field, "Hit in Redis");
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(key, field, "Miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key, field, error = %e, "Redis error on hget");
                Err(map_redis_error("failed to fetch hash field from Redis", e))
            }
        }
    }

    async fn hset(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        trace!(key, field, ttl = ?ttl, "Storing hash field in Redis");

        let mut conn = self.conn.clone();
        let result = match ttl {
            // MULTI keeps the field and its expiry together on this one key.
            Some(ttl) => {
                redis::pipe()
                    .atomic()
                    .hset(key, field, value)
                    .ignore()
                    .expire(key, ttl_secs(ttl))
                    .ignore()
                    .query_async::<()>(&mut conn)
                    .await
            }
            None => conn.hset::<_, _, _, ()>(key, field, value).await,
        };

        result.map_err(|e| {
            warn!(key, field, error = %e, "Redis error on hset");
            map_redis_error("failed to write hash field to Redis", e)
        })
    }

    async fn hset_nx(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        trace!(key, field, ttl = ?ttl, "Conditionally storing hash field in Redis");

        let mut conn = self.conn.clone();
        let ttl = ttl.map_or(0, ttl_secs);
        let written = redis::Script::new(HSET_NX_EXPIRE)
            .key(key)
            .arg(field)
            .arg(value)
            .arg(ttl)
            .invoke_async::<i64>(&mut conn)
            .await
            .map_err(|e| {
                warn!(key, field, error = %e, "Redis error on hsetnx");
                map_redis_error("failed to conditionally write hash field to Redis", e)
            })?;

        if written == 0 {
            debug!(key, field, "Hash field already set in Redis");
            return Ok(false);
        }

        Ok(true)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        trace!(key, "Removing key from Redis");

        let mut conn = self.conn.clone();
        let removed = conn.del::<_, u64>(key).await.map_err(|e| {
            warn!(key, error = %e, "Redis error on del");
            map_redis_error("failed to delete key from Redis", e)
        })?;

        Ok(removed > 0)
    }
}
