use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

// SCAN 每批返回的键数提示
const INVALIDATE_BATCH: usize = 500;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

/// 缓存键里带着 access token，日志只保留类别部分
fn redact(key: &str) -> &str {
    key.split_once(':').map_or("<key>", |(kind, _)| kind)
}

fn effective_ttl(ttl: u64, default_ttl: u64) -> u64 {
    if ttl == 0 { default_ttl } else { ttl }
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时用同步连接探活，失败则由启动流程回退到 Moka
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis connection failed: {e}"))?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "Redis reachable ({}), prefix '{}', default TTL {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };
        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to read {} entry from Redis: {}", redact(key), e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let ttl = effective_ttl(ttl, self.default_ttl);
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to write {} entry to Redis: {}", redact(&key), e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, i64>(self.make_key(key)).await {
            error!("Failed to remove {} entry from Redis: {}", redact(key), e);
        }
    }

    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        // SCAN 不阻塞服务端，只清理本系统前缀下的键
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0i64;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(INVALIDATE_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to scan keys with pattern '{}': {}", pattern, e);
                    break;
                }
            };
            if !keys.is_empty() {
                match conn.del::<_, i64>(keys).await {
                    Ok(count) => removed += count,
                    Err(e) => error!("Failed to invalidate cached keys: {}", e),
                }
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!("Invalidated {} cached keys", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_token() {
        assert_eq!(redact("user:eyJhbGciOi.abc.def"), "user");
        assert_eq!(redact("no-colon"), "<key>");
    }

    #[test]
    fn test_effective_ttl() {
        assert_eq!(effective_ttl(0, 300), 300);
        assert_eq!(effective_ttl(60, 300), 60);
    }
}
