use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use super::{SnapshotStore, StoreError};

const KEY_PREFIX: &str = "jobtracker:snapshot:";

/// Snapshots shared across service instances through Redis.
pub struct RedisStore {
    conn: MultiplexedConnection,
    ttl_secs: Option<u64>,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, ttl_secs: Option<u64>) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis snapshot store connected");
        Ok(Self { conn, ttl_secs })
    }

    fn key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::key(key)).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        match self.ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(Self::key(key), value, ttl).await?,
            None => conn.set::<_, _, ()>(Self::key(key), value).await?,
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(key)).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
