//! Key-value storage for last-known-good collection snapshots.
//!
//! Callers never share a snapshot: keys are scoped by the caller's token
//! fingerprint. Writers for the same key are last-writer-wins; there is no
//! cross-request locking.

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;
pub mod redis_store;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Human-readable backend name for startup logs.
    fn backend(&self) -> &'static str;
}

/// `<base>:<fingerprint>`, e.g. `jobListings:1a2b3c4d5e6f7a8b`.
pub fn scoped_key(base: &str, fingerprint: &str) -> String {
    format!("{base}:{fingerprint}")
}
