pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::errors::Result;

/// Shared key-value store with per-key TTL. The flow engines treat it as a
/// plain two-operation-per-key store: reads observe a snapshot, writes
/// replace unconditionally. TTL eviction is the only expiry mechanism.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
