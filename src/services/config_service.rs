use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Read-only access to dynamic configuration blobs, keyed by name.
/// Typed parsing of each blob happens in `models::config`.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigDoc {
    key: String,
    value: serde_json::Value,
}

pub struct MongoConfigStore {
    collection: Collection<ConfigDoc>,
}

impl MongoConfigStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("configs"),
        }
    }
}

#[async_trait]
impl ConfigStore for MongoConfigStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let doc = self.collection.find_one(doc! { "key": key }).await?;
        Ok(doc.map(|d| d.value))
    }
}
