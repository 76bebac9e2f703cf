use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::{bson::doc, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Credential store collaborator: owns the password hashes, keyed by user id.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save(&self, user_id: &str, password: &str) -> Result<()>;
    async fn compare(&self, user_id: &str, password: &str) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PasswordDoc {
    user: String,
    hash: String,
    updated_at: mongodb::bson::DateTime,
}

pub struct BcryptCredentialStore {
    collection: Collection<PasswordDoc>,
}

impl BcryptCredentialStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("passwords"),
        }
    }
}

#[async_trait]
impl CredentialStore for BcryptCredentialStore {
    async fn save(&self, user_id: &str, password: &str) -> Result<()> {
        let hashed = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("bcrypt: {}", e)))?;

        self.collection
            .update_one(
                doc! { "user": user_id },
                doc! { "$set": {
                    "hash": hashed,
                    "updated_at": mongodb::bson::DateTime::now(),
                }},
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn compare(&self, user_id: &str, password: &str) -> Result<bool> {
        let doc = self.collection.find_one(doc! { "user": user_id }).await?;
        match doc {
            Some(doc) => verify(password, &doc.hash)
                .map_err(|e| AppError::Internal(format!("bcrypt: {}", e))),
            None => Ok(false),
        }
    }
}
