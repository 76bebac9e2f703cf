use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::models::user::{NewUser, UniqueField, User};

/// User directory collaborator: lookup and find-or-create on a unique field.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_unique(&self, field: UniqueField, value: &str) -> Result<Option<User>>;

    /// Creates a user, or returns the existing one if the unique field is
    /// already taken.
    async fn create(&self, new: NewUser, unique: UniqueField) -> Result<User>;

    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;
}

pub struct MongoUserDirectory {
    collection: Collection<User>,
}

impl MongoUserDirectory {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn get_by_unique(&self, field: UniqueField, value: &str) -> Result<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { field.as_str(): value })
            .await?;
        Ok(user)
    }

    async fn create(&self, new: NewUser, unique: UniqueField) -> Result<User> {
        let unique_value = match unique {
            UniqueField::Email => new.email.clone(),
            UniqueField::Username => new.username.clone(),
            UniqueField::Phone => new.phone.clone(),
        }
        .ok_or(AppError::FailedToCreateUser)?;

        if let Some(existing) = self.get_by_unique(unique, &unique_value).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let user = User {
            id: Some(ObjectId::new()),
            firstname: new.firstname,
            lastname: new.lastname,
            fullname: new.fullname,
            email: new.email,
            username: new.username,
            phone: new.phone,
            phone_country_code: new.phone_country_code,
            phone_verified: new.phone_verified,
            created_at: now,
            updated_at: now,
        };
        self.collection.insert_one(&user).await?;

        tracing::info!(user = %user.id_hex(), unique = unique.as_str(), "user created");
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };
        let user = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(user)
    }
}
