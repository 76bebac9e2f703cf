use mongodb::{Client, Database};

use crate::config::AppConfig;

pub async fn get_db_client(config: &AppConfig) -> Database {
    let client = Client::with_uri_str(&config.database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(&config.database_name);

    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!(db = %config.database_name, ?collections, "connected to database");
        }
        Err(e) => {
            tracing::warn!(db = %config.database_name, "database may be inaccessible: {}", e);
        }
    }

    db
}
