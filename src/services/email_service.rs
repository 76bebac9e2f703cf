use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::errors::{AppError, Result};

/// Email notification collaborator, same contract shape as SMS.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        receptor: &str,
        template: &str,
        params: HashMap<String, String>,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct HttpEmailService {
    api_url: String,
    api_key: String,
    client: Client,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailService {
    async fn send(
        &self,
        receptor: &str,
        template: &str,
        params: HashMap<String, String>,
    ) -> Result<()> {
        let response = self
            .client
            .post(&self.api_url)
            .header("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .json(&json!({
                "receptor": receptor,
                "template": template,
                "params": params,
            }))
            .send()
            .await
            .map_err(|e| AppError::Email(format!("email API error: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Email(format!(
                "email sending failed with status: {}",
                response.status()
            )))
        }
    }
}
