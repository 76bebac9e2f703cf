//! Password-reset flow engine: issues a short-lived signed token proving
//! email ownership, and redeems it to authorize a password change. Tokens
//! are stateless; signature, expiry, and creator scoping are the only
//! validity checks.

use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{ConfigStore, CredentialStore, EmailSender, UserDirectory};
use crate::clock::Clock;
use crate::errors::{AppError, Result};
use crate::models::config::{ForgetConfig, FORGET_CONFIG_KEY};
use crate::models::user::UniqueField;

/// Payload embedded in reset tokens. `creator` scopes redemption to the
/// client that requested the reset.
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    user: String,
    creator: String,
    exp: usize,
}

/// Creator tags arrive from request metadata; comparisons always use the
/// normalized form.
pub fn normalize_creator(creator: &str) -> String {
    creator.trim().to_lowercase()
}

pub struct ForgetFlow {
    users: Arc<dyn UserDirectory>,
    configs: Arc<dyn ConfigStore>,
    passwords: Arc<dyn CredentialStore>,
    email: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
}

impl ForgetFlow {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        configs: Arc<dyn ConfigStore>,
        passwords: Arc<dyn CredentialStore>,
        email: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            configs,
            passwords,
            email,
            clock,
        }
    }

    /// Mints a reset token for the account behind `email` and delivers it
    /// out-of-band by email. The token is never returned to the caller.
    pub async fn request(&self, email: &str, creator: &str) -> Result<()> {
        let creator = normalize_creator(creator);

        let user = self
            .users
            .get_by_unique(UniqueField::Email, email)
            .await?
            .ok_or(AppError::EmailNotFound)?;

        let config = self.load_config().await?;

        let claims = ResetClaims {
            user: user.id_hex(),
            creator,
            exp: (self.clock.now_millis() / 1000 + config.expires_in.as_secs()) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .map_err(|e| AppError::TokenSign(e.to_string()))?;

        let mut params = HashMap::new();
        params.insert("token".to_string(), token);
        params.insert("email".to_string(), email.to_string());
        if let Some(firstname) = &user.firstname {
            params.insert("firstname".to_string(), firstname.clone());
        }
        if let Some(lastname) = &user.lastname {
            params.insert("lastname".to_string(), lastname.clone());
        }
        if let Some(fullname) = &user.fullname {
            params.insert("fullname".to_string(), fullname.clone());
        }
        self.email.send(email, &config.template, params).await?;

        tracing::info!(user = %user.id_hex(), "reset token emailed");
        Ok(())
    }

    /// Redeems a reset token and overwrites the password for the embedded
    /// user. No session token is issued; the user authenticates afterwards.
    pub async fn change(&self, token: &str, password: &str, creator: &str) -> Result<()> {
        let creator = normalize_creator(creator);

        let secret = self.load_secret().await?;

        // Bad signature, malformed token, and expiry all collapse into one
        // error kind.
        let validation = Validation::new(Algorithm::HS256);
        let decoded = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        if decoded.claims.creator != creator {
            return Err(AppError::BadCreator);
        }

        self.passwords.save(&decoded.claims.user, password).await?;
        tracing::info!(user = %decoded.claims.user, "password changed via reset token");
        Ok(())
    }

    async fn load_config(&self) -> Result<ForgetConfig> {
        let blob = self.load_blob().await?;
        ForgetConfig::from_value(&blob)
    }

    async fn load_secret(&self) -> Result<String> {
        let blob = self.load_blob().await?;
        ForgetConfig::secret_from_value(&blob)
    }

    async fn load_blob(&self) -> Result<serde_json::Value> {
        self.configs
            .get(FORGET_CONFIG_KEY)
            .await?
            .ok_or(AppError::ConfigNotFound {
                key: FORGET_CONFIG_KEY,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::services::test_support::{
        FakeEmail, FakePasswords, FakeUsers, ManualClock, MemoryConfigStore,
    };

    const USER_ID: &str = "64b7f0a1c2d3e4f5a6b7c8d9";
    const SECRET: &str = "reset-secret";

    struct Harness {
        flow: ForgetFlow,
        email: Arc<FakeEmail>,
        passwords: Arc<FakePasswords>,
        configs: Arc<MemoryConfigStore>,
    }

    fn default_config() -> serde_json::Value {
        json!({
            "email_forget_template": "forget-email",
            "email_jwt_secret": SECRET,
            "email_jwt_expiresIn": "1h",
        })
    }

    fn harness() -> Harness {
        let users = Arc::new(FakeUsers::seeded(FakeUsers::user(
            USER_ID,
            Some("ada@example.com"),
            None,
            Some("Ada"),
        )));
        let configs = Arc::new(MemoryConfigStore::with(
            "EMAIL_FORGET_CONFIG",
            default_config(),
        ));
        let email = Arc::new(FakeEmail::default());
        let passwords = Arc::new(FakePasswords::default());

        let flow = ForgetFlow::new(
            users,
            configs.clone(),
            passwords.clone(),
            email.clone(),
            Arc::new(ManualClock::new(chrono::Utc::now().timestamp_millis())),
        );

        Harness {
            flow,
            email,
            passwords,
            configs,
        }
    }

    fn mint(creator: &str, exp_offset_secs: i64, secret: &str) -> String {
        let claims = ResetClaims {
            user: USER_ID.to_string(),
            creator: creator.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let h = harness();
        let err = h
            .flow
            .request("nobody@example.com", "app-a")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailNotFound));
        assert_eq!(h.email.sent_count(), 0);
    }

    #[tokio::test]
    async fn request_emails_a_token_with_profile_fields() {
        let h = harness();
        h.flow.request("ada@example.com", " App-A ").await.unwrap();

        let sent = h.email.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (receptor, template, params) = &sent[0];
        assert_eq!(receptor, "ada@example.com");
        assert_eq!(template, "forget-email");
        assert_eq!(params.get("firstname").unwrap(), "Ada");

        // The delivered token redeems under the normalized creator tag.
        let token = params.get("token").unwrap().clone();
        drop(sent);
        h.flow.change(&token, "new-password", "app-a").await.unwrap();
        assert_eq!(
            h.passwords.saved.lock().unwrap()[0],
            (USER_ID.to_string(), "new-password".to_string())
        );
    }

    #[tokio::test]
    async fn unlisted_expiry_aborts_before_minting() {
        let h = harness();
        h.configs.set(
            "EMAIL_FORGET_CONFIG",
            json!({
                "email_forget_template": "forget-email",
                "email_jwt_secret": SECRET,
                "email_jwt_expiresIn": "30m",
            }),
        );

        let err = h.flow.request("ada@example.com", "app-a").await.unwrap_err();
        assert!(matches!(err, AppError::NeedValidExpiresIn { .. }));
        assert_eq!(h.email.sent_count(), 0);
    }

    #[tokio::test]
    async fn missing_config_key_is_named() {
        let h = harness();
        h.configs.set(
            "EMAIL_FORGET_CONFIG",
            json!({
                "email_forget_template": "forget-email",
                "email_jwt_expiresIn": "1h",
            }),
        );

        let err = h.flow.request("ada@example.com", "app-a").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NeedKeyInConfigs { key: "email_jwt_secret" }
        ));
    }

    #[tokio::test]
    async fn creator_mismatch_is_rejected() {
        let h = harness();
        let token = mint("app-a", 3600, SECRET);

        let err = h
            .flow
            .change(&token, "new-password", "app-b")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadCreator));
        assert!(h.passwords.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_signature_and_expired_tokens_are_invalid() {
        let h = harness();

        let forged = mint("app-a", 3600, "other-secret");
        let err = h.flow.change(&forged, "pw", "app-a").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        // Past the default decode leeway.
        let expired = mint("app-a", -120, SECRET);
        let err = h.flow.change(&expired, "pw", "app-a").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let err = h.flow.change("not-a-jwt", "pw", "app-a").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        assert!(h.passwords.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn change_normalizes_the_presented_creator() {
        let h = harness();
        let token = mint("app-a", 3600, SECRET);

        h.flow.change(&token, "new-password", "  APP-A ").await.unwrap();
        assert_eq!(h.passwords.saved.lock().unwrap().len(), 1);
    }
}
