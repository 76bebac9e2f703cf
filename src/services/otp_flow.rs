//! Phone OTP flow engine: issues, rate-limits, and verifies short-lived
//! numeric codes bound to a phone number. All state lives in the injected
//! cache; expiry is enforced by cache TTL alone.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use super::{ConfigStore, SmsSender, TokenIssuer, UserDirectory};
use crate::cache::Cache;
use crate::clock::Clock;
use crate::errors::{AppError, Result};
use crate::events::{AuthEvent, EventBus};
use crate::models::config::{OtpConfig, OTP_CONFIG_KEY};
use crate::models::otp::OtpRecord;
use crate::models::user::{NewUser, UniqueField};

const CACHE_PREFIX: &str = "AUTH_PHONE_OTP_";

/// Collision retries are bounded so a saturated code space surfaces as an
/// error instead of unbounded spinning.
const MAX_GENERATE_ATTEMPTS: u32 = 16;

/// Source of candidate codes: a uniformly random integer with exactly
/// `length` digits. Scripted in tests.
pub trait OtpGenerator: Send + Sync {
    fn generate(&self, length: u32) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct RandomOtpGenerator;

impl OtpGenerator for RandomOtpGenerator {
    fn generate(&self, length: u32) -> String {
        let low = 10u64.pow(length - 1);
        let high = 10u64.pow(length) - 1;
        rand::thread_rng().gen_range(low..=high).to_string()
    }
}

pub struct OtpFlow {
    cache: Arc<dyn Cache>,
    configs: Arc<dyn ConfigStore>,
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn TokenIssuer>,
    sms: Arc<dyn SmsSender>,
    events: EventBus,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn OtpGenerator>,
}

impl OtpFlow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cache: Arc<dyn Cache>,
        configs: Arc<dyn ConfigStore>,
        users: Arc<dyn UserDirectory>,
        tokens: Arc<dyn TokenIssuer>,
        sms: Arc<dyn SmsSender>,
        events: EventBus,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn OtpGenerator>,
    ) -> Self {
        Self {
            cache,
            configs,
            users,
            tokens,
            sms,
            events,
            clock,
            generator,
        }
    }

    /// Issues a new OTP for `phone` and dispatches it by SMS. Refuses while
    /// a previous code is still live (best-effort check: the read and the
    /// later write are not a critical section, concurrent requests for the
    /// same phone can both pass and the later write wins).
    pub async fn request(&self, phone: &str, country: &str) -> Result<()> {
        if let Some(record) = self.get_record(phone).await? {
            let remaining = record.expire_at - self.clock.now_millis();
            if remaining > 0 {
                return Err(AppError::OtpAlreadyRequested {
                    expire_at: record.expire_at,
                    remaining,
                });
            }
        }

        let blob = self
            .configs
            .get(OTP_CONFIG_KEY)
            .await?
            .ok_or(AppError::ConfigNotFound {
                key: OTP_CONFIG_KEY,
            })?;
        let config = OtpConfig::from_value(&blob)?;

        let otp = self.generate_unique(config.length).await?;
        let expire_at = self.clock.now_millis() + config.lifetime_ms;

        let receptor = format!("{}{}", country, phone);
        let mut params = HashMap::new();
        params.insert("param1".to_string(), otp.clone());
        // Send before caching: a failed dispatch must leave no state behind.
        self.sms.send(&receptor, &config.template, params).await?;

        self.store_record(phone, country, &otp, expire_at).await?;
        tracing::info!(phone, "OTP issued");
        Ok(())
    }

    /// Verifies a code, consumes it, and returns a session token for the
    /// (created-or-fetched) phone-verified user.
    pub async fn verify(&self, phone: &str, otp: &str) -> Result<String> {
        let record = self
            .get_record(phone)
            .await?
            .ok_or(AppError::OtpNotRequested)?;

        // Mismatch keeps the record: the caller may retry with the right code.
        if record.otp != otp {
            return Err(AppError::OtpNotValid);
        }

        let user = self
            .users
            .create(
                NewUser::phone_verified(phone, &record.country),
                UniqueField::Phone,
            )
            .await?;

        // Delete both keys so the code cannot be replayed.
        self.remove_record(phone, otp).await?;

        let token = self.tokens.issue(&user.id_hex(), "auth").await?;
        self.events.emit(AuthEvent::UserLogin {
            user: user.into(),
            token: token.clone(),
        });
        Ok(token)
    }

    async fn generate_unique(&self, length: u32) -> Result<String> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let otp = self.generator.generate(length);
            // The code doubles as the reverse-index key; a collision with a
            // live code would make lookup-by-code ambiguous.
            if self.cache.get(&cache_key(&otp)).await?.is_none() {
                return Ok(otp);
            }
        }
        Err(AppError::OtpGenerationExhausted)
    }

    async fn get_record(&self, phone: &str) -> Result<Option<OtpRecord>> {
        match self.cache.get(&cache_key(phone)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store_record(
        &self,
        phone: &str,
        country: &str,
        otp: &str,
        expire_at: i64,
    ) -> Result<()> {
        let ttl = ((expire_at - self.clock.now_millis()) / 1000).max(1) as u64;
        let record = OtpRecord {
            otp: otp.to_string(),
            country: country.to_string(),
            expire_at,
        };
        self.cache
            .set(&cache_key(phone), &serde_json::to_string(&record)?, ttl)
            .await?;
        // Reverse index under the same TTL. The two writes are not atomic;
        // the reverse entry is advisory and rebuildable.
        self.cache.set(&cache_key(otp), phone, ttl).await?;
        Ok(())
    }

    async fn remove_record(&self, phone: &str, otp: &str) -> Result<()> {
        self.cache.delete(&cache_key(phone)).await?;
        self.cache.delete(&cache_key(otp)).await?;
        Ok(())
    }
}

fn cache_key(suffix: &str) -> String {
    format!("{}{}", CACHE_PREFIX, suffix)
}
