use std::sync::Arc;

use mongodb::Database;

use crate::cache::Cache;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::events::EventBus;
use crate::services::config_service::MongoConfigStore;
use crate::services::email_service::HttpEmailService;
use crate::services::forget_flow::ForgetFlow;
use crate::services::otp_flow::{OtpFlow, RandomOtpGenerator};
use crate::services::password_service::BcryptCredentialStore;
use crate::services::sms_service::HttpSmsService;
use crate::services::token_service::JwtTokenIssuer;
use crate::services::user_service::MongoUserDirectory;
use crate::services::{CredentialStore, TokenIssuer, UserDirectory};

/// All collaborators are constructed once here and injected explicitly;
/// nothing is reached through globals.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub users: Arc<dyn UserDirectory>,
    pub passwords: Arc<dyn CredentialStore>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub otp_flow: Arc<OtpFlow>,
    pub forget_flow: Arc<ForgetFlow>,
    pub events: EventBus,
    pub session_secret: String,
}

impl AppState {
    pub fn new(db: Database, cache: Arc<dyn Cache>, config: &AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let events = EventBus::new();

        let users: Arc<dyn UserDirectory> = Arc::new(MongoUserDirectory::new(&db));
        let passwords: Arc<dyn CredentialStore> = Arc::new(BcryptCredentialStore::new(&db));
        let tokens: Arc<dyn TokenIssuer> =
            Arc::new(JwtTokenIssuer::new(config.jwt_secret.clone()));
        let configs = Arc::new(MongoConfigStore::new(&db));
        let sms = Arc::new(HttpSmsService::new(
            config.sms_api_url.clone(),
            config.sms_api_key.clone(),
        ));
        let email = Arc::new(HttpEmailService::new(
            config.email_api_url.clone(),
            config.email_api_key.clone(),
        ));

        let otp_flow = Arc::new(OtpFlow::new(
            cache,
            configs.clone(),
            users.clone(),
            tokens.clone(),
            sms,
            events.clone(),
            clock.clone(),
            Arc::new(RandomOtpGenerator),
        ));
        let forget_flow = Arc::new(ForgetFlow::new(
            users.clone(),
            configs,
            passwords.clone(),
            email,
            clock,
        ));

        AppState {
            db,
            users,
            passwords,
            tokens,
            otp_flow,
            forget_flow,
            events,
            session_secret: config.jwt_secret.clone(),
        }
    }
}
