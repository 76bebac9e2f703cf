// config.rs
use std::env;

/// Process-level configuration. Per-flow auth settings (OTP length,
/// templates, reset secrets) live in the dynamic config store instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub sms_api_url: String,
    pub sms_api_key: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "authgate".to_string()),
            redis_url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            sms_api_url: env::var("SMS_API_URL").expect("SMS_API_URL must be set"),
            sms_api_key: env::var("SMS_API_KEY").unwrap_or_default(),
            email_api_url: env::var("EMAIL_API_URL").expect("EMAIL_API_URL must be set"),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}
