//! Typed views over the dynamic configuration blobs. Presence and range
//! checks happen once here, at the configuration boundary; the flow engines
//! only ever see validated records.

use serde_json::Value;

use crate::errors::{AppError, Result};

pub const OTP_CONFIG_KEY: &str = "AUTH_CONFIG";
pub const FORGET_CONFIG_KEY: &str = "EMAIL_FORGET_CONFIG";

const DEFAULT_OTP_LIFETIME_MS: i64 = 3 * 60 * 1000;

pub const OTP_LENGTH_MIN: u32 = 4;
pub const OTP_LENGTH_MAX: u32 = 10;

/// Validated settings for the phone-OTP flow (`AUTH_CONFIG` blob).
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub length: u32,
    pub template: String,
    pub lifetime_ms: i64,
}

impl OtpConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let length = value
            .get("auth_phone_otp_length")
            .and_then(Value::as_u64)
            .filter(|n| *n > 0)
            .ok_or(AppError::NeedOtpLengthInConfig {
                key: "auth_phone_otp_length",
            })?;
        if length < OTP_LENGTH_MIN as u64 || length > OTP_LENGTH_MAX as u64 {
            return Err(AppError::OtpLengthOutOfRange {
                min: OTP_LENGTH_MIN,
                max: OTP_LENGTH_MAX,
            });
        }

        let template = value
            .get("auth_phone_otp_template")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(AppError::NeedOtpTemplateInConfig {
                key: "auth_phone_otp_template",
            })?;

        let lifetime_ms = value
            .get("otp_expire_time")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_OTP_LIFETIME_MS);

        Ok(OtpConfig {
            length: length as u32,
            template: template.to_string(),
            lifetime_ms,
        })
    }
}

/// Allowed reset-token lifetimes. Anything outside this list is rejected
/// before a token is minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiresIn {
    OneHour,
    TwoHours,
    ThreeHours,
    SixHours,
    TwelveHours,
    OneDay,
}

impl ExpiresIn {
    pub const ALLOWED: [&'static str; 6] = ["1h", "2h", "3h", "6h", "12h", "1d"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1h" => Some(ExpiresIn::OneHour),
            "2h" => Some(ExpiresIn::TwoHours),
            "3h" => Some(ExpiresIn::ThreeHours),
            "6h" => Some(ExpiresIn::SixHours),
            "12h" => Some(ExpiresIn::TwelveHours),
            "1d" => Some(ExpiresIn::OneDay),
            _ => None,
        }
    }

    pub fn as_secs(&self) -> i64 {
        match self {
            ExpiresIn::OneHour => 3600,
            ExpiresIn::TwoHours => 2 * 3600,
            ExpiresIn::ThreeHours => 3 * 3600,
            ExpiresIn::SixHours => 6 * 3600,
            ExpiresIn::TwelveHours => 12 * 3600,
            ExpiresIn::OneDay => 24 * 3600,
        }
    }
}

/// Validated settings for the reset-token flow (`EMAIL_FORGET_CONFIG` blob).
#[derive(Debug, Clone)]
pub struct ForgetConfig {
    pub template: String,
    pub secret: String,
    pub expires_in: ExpiresIn,
}

impl ForgetConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let template = require_str(value, "email_forget_template")?;
        let secret = require_str(value, "email_jwt_secret")?;
        let expires_raw = require_str(value, "email_jwt_expiresIn")?;

        let expires_in =
            ExpiresIn::parse(&expires_raw).ok_or(AppError::NeedValidExpiresIn {
                value: expires_raw,
            })?;

        Ok(ForgetConfig {
            template,
            secret,
            expires_in,
        })
    }

    /// Redemption only needs the signing secret.
    pub fn secret_from_value(value: &Value) -> Result<String> {
        require_str(value, "email_jwt_secret")
    }
}

fn require_str(value: &Value, key: &'static str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AppError::NeedKeyInConfigs { key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn otp_config_requires_length() {
        let err = OtpConfig::from_value(&json!({
            "auth_phone_otp_template": "otp-sms"
        }))
        .unwrap_err();
        assert_eq!(err.i18n(), "NEED_OTP_LENGTH_IN_CONFIG");
    }

    #[test]
    fn otp_length_must_be_in_range() {
        for bad in [3, 11] {
            let err = OtpConfig::from_value(&json!({
                "auth_phone_otp_length": bad,
                "auth_phone_otp_template": "otp-sms"
            }))
            .unwrap_err();
            assert_eq!(err.i18n(), "OTP_LENGTH_MUST_BE_BETWEEN_4_AND_10");
        }
    }

    #[test]
    fn otp_config_requires_template() {
        let err = OtpConfig::from_value(&json!({
            "auth_phone_otp_length": 6
        }))
        .unwrap_err();
        assert_eq!(err.i18n(), "NEED_OTP_TEMPLATE_IN_CONFIG");
    }

    #[test]
    fn otp_lifetime_defaults_to_three_minutes() {
        let cfg = OtpConfig::from_value(&json!({
            "auth_phone_otp_length": 6,
            "auth_phone_otp_template": "otp-sms"
        }))
        .unwrap();
        assert_eq!(cfg.lifetime_ms, 180_000);
    }

    #[test]
    fn forget_config_rejects_unlisted_expiry() {
        let err = ForgetConfig::from_value(&json!({
            "email_forget_template": "forget",
            "email_jwt_secret": "s3cret",
            "email_jwt_expiresIn": "30m"
        }))
        .unwrap_err();
        assert_eq!(err.i18n(), "NEED_VALID_EXPIRES_IN");
    }

    #[test]
    fn forget_config_names_the_missing_key() {
        let err = ForgetConfig::from_value(&json!({
            "email_forget_template": "forget",
            "email_jwt_expiresIn": "1h"
        }))
        .unwrap_err();
        assert_eq!(err.i18n(), "NEED_KEY_IN_CONFIGS");
    }

    #[test]
    fn expires_in_covers_the_allow_list() {
        for raw in ExpiresIn::ALLOWED {
            assert!(ExpiresIn::parse(raw).is_some(), "{raw} should parse");
        }
        assert!(ExpiresIn::parse("45m").is_none());
    }
}
