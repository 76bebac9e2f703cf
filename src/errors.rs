// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::config::ExpiresIn;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("SMS dispatch failed: {0}")]
    Sms(String),

    #[error("email dispatch failed: {0}")]
    Email(String),

    #[error("token signing failed: {0}")]
    TokenSign(String),

    #[error("config blob `{key}` not found")]
    ConfigNotFound { key: &'static str },

    #[error("an OTP is already outstanding for this phone")]
    OtpAlreadyRequested { expire_at: i64, remaining: i64 },

    #[error("config key `{key}` must hold the OTP length")]
    NeedOtpLengthInConfig { key: &'static str },

    #[error("OTP length must be between {min} and {max}")]
    OtpLengthOutOfRange { min: u32, max: u32 },

    #[error("config key `{key}` must hold the OTP template")]
    NeedOtpTemplateInConfig { key: &'static str },

    #[error("could not generate a non-colliding OTP")]
    OtpGenerationExhausted,

    #[error("no OTP has been requested for this phone")]
    OtpNotRequested,

    #[error("the supplied OTP does not match")]
    OtpNotValid,

    #[error("no account with this email")]
    EmailNotFound,

    #[error("email `{email}` is already registered")]
    EmailExists { email: String },

    #[error("username `{username}` is already registered")]
    UsernameExists { username: String },

    #[error("unknown email")]
    BadEmail,

    #[error("unknown username")]
    BadUsername,

    #[error("wrong password")]
    BadPassword,

    #[error("user could not be created")]
    FailedToCreateUser,

    #[error("config key `{key}` is required")]
    NeedKeyInConfigs { key: &'static str },

    #[error("`{value}` is not an allowed expiry duration")]
    NeedValidExpiresIn { value: String },

    #[error("reset token is invalid or expired")]
    InvalidToken,

    #[error("reset token was issued for a different creator")]
    BadCreator,

    #[error("user not found")]
    UserNotFound,

    #[error("authentication required")]
    Unauthorized,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for API clients.
    pub fn i18n(&self) -> &'static str {
        match self {
            AppError::MongoDB(_) => "INTERNAL_ERROR",
            AppError::Redis(_) => "INTERNAL_ERROR",
            AppError::Sms(_) => "SMS_NOT_SENT",
            AppError::Email(_) => "EMAIL_NOT_SENT",
            AppError::TokenSign(_) => "INTERNAL_ERROR",
            AppError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            AppError::OtpAlreadyRequested { .. } => "OTP_ALREADY_REQUESTED",
            AppError::NeedOtpLengthInConfig { .. } => "NEED_OTP_LENGTH_IN_CONFIG",
            AppError::OtpLengthOutOfRange { .. } => "OTP_LENGTH_MUST_BE_BETWEEN_4_AND_10",
            AppError::NeedOtpTemplateInConfig { .. } => "NEED_OTP_TEMPLATE_IN_CONFIG",
            AppError::OtpGenerationExhausted => "OTP_GENERATION_EXHAUSTED",
            AppError::OtpNotRequested => "OTP_NOT_REQUESTED",
            AppError::OtpNotValid => "OTP_NOT_VALID",
            AppError::EmailNotFound => "EMAIL_NOT_FOUND",
            AppError::EmailExists { .. } => "EMAIL_EXISTS",
            AppError::UsernameExists { .. } => "USERNAME_EXISTS",
            AppError::BadEmail => "BAD_EMAIL",
            AppError::BadUsername => "BAD_USERNAME",
            AppError::BadPassword => "BAD_PASSWORD",
            AppError::FailedToCreateUser => "FAILED_TO_CREATE_USER",
            AppError::NeedKeyInConfigs { .. } => "NEED_KEY_IN_CONFIGS",
            AppError::NeedValidExpiresIn { .. } => "NEED_VALID_EXPIRES_IN",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::BadCreator => "BAD_CREATOR",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MongoDB(_)
            | AppError::Redis(_)
            | AppError::TokenSign(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Sms(_) | AppError::Email(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Structured detail payload attached to the error envelope.
    fn data(&self) -> Option<serde_json::Value> {
        match self {
            AppError::OtpAlreadyRequested { expire_at, remaining } => Some(json!({
                "date": chrono::DateTime::from_timestamp_millis(*expire_at)
                    .map(|d| d.to_rfc3339()),
                "timestamp": expire_at,
                "remaining": remaining,
            })),
            AppError::NeedOtpLengthInConfig { key }
            | AppError::NeedOtpTemplateInConfig { key }
            | AppError::NeedKeyInConfigs { key }
            | AppError::ConfigNotFound { key } => Some(json!({ "key": key })),
            AppError::OtpLengthOutOfRange { min, max } => {
                Some(json!({ "min": min, "max": max }))
            }
            AppError::NeedValidExpiresIn { value } => Some(json!({
                "valid": ExpiresIn::ALLOWED,
                "value": value,
            })),
            AppError::EmailExists { email } => Some(json!({ "email": email })),
            AppError::UsernameExists { username } => Some(json!({ "username": username })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Collaborator and internal faults are logged with detail but
        // rendered opaque to the caller.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, i18n = self.i18n(), "request failed");
            "request failed".to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({
            "success": false,
            "i18n": self.i18n(),
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let Some(data) = self.data() {
            body["data"] = data;
        }

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Redis(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
