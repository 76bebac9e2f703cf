use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Request DTOs

// `+` followed by 1-3 digits
fn validate_country(value: &str) -> Result<(), ValidationError> {
    if let Some(rest) = value.strip_prefix('+') {
        if (1..=3).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit()) {
            return Ok(());
        }
    }
    Err(ValidationError::new("country_code"))
}

fn validate_otp(value: &str) -> Result<(), ValidationError> {
    if (4..=10).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PhoneRequestOtp {
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(custom(function = validate_country))]
    pub country: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PhoneVerifyOtp {
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(custom(function = validate_otp))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRegister {
    #[validate(length(max = 255))]
    pub firstname: Option<String>,

    #[validate(length(max = 255))]
    pub lastname: Option<String>,

    #[validate(length(max = 255))]
    pub fullname: Option<String>,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 255, message = "Password must be 6-255 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailLogin {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UsernameRegister {
    #[validate(length(max = 255))]
    pub firstname: Option<String>,

    #[validate(length(max = 255))]
    pub lastname: Option<String>,

    #[validate(length(max = 255))]
    pub fullname: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UsernameLogin {
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UsernameForget {
    #[validate(length(min = 1, max = 255))]
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgetChange {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub i18n: &'static str,
}

impl StatusResponse {
    pub fn ok(i18n: &'static str) -> Self {
        Self { success: true, i18n }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub i18n: &'static str,
    pub data: TokenData,
}

impl TokenResponse {
    pub fn ok(i18n: &'static str, token: String) -> Self {
        Self {
            success: true,
            i18n,
            data: TokenData { token },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_pattern() {
        for good in ["+1", "+98", "+358"] {
            assert!(validate_country(good).is_ok(), "{good} should pass");
        }
        for bad in ["1", "+", "+1234", "+1a", "++1", ""] {
            assert!(validate_country(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn otp_pattern() {
        assert!(validate_otp("1234").is_ok());
        assert!(validate_otp("1234567890").is_ok());
        assert!(validate_otp("123").is_err());
        assert!(validate_otp("12345678901").is_err());
        assert!(validate_otp("12a4").is_err());
    }
}
