pub mod config_service;
pub mod email_service;
pub mod forget_flow;
pub mod otp_flow;
pub mod password_service;
pub mod sms_service;
pub mod token_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use config_service::ConfigStore;
pub use email_service::EmailSender;
pub use password_service::CredentialStore;
pub use sms_service::SmsSender;
pub use token_service::TokenIssuer;
pub use user_service::UserDirectory;
