pub mod config;
pub mod otp;
pub mod user;
