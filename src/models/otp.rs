use serde::{Deserialize, Serialize};

/// Cached OTP record, keyed by phone number. A reverse entry keyed by the
/// code itself maps back to the phone and shares the same TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub otp: String,
    pub country: String,
    #[serde(rename = "expireAt")]
    pub expire_at: i64,
}
