use axum::{extract::State, Json};
use validator::Validate;

use crate::dtos::auth_dtos::{PhoneRequestOtp, PhoneVerifyOtp, StatusResponse, TokenResponse};
use crate::errors::Result;
use crate::state::AppState;

// POST /api/v1/auth/phone/request
pub async fn request(
    State(state): State<AppState>,
    Json(body): Json<PhoneRequestOtp>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;

    state.otp_flow.request(&body.phone, &body.country).await?;
    Ok(Json(StatusResponse::ok("OTP_SENT")))
}

// POST /api/v1/auth/phone/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<PhoneVerifyOtp>,
) -> Result<Json<TokenResponse>> {
    body.validate()?;

    let token = state.otp_flow.verify(&body.phone, &body.otp).await?;
    Ok(Json(TokenResponse::ok("LOGGEDIN_SUCCESSFULLY", token)))
}
