use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use crate::dtos::auth_dtos::{ForgetChange, ForgetRequest, StatusResponse};
use crate::errors::{AppError, Result};
use crate::state::AppState;

/// The creator tag identifies the client/tenant behind the request and is
/// threaded explicitly into the reset flow; reset tokens only redeem under
/// the same tag.
pub fn creator_from(headers: &HeaderMap) -> Result<String> {
    headers
        .get("x-creator")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("missing x-creator header".to_string()))
}

// POST /api/v1/auth/forget/request
pub async fn request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ForgetRequest>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;
    let creator = creator_from(&headers)?;

    state.forget_flow.request(&body.email, &creator).await?;
    Ok(Json(StatusResponse::ok("FORGET_REQUEST_EMAIL_SENT")))
}

// POST /api/v1/auth/forget/change
pub async fn change(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ForgetChange>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;
    let creator = creator_from(&headers)?;

    state
        .forget_flow
        .change(&body.token, &body.password, &creator)
        .await?;
    Ok(Json(StatusResponse::ok("PASSWORD_CHANGED")))
}
