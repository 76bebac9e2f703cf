use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::errors::{AppError, Result};
use crate::models::user::{SessionClaims, UserResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WhoisResponse {
    pub success: bool,
    pub data: UserResponse,
}

// GET /api/v1/auth/whoisthis
//
// Echoes the profile behind the presented session token.
pub async fn whoisthis(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<WhoisResponse>> {
    let user = state
        .users
        .get_by_id(&claims.sub)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(WhoisResponse {
        success: true,
        data: user.into(),
    }))
}
