use axum::{extract::State, Json};
use validator::Validate;

use crate::dtos::auth_dtos::{EmailLogin, EmailRegister, StatusResponse, TokenResponse};
use crate::errors::{AppError, Result};
use crate::events::AuthEvent;
use crate::models::user::{NewUser, UniqueField};
use crate::state::AppState;

// POST /api/v1/auth/email/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<EmailRegister>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;

    if state
        .users
        .get_by_unique(UniqueField::Email, &body.email)
        .await?
        .is_some()
    {
        return Err(AppError::EmailExists { email: body.email });
    }

    let user = state
        .users
        .create(
            NewUser {
                firstname: body.firstname,
                lastname: body.lastname,
                fullname: body.fullname,
                email: Some(body.email),
                ..Default::default()
            },
            UniqueField::Email,
        )
        .await?;

    state.passwords.save(&user.id_hex(), &body.password).await?;
    Ok(Json(StatusResponse::ok("REGISTERED_SUCCESSFULLY")))
}

// POST /api/v1/auth/email/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<EmailLogin>,
) -> Result<Json<TokenResponse>> {
    body.validate()?;

    let user = state
        .users
        .get_by_unique(UniqueField::Email, &body.email)
        .await?
        .ok_or(AppError::BadEmail)?;

    if !state
        .passwords
        .compare(&user.id_hex(), &body.password)
        .await?
    {
        return Err(AppError::BadPassword);
    }

    let token = state.tokens.issue(&user.id_hex(), "auth").await?;
    state.events.emit(AuthEvent::UserLogin {
        user: user.into(),
        token: token.clone(),
    });

    Ok(Json(TokenResponse::ok("LOGGEDIN_SUCCESSFULLY", token)))
}
