use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use crate::dtos::auth_dtos::{StatusResponse, TokenResponse, UsernameForget, UsernameLogin, UsernameRegister};
use crate::errors::{AppError, Result};
use crate::events::AuthEvent;
use crate::handlers::auth_forget::creator_from;
use crate::models::user::{NewUser, UniqueField};
use crate::state::AppState;

// POST /api/v1/auth/username/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<UsernameRegister>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;

    if state
        .users
        .get_by_unique(UniqueField::Username, &body.username)
        .await?
        .is_some()
    {
        return Err(AppError::UsernameExists {
            username: body.username,
        });
    }

    if let Some(email) = body.email.as_deref().filter(|e| !e.is_empty()) {
        if state
            .users
            .get_by_unique(UniqueField::Email, email)
            .await?
            .is_some()
        {
            return Err(AppError::EmailExists {
                email: email.to_string(),
            });
        }
    }

    let user = state
        .users
        .create(
            NewUser {
                firstname: body.firstname,
                lastname: body.lastname,
                fullname: body.fullname,
                email: body.email,
                username: Some(body.username),
                ..Default::default()
            },
            UniqueField::Username,
        )
        .await?;

    state.passwords.save(&user.id_hex(), &body.password).await?;
    Ok(Json(StatusResponse::ok("REGISTERED_SUCCESSFULLY")))
}

// POST /api/v1/auth/username/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<UsernameLogin>,
) -> Result<Json<TokenResponse>> {
    body.validate()?;

    let user = state
        .users
        .get_by_unique(UniqueField::Username, &body.username)
        .await?
        .ok_or(AppError::BadUsername)?;

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

// POST /api/v1/auth/username/forget
//
// Username holders reset by email too: resolve the account, require an email
// on file, then hand over to the reset-token flow.
pub async fn forget(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UsernameForget>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;
    let creator = creator_from(&headers)?;

    let user = state
        .users
        .get_by_unique(UniqueField::Username, &body.username)
        .await?
        .ok_or(AppError::BadUsername)?;

    let email = user
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(AppError::EmailNotFound)?;

    state.forget_flow.request(email, &creator).await?;
    Ok(Json(StatusResponse::ok("FORGET_REQUEST_EMAIL_SENT")))
}
