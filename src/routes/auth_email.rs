use axum::{routing::post, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(crate::handlers::auth_email::register))
        .route("/login", post(crate::handlers::auth_email::login))
}
