use axum::{routing::post, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(crate::handlers::auth_username::register))
        .route("/login", post(crate::handlers::auth_username::login))
        .route("/forget", post(crate::handlers::auth_username::forget))
}
