use axum::{routing::post, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/request", post(crate::handlers::auth_forget::request))
        .route("/change", post(crate::handlers::auth_forget::change))
}
