use axum::{middleware, routing::get, Router};

use crate::state::AppState;

// Identity-bound endpoints: session token required.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/whoisthis", get(crate::handlers::auth::whoisthis))
        .layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::session_auth,
        ))
}
