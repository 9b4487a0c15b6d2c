//! Route definitions for the portal.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the portal router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::load_widget))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
