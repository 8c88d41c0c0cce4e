use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token: health check and the credential
/// exchange that produces tokens in the first place.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Load balancer / monitoring health check.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/register
        // New accounts always receive the `user` role.
        .route("/api/auth/register", post(handlers::register))
        // POST /api/auth/login
        // Returns `{ "token": ... }` for valid credentials.
        .route("/api/auth/login", post(handlers::login))
}
