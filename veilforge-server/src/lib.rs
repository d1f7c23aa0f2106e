//! Shared state and HTTP API for the VeilForge entitlement server.

use std::sync::Arc;
use axum::routing::{get, post, put};
use axum::Router;
use veilforge_entitlement::EntitlementService;

pub mod auth;
pub mod error;
pub mod handlers;

pub use auth::{bearer_token, AuthError, SignedTokenVerifier, TokenVerifier};
pub use error::ApiError;

/// Shared application state threaded through axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EntitlementService>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Optional key protecting the admin plan override.
    pub admin_key: Option<String>,
}

/// Build the HTTP API router with the given application state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/user-status", get(handlers::user_status))
        .route("/api/user-premium-status", get(handlers::premium_status))
        .route("/api/video-watched", post(handlers::video_watched))
        .route("/api/consume-trial", post(handlers::consume_trial))
        .route("/api/process-multilayer", post(handlers::process_multilayer))
        .route("/api/upgrade", post(handlers::upgrade))
        .route(
            "/api/admin/principals/{id}/plan",
            put(handlers::admin_set_plan),
        )
        .with_state(state)
}
