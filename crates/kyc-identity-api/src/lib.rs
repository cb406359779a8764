//! KYC Identity: HTTP API.
//!
//! Exposes registration, login, KYC submission and profile management over
//! axum, wiring the User use cases to concrete adapters (argon2 hashing, JWT
//! bearer tokens, the KYC provider and a user store).

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod kyc;
pub mod routes;
pub mod state;
pub mod telemetry;

#[cfg(test)]
mod testing;

use state::AppState;

/// Builds the full application router.
// TODO: Replace CorsLayer::permissive() with restricted origins for production.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/auth", routes::auth::router())
        .nest("/api/v1/kyc", routes::kyc::router())
        .nest("/api/v1/users", routes::users::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
