//! Registration and login routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use kyc_identity_core::error::DomainError;
use kyc_identity_users::application::query_handlers::{self, UserView};
use kyc_identity_users::application::command_handlers;
use kyc_identity_users::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Request body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Public identity fields of a user.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// The user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl From<UserView> for UserSummary {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            email: view.email,
        }
    }
}

/// Response body for POST /login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: UserSummary,
}

/// POST /register
#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let command = commands::RegisterUser {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        password: request.password,
    };

    info!(correlation_id = %command.correlation_id, "handling register_user command");

    let result = command_handlers::handle_register_user(
        &command,
        state.clock.as_ref(),
        state.hasher.as_ref(),
        &state.users,
    )
    .await?;
    let view = UserView::try_from(&result.user)?;

    Ok((StatusCode::CREATED, Json(UserSummary::from(view))))
}

/// POST /login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(DomainError::Validation("email and password are required".into()).into());
    }

    let session = query_handlers::authenticate(
        &request.email,
        &request.password,
        state.hasher.as_ref(),
        state.tokens.as_ref(),
        state.users.store(),
    )
    .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user.into(),
    }))
}

/// Returns the router for registration and login.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
