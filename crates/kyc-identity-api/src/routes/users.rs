//! Routes for the authenticated user's own profile.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use tracing::{info, instrument};
use uuid::Uuid;

use kyc_identity_users::application::query_handlers::{self, UserView};
use kyc_identity_users::application::command_handlers;
use kyc_identity_users::domain::commands;
use kyc_identity_users::domain::value_objects::ProfileChanges;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /me
#[instrument(skip_all, fields(user_id = %user.0.user_id))]
async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserView>, ApiError> {
    let view = query_handlers::get_user_profile(user.0.user_id, state.users.store()).await?;
    Ok(Json(view))
}

/// PATCH /me
#[instrument(skip_all, fields(user_id = %user.0.user_id))]
async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<UserView>, ApiError> {
    let command = commands::UpdateProfile {
        correlation_id: Uuid::new_v4(),
        user_id: user.0.user_id,
        changes,
    };

    info!(correlation_id = %command.correlation_id, "handling update_profile command");

    let result =
        command_handlers::handle_update_profile(&command, state.clock.as_ref(), &state.users)
            .await?;

    Ok(Json(UserView::try_from(&result.user)?))
}

/// Returns the router for the profile resource.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}
