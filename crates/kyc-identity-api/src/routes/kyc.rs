//! KYC submission route.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use kyc_identity_users::application::command_handlers;
use kyc_identity_users::domain::commands;
use kyc_identity_users::domain::value_objects::{KycDocuments, KycStatus};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /verify.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The identity documents to check.
    pub documents: KycDocuments,
}

/// Response body for POST /verify.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// Resulting KYC status.
    pub status: KycStatus,
    /// Human-readable outcome.
    pub message: &'static str,
    /// Correlation ID of this verification, as found in logs and events.
    pub verification_id: Uuid,
}

fn outcome_message(status: KycStatus) -> &'static str {
    match status {
        KycStatus::Verified => "identity verified",
        KycStatus::Rejected => "identity documents rejected",
        KycStatus::Pending => "verification pending review",
    }
}

/// POST /verify
#[instrument(skip_all, fields(user_id = %user.0.user_id))]
async fn verify(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let command = commands::SubmitKyc {
        correlation_id: Uuid::new_v4(),
        user_id: user.0.user_id,
        documents: request.documents,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_kyc command");

    let result = command_handlers::handle_submit_kyc(
        &command,
        state.clock.as_ref(),
        state.kyc.as_ref(),
        &state.users,
    )
    .await?;
    let status = result.user.kyc_status();

    Ok(Json(VerifyResponse {
        status,
        message: outcome_message(status),
        verification_id: command.correlation_id,
    }))
}

/// Returns the router for KYC submission.
pub fn router() -> Router<AppState> {
    Router::new().route("/verify", post(verify))
}
