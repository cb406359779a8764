//! State builders for the route tests of this crate.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use kyc_identity_core::bus::EventBus;
use kyc_identity_store::InMemoryUserStore;
use kyc_identity_test_support::FixedClock;
use kyc_identity_users::application::command_handlers::handle_register_user;
use kyc_identity_users::application::query_handlers::authenticate;
use kyc_identity_users::domain::commands::RegisterUser;
use kyc_identity_users::domain::repository::{UserRepository, UserStore};
use uuid::Uuid;

use crate::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use crate::kyc::AutoApproveKycVerifier;
use crate::state::AppState;

pub(crate) fn test_state() -> AppState {
    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    AppState::new(
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )),
        UserRepository::new(store, Arc::new(EventBus::new())),
        Arc::new(Argon2PasswordHasher::with_cost(8, 1).unwrap()),
        Arc::new(JwtTokenIssuer::new(b"test-secret", 1)),
        Arc::new(AutoApproveKycVerifier),
    )
}

/// Registers a user directly through the use cases and returns a bearer
/// token for it.
pub(crate) async fn register_and_login(state: &AppState, email: &str) -> String {
    handle_register_user(
        &RegisterUser {
            correlation_id: Uuid::new_v4(),
            name: "Juan".into(),
            email: email.into(),
            password: "secret-pass".into(),
        },
        state.clock.as_ref(),
        state.hasher.as_ref(),
        &state.users,
    )
    .await
    .unwrap();
    authenticate(
        email,
        "secret-pass",
        state.hasher.as_ref(),
        state.tokens.as_ref(),
        state.users.store(),
    )
    .await
    .unwrap()
    .token
}
