//! Shared application state.

use std::fmt;
use std::sync::Arc;

use kyc_identity_core::clock::Clock;
use kyc_identity_users::application::ports::{KycVerifier, PasswordHasher, TokenIssuer};
use kyc_identity_users::domain::repository::UserRepository;

/// Application state shared across all request handlers.
///
/// Every collaborator is constructed by the caller and passed in; there is
/// no process-wide registry.
#[derive(Clone)]
pub struct AppState {
    /// Clock for domain timestamps.
    pub clock: Arc<dyn Clock>,
    /// User repository (store plus event bus).
    pub users: UserRepository,
    /// Credential hashing.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Bearer token issuance and checking.
    pub tokens: Arc<dyn TokenIssuer>,
    /// KYC decision service.
    pub kyc: Arc<dyn KycVerifier>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        users: UserRepository,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        kyc: Arc<dyn KycVerifier>,
    ) -> Self {
        Self {
            clock,
            users,
            hasher,
            tokens,
            kyc,
        }
    }
}
