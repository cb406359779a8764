//! Outbound ports of the User context.
//!
//! Password hashing, token issuance and the KYC decision are external
//! collaborators; the use cases only see these traits. Adapters live in the
//! API crate.

use async_trait::async_trait;
use kyc_identity_core::error::DomainError;
use uuid::Uuid;

use crate::domain::aggregates::User;
use crate::domain::value_objects::{KycDocuments, KycStatus};

/// One-way credential hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `plain` into an opaque, self-describing string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if hashing fails.
    fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// Returns `true` if `plain` matches `hash`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `hash` is malformed.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}

/// The identity a bearer token stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated user.
    pub user_id: Uuid,
    /// Email at the time the token was issued.
    pub email: String,
}

/// Issues and checks bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issues a token for `principal`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if signing fails.
    fn issue(&self, principal: &Principal) -> Result<String, DomainError>;

    /// Checks `token` and returns the principal it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for a malformed, tampered or
    /// expired token.
    fn verify(&self, token: &str) -> Result<Principal, DomainError>;
}

/// The KYC decision service.
#[async_trait]
pub trait KycVerifier: Send + Sync {
    /// Decides on `documents` submitted by `user`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the provider is unreachable.
    async fn verify_identity(
        &self,
        user: &User,
        documents: &KycDocuments,
    ) -> Result<KycStatus, DomainError>;
}
