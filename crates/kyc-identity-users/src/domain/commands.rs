//! Commands for the User context.

use uuid::Uuid;

use super::value_objects::{KycDocuments, ProfileChanges};

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (normalised before use).
    pub email: String,
    /// Plain-text password; hashed before it reaches the aggregate.
    pub password: String,
}

/// Command to submit identity documents for KYC verification.
#[derive(Debug, Clone)]
pub struct SubmitKyc {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user identifier.
    pub user_id: Uuid,
    /// The submitted documents.
    pub documents: KycDocuments,
}

/// Command to reject a user's KYC.
#[derive(Debug, Clone)]
pub struct RejectKyc {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user identifier.
    pub user_id: Uuid,
    /// Why the documents were rejected.
    pub reason: String,
}

/// Command to change a user's profile fields.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user identifier.
    pub user_id: Uuid,
    /// Requested changes; `None` fields are left untouched.
    pub changes: ProfileChanges,
}
