//! Domain error types.

use thiserror::Error;

/// Illegal state transitions rejected by an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// `register` was called on an aggregate that already has an identity.
    #[error("user is already registered")]
    AlreadyRegistered,

    /// KYC verification requested for an already verified user.
    #[error("KYC is already verified")]
    AlreadyVerified,

    /// KYC rejection requested for an already rejected user.
    #[error("KYC is already rejected")]
    AlreadyRejected,
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found. Carries the lookup key.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),

    /// An aggregate operation was attempted in a state that forbids it.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    /// The operation conflicts with existing state (e.g. a taken email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credentials or tokens were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
