//! Command handlers for the User context.
//!
//! Each handler loads or creates the aggregate, runs one domain operation
//! and hands the aggregate to the repository, which persists it and then
//! publishes the buffered events.

use kyc_identity_core::aggregate::AggregateRoot;
use kyc_identity_core::clock::Clock;
use kyc_identity_core::error::DomainError;
use kyc_identity_core::event::DomainEvent;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{KycVerifier, PasswordHasher};
use crate::domain::aggregates::{NewUser, User};
use crate::domain::commands::{RegisterUser, RejectKyc, SubmitKyc, UpdateProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_objects::{KycStatus, ProfileChanges};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reason recorded when the KYC provider turns documents down.
pub const PROVIDER_REJECTION_REASON: &str = "documents rejected by KYC provider";

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct UserCommandResult {
    /// The user as persisted (or as loaded, when nothing changed).
    pub user: User,
    /// IDs of the events published by the save, in order. Empty when the
    /// command changed nothing.
    pub event_ids: Vec<Uuid>,
}

/// Trims and lower-cases an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("name must not be empty".into()));
    }
    Ok(name.to_owned())
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = normalize_email(email);
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(DomainError::Validation(format!(
            "invalid email address: {email}"
        ))),
    }
}

async fn load_user(repo: &UserRepository, user_id: Uuid) -> Result<User, DomainError> {
    repo.store()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DomainError::AggregateNotFound(format!("user {user_id}")))
}

async fn persist(repo: &UserRepository, mut user: User) -> Result<UserCommandResult, DomainError> {
    let event_ids = user
        .pending_events()
        .iter()
        .map(|event| event.metadata().event_id)
        .collect();
    let user = repo.save(&mut user).await?;
    Ok(UserCommandResult { user, event_ids })
}

/// Handles the `RegisterUser` command: validates input, hashes the password,
/// registers a new user and persists it.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty name, a malformed email or
/// a short password, `DomainError::Conflict` if the email is taken, and
/// propagates hashing or storage failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_register_user(
    command: &RegisterUser,
    clock: &dyn Clock,
    hasher: &dyn PasswordHasher,
    repo: &UserRepository,
) -> Result<UserCommandResult, DomainError> {
    let name = validate_name(&command.name)?;
    let email = validate_email(&command.email)?;
    if command.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if repo.store().find_by_email(&email).await?.is_some() {
        return Err(DomainError::Conflict(format!(
            "email already registered: {email}"
        )));
    }

    let password_hash = hasher.hash(&command.password)?;
    let mut user = User::new(
        NewUser {
            name,
            email,
            password_hash,
        },
        clock,
    );
    user.register(command.correlation_id, clock)?;

    let result = persist(repo, user).await?;
    info!(user_id = ?result.user.id(), "user registered");
    Ok(result)
}

/// Handles the `SubmitKyc` command: asks the KYC provider for a decision and
/// records it on the user.
///
/// A `pending` decision leaves the user untouched and skips the save.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown user,
/// `DomainError::InvariantViolation` if the decision repeats the current
/// status, and propagates provider or storage failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, user_id = %command.user_id))]
pub async fn handle_submit_kyc(
    command: &SubmitKyc,
    clock: &dyn Clock,
    verifier: &dyn KycVerifier,
    repo: &UserRepository,
) -> Result<UserCommandResult, DomainError> {
    let mut user = load_user(repo, command.user_id).await?;

    let decision = verifier.verify_identity(&user, &command.documents).await?;
    info!(decision = %decision, "KYC provider decided");
    match decision {
        KycStatus::Verified => {
            user.verify_kyc(command.documents.clone(), command.correlation_id, clock)?;
        }
        KycStatus::Rejected => {
            user.reject_kyc(PROVIDER_REJECTION_REASON, command.correlation_id, clock)?;
        }
        KycStatus::Pending => {
            return Ok(UserCommandResult {
                user,
                event_ids: Vec::new(),
            });
        }
    }

    persist(repo, user).await
}

/// Handles the `RejectKyc` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown user,
/// `DomainError::InvariantViolation` if KYC is already rejected, and
/// propagates storage failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, user_id = %command.user_id))]
pub async fn handle_reject_kyc(
    command: &RejectKyc,
    clock: &dyn Clock,
    repo: &UserRepository,
) -> Result<UserCommandResult, DomainError> {
    let reason = command.reason.trim();
    if reason.is_empty() {
        return Err(DomainError::Validation(
            "rejection reason must not be empty".into(),
        ));
    }
    let mut user = load_user(repo, command.user_id).await?;
    user.reject_kyc(reason, command.correlation_id, clock)?;
    persist(repo, user).await
}

/// Handles the `UpdateProfile` command. Nothing is saved when the requested
/// values equal the current ones.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown user,
/// `DomainError::Validation` for an empty name or malformed email,
/// `DomainError::Conflict` if the new email belongs to another user, and
/// propagates storage failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, user_id = %command.user_id))]
pub async fn handle_update_profile(
    command: &UpdateProfile,
    clock: &dyn Clock,
    repo: &UserRepository,
) -> Result<UserCommandResult, DomainError> {
    let changes = ProfileChanges {
        name: command.changes.name.as_deref().map(validate_name).transpose()?,
        email: command
            .changes
            .email
            .as_deref()
            .map(validate_email)
            .transpose()?,
    };
    let mut user = load_user(repo, command.user_id).await?;

    if let Some(email) = changes.email.as_deref().filter(|e| *e != user.email()) {
        let owner = repo.store().find_by_email(email).await?;
        if owner.is_some_and(|owner| owner.id() != user.id()) {
            return Err(DomainError::Conflict(format!(
                "email already registered: {email}"
            )));
        }
    }

    if !user.update_profile(changes, command.correlation_id, clock) {
        return Ok(UserCommandResult {
            user,
            event_ids: Vec::new(),
        });
    }
    persist(repo, user).await
}
