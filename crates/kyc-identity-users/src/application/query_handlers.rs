//! Query handlers for the User context.
//!
//! Read-only lookups that return serializable views; nothing here buffers
//! events or saves.

use chrono::{DateTime, Utc};
use kyc_identity_core::error::DomainError;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::command_handlers::normalize_email;
use crate::application::ports::{PasswordHasher, Principal, TokenIssuer};
use crate::domain::aggregates::User;
use crate::domain::repository::UserStore;
use crate::domain::value_objects::KycStatus;

/// Read-only view of a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    /// The user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// KYC state.
    pub kyc_status: KycStatus,
    /// Shorthand for `kyc_status == verified`.
    pub is_verified: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last accepted mutation.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&User> for UserView {
    type Error = DomainError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::Infrastructure("user has not been persisted".into()))?;
        Ok(Self {
            id,
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            kyc_status: user.kyc_status(),
            is_verified: user.kyc_status() == KycStatus::Verified,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        })
    }
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: UserView,
}

/// Retrieves a user profile by ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no user has the ID, or
/// propagates storage failures.
pub async fn get_user_profile(
    user_id: Uuid,
    store: &dyn UserStore,
) -> Result<UserView, DomainError> {
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DomainError::AggregateNotFound(format!("user {user_id}")))?;
    UserView::try_from(&user)
}

/// Checks credentials and issues a bearer token.
///
/// Unknown email and wrong password fail the same way.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` on bad credentials, or propagates
/// hashing, signing or storage failures.
#[instrument(skip_all)]
pub async fn authenticate(
    email: &str,
    password: &str,
    hasher: &dyn PasswordHasher,
    tokens: &dyn TokenIssuer,
    store: &dyn UserStore,
) -> Result<AuthenticatedSession, DomainError> {
    let invalid = || DomainError::Unauthorized("invalid credentials".into());

    let user = store
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or_else(invalid)?;
    if !hasher.verify(password, user.password_hash())? {
        return Err(invalid());
    }

    let view = UserView::try_from(&user)?;
    let token = tokens.issue(&Principal {
        user_id: view.id,
        email: view.email.clone(),
    })?;
    info!(user_id = %view.id, "user authenticated");
    Ok(AuthenticatedSession { token, user: view })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockUserStore, PlainTokenIssuer, PrefixHasher, fixed_now, stored_snapshot};

    #[tokio::test]
    async fn test_get_user_profile_returns_view() {
        // Arrange
        let user_id = Uuid::new_v4();
        let store = MockUserStore::with(vec![stored_snapshot(
            user_id,
            "juan@x.com",
            KycStatus::Verified,
        )]);

        // Act
        let view = get_user_profile(user_id, &store).await.unwrap();

        // Assert
        assert_eq!(
            view,
            UserView {
                id: user_id,
                name: "Juan".into(),
                email: "juan@x.com".into(),
                kyc_status: KycStatus::Verified,
                is_verified: true,
                created_at: fixed_now(),
                updated_at: fixed_now(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_user_profile_returns_not_found_for_unknown_id() {
        let store = MockUserStore::default();

        let result = get_user_profile(Uuid::new_v4(), &store).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(_) => {}
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_user_view_serializes_status_lowercase() {
        let user = User::rehydrate(stored_snapshot(
            Uuid::new_v4(),
            "juan@x.com",
            KycStatus::Pending,
        ));

        let json = serde_json::to_value(UserView::try_from(&user).unwrap()).unwrap();

        assert_eq!(json["kyc_status"], "pending");
        assert_eq!(json["is_verified"], false);
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_authenticate_issues_token_for_valid_credentials() {
        // Arrange
        let user_id = Uuid::new_v4();
        let store = MockUserStore::with(vec![stored_snapshot(
            user_id,
            "juan@x.com",
            KycStatus::Pending,
        )]);

        // Act
        let session = authenticate(
            " JUAN@x.com",
            "secret-pass",
            &PrefixHasher,
            &PlainTokenIssuer,
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(session.token, format!("token:{user_id}"));
        assert_eq!(session.user.id, user_id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password_and_unknown_email_alike() {
        let store = MockUserStore::with(vec![stored_snapshot(
            Uuid::new_v4(),
            "juan@x.com",
            KycStatus::Pending,
        )]);

        let wrong_password = authenticate(
            "juan@x.com",
            "not-the-pass",
            &PrefixHasher,
            &PlainTokenIssuer,
            &store,
        )
        .await
        .unwrap_err();
        let unknown_email = authenticate(
            "nobody@x.com",
            "secret-pass",
            &PrefixHasher,
            &PlainTokenIssuer,
            &store,
        )
        .await
        .unwrap_err();

        match (wrong_password, unknown_email) {
            (DomainError::Unauthorized(a), DomainError::Unauthorized(b)) => assert_eq!(a, b),
            other => panic!("expected Unauthorized twice, got {other:?}"),
        }
    }
}
