//! Storage seam for the User aggregate.

use async_trait::async_trait;
use kyc_identity_core::error::DomainError;
use kyc_identity_core::repository::{AggregateRepository, PersistenceStrategy};
use uuid::Uuid;

use super::aggregates::User;

/// Persistence primitives for users.
///
/// `save_to_database` creates the row when the user has no identity yet and
/// updates it otherwise. Email uniqueness is enforced here, not by the
/// aggregate.
#[async_trait]
pub trait UserStore: PersistenceStrategy<User> {
    /// Loads the user with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Loads the user registered with `email`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

/// Repository used by the User use cases.
pub type UserRepository = AggregateRepository<User, dyn UserStore>;
