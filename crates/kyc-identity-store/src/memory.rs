//! In-memory implementation of the `UserStore` trait.
//!
//! Used when no `DATABASE_URL` is configured and by the API tests. Honours
//! the same create/update and email-uniqueness contract as `PgUserStore`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use kyc_identity_core::error::DomainError;
use kyc_identity_core::repository::PersistenceStrategy;
use kyc_identity_users::domain::aggregates::{User, UserSnapshot};
use kyc_identity_users::domain::repository::UserStore;

/// Process-local user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<HashMap<Uuid, UserSnapshot>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no user is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PersistenceStrategy<User> for InMemoryUserStore {
    async fn save_to_database(&self, user: &User) -> Result<User, DomainError> {
        let mut snapshot = user.snapshot();
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);

        let id = match snapshot.id {
            None => Uuid::now_v7(),
            Some(id) if rows.contains_key(&id) => id,
            Some(id) => return Err(DomainError::AggregateNotFound(format!("user {id}"))),
        };
        if rows
            .values()
            .any(|row| row.email == snapshot.email && row.id != Some(id))
        {
            return Err(DomainError::Conflict("email already registered".into()));
        }

        if let Some(existing) = rows.get(&id) {
            snapshot.created_at = existing.created_at;
        }
        snapshot.id = Some(id);
        debug!(user_id = %id, "storing user");
        rows.insert(id, snapshot.clone());
        Ok(User::rehydrate(snapshot))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .map(User::rehydrate))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|row| row.email == email)
            .cloned()
            .map(User::rehydrate))
    }
}
