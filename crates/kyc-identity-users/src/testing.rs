//! Doubles for the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kyc_identity_core::bus::EventBus;
use kyc_identity_core::error::DomainError;
use kyc_identity_core::repository::PersistenceStrategy;
use uuid::Uuid;

use crate::application::ports::{KycVerifier, PasswordHasher, Principal, TokenIssuer};
use crate::domain::aggregates::{User, UserSnapshot};
use crate::domain::events::UserEvent;
use crate::domain::repository::{UserRepository, UserStore};
use crate::domain::value_objects::{KycDocuments, KycStatus};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

pub(crate) fn stored_snapshot(id: Uuid, email: &str, kyc_status: KycStatus) -> UserSnapshot {
    UserSnapshot {
        id: Some(id),
        name: "Juan".into(),
        email: email.into(),
        password_hash: "hashed:secret-pass".into(),
        kyc_status,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/// HashMap-backed store with an optional forced failure.
#[derive(Default)]
pub(crate) struct MockUserStore {
    rows: Mutex<HashMap<Uuid, UserSnapshot>>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl MockUserStore {
    pub(crate) fn with(snapshots: Vec<UserSnapshot>) -> Self {
        let rows = snapshots
            .into_iter()
            .filter_map(|s| s.id.map(|id| (id, s)))
            .collect();
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub(crate) fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub(crate) fn row(&self, id: Uuid) -> Option<UserSnapshot> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PersistenceStrategy<User> for MockUserStore {
    async fn save_to_database(&self, user: &User) -> Result<User, DomainError> {
        *self.saves.lock().unwrap() += 1;
        if self.fail_saves {
            return Err(DomainError::Infrastructure("connection refused".into()));
        }
        let mut snapshot = user.snapshot();
        let id = *snapshot.id.get_or_insert_with(Uuid::new_v4);
        self.rows.lock().unwrap().insert(id, snapshot.clone());
        Ok(User::rehydrate(snapshot))
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.row(id).map(User::rehydrate))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|s| s.email == email)
            .cloned()
            .map(User::rehydrate))
    }
}

pub(crate) fn repository(
    store: Arc<MockUserStore>,
    bus: Arc<EventBus<UserEvent>>,
) -> UserRepository {
    let store: Arc<dyn UserStore> = store;
    UserRepository::new(store, bus)
}

/// Prefixes the plain text; verification compares the prefix form.
pub(crate) struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{plain}"))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("hashed:{plain}"))
    }
}

/// Token is `token:<user_id>`.
pub(crate) struct PlainTokenIssuer;

impl TokenIssuer for PlainTokenIssuer {
    fn issue(&self, principal: &Principal) -> Result<String, DomainError> {
        Ok(format!("token:{}", principal.user_id))
    }

    fn verify(&self, token: &str) -> Result<Principal, DomainError> {
        token
            .strip_prefix("token:")
            .and_then(|id| id.parse().ok())
            .map(|user_id| Principal {
                user_id,
                email: String::new(),
            })
            .ok_or_else(|| DomainError::Unauthorized("invalid token".into()))
    }
}

/// Always answers with the configured status.
pub(crate) struct FixedVerifier(pub KycStatus);

#[async_trait]
impl KycVerifier for FixedVerifier {
    async fn verify_identity(
        &self,
        _user: &User,
        _documents: &KycDocuments,
    ) -> Result<KycStatus, DomainError> {
        Ok(self.0)
    }
}
