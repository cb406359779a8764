//! Aggregate roots for the User context.

use chrono::{DateTime, Utc};
use kyc_identity_core::aggregate::{AggregateRoot, EventBuffer};
use kyc_identity_core::clock::Clock;
use kyc_identity_core::error::{DomainError, InvariantViolation};
use kyc_identity_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    KycRejected, KycVerified, ProfileUpdated, UserEvent, UserEventKind, UserRegistered,
};
use super::value_objects::{KycDocuments, KycStatus, ProfileChanges};

/// Input for creating a not-yet-persisted user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Already hashed credential.
    pub password_hash: String,
}

/// Persisted field snapshot of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    /// Storage identity; `None` before the first save.
    pub id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Email address (unique in storage).
    pub email: String,
    /// Opaque hashed credential.
    pub password_hash: String,
    /// KYC state.
    pub kyc_status: KycStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last accepted mutation.
    pub updated_at: DateTime<Utc>,
}

/// The aggregate root for a user identity.
#[derive(Debug, Clone)]
pub struct User {
    id: Option<Uuid>,
    name: String,
    email: String,
    password_hash: String,
    kyc_status: KycStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Set once `register` has been accepted on this instance.
    registered: bool,
    events: EventBuffer<UserEvent>,
}

impl User {
    /// Creates an unregistered user with `pending` KYC status.
    #[must_use]
    pub fn new(new_user: NewUser, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id: None,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            kyc_status: KycStatus::Pending,
            created_at: now,
            updated_at: now,
            registered: false,
            events: EventBuffer::new(),
        }
    }

    /// Rebuilds a user from its stored snapshot. The result has no pending
    /// events and starts at version 0.
    #[must_use]
    pub fn rehydrate(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            email: snapshot.email,
            password_hash: snapshot.password_hash,
            kyc_status: snapshot.kyc_status,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            registered: snapshot.id.is_some(),
            events: EventBuffer::new(),
        }
    }

    /// Current field snapshot, as written to storage.
    #[must_use]
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            kyc_status: self.kyc_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Storage identity, if persisted.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Hashed credential.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// KYC state.
    #[must_use]
    pub fn kyc_status(&self) -> KycStatus {
        self.kyc_status
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last accepted mutation.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn raise(&mut self, kind: UserEventKind, correlation_id: Uuid, occurred_at: DateTime<Utc>) {
        let metadata = EventMetadata::new(
            kind.event_type().as_str(),
            self.id,
            self.events.next_version(),
            correlation_id,
            occurred_at,
        );
        self.events.apply(UserEvent { metadata, kind });
    }

    /// Registers the user, producing a `UserRegistered` event.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation::AlreadyRegistered` if the user already
    /// has an identity or was registered earlier on this instance.
    pub fn register(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.id.is_some() || self.registered {
            return Err(InvariantViolation::AlreadyRegistered.into());
        }
        self.registered = true;
        let kind = UserEventKind::Registered(UserRegistered {
            email: self.email.clone(),
            name: self.name.clone(),
        });
        self.raise(kind, correlation_id, clock.now());
        Ok(())
    }

    /// Marks the user's KYC as verified, producing a `KycVerified` event.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation::AlreadyVerified` if KYC is already
    /// verified.
    pub fn verify_kyc(
        &mut self,
        documents: KycDocuments,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.kyc_status == KycStatus::Verified {
            return Err(InvariantViolation::AlreadyVerified.into());
        }
        let now = clock.now();
        self.kyc_status = KycStatus::Verified;
        self.updated_at = now;
        self.raise(
            UserEventKind::KycVerified(KycVerified { documents }),
            correlation_id,
            now,
        );
        Ok(())
    }

    /// Marks the user's KYC as rejected, producing a `KycRejected` event.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation::AlreadyRejected` if KYC is already
    /// rejected.
    pub fn reject_kyc(
        &mut self,
        reason: impl Into<String>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.kyc_status == KycStatus::Rejected {
            return Err(InvariantViolation::AlreadyRejected.into());
        }
        let now = clock.now();
        self.kyc_status = KycStatus::Rejected;
        self.updated_at = now;
        self.raise(
            UserEventKind::KycRejected(KycRejected {
                reason: reason.into(),
            }),
            correlation_id,
            now,
        );
        Ok(())
    }

    /// Applies the fields of `changes` that differ from the current values,
    /// producing a `ProfileUpdated` event carrying only those fields.
    ///
    /// Returns `false`, without touching any state, when nothing changed.
    pub fn update_profile(
        &mut self,
        changes: ProfileChanges,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> bool {
        let delta = ProfileChanges {
            name: changes.name.filter(|name| *name != self.name),
            email: changes.email.filter(|email| *email != self.email),
        };
        if delta.is_empty() {
            return false;
        }

        let now = clock.now();
        if let Some(name) = &delta.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &delta.email {
            self.email.clone_from(email);
        }
        self.updated_at = now;
        self.raise(
            UserEventKind::ProfileUpdated(ProfileUpdated { changes: delta }),
            correlation_id,
            now,
        );
        true
    }
}

impl AggregateRoot for User {
    type Event = UserEvent;

    fn aggregate_id(&self) -> Option<Uuid> {
        self.id
    }

    fn version(&self) -> i64 {
        self.events.version()
    }

    fn pending_events(&self) -> Vec<UserEvent> {
        self.events.pending()
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }
}
