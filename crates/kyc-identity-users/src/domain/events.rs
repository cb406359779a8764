//! Domain events for the User context.

use kyc_identity_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::value_objects::{KycDocuments, ProfileChanges};

/// Event type identifier for [`UserRegistered`].
pub const USER_REGISTERED_EVENT_TYPE: &str = "user.registered";

/// Event type identifier for [`KycVerified`].
pub const KYC_VERIFIED_EVENT_TYPE: &str = "user.kyc_verified";

/// Event type identifier for [`KycRejected`].
pub const KYC_REJECTED_EVENT_TYPE: &str = "user.kyc_rejected";

/// Event type identifier for [`ProfileUpdated`].
pub const PROFILE_UPDATED_EVENT_TYPE: &str = "user.profile_updated";

/// Emitted when a new user registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    /// The registered email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
}

/// Emitted when a user's identity is verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycVerified {
    /// The documents that were accepted.
    pub documents: KycDocuments,
}

/// Emitted when a user's KYC submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycRejected {
    /// Why the submission was rejected.
    pub reason: String,
}

/// Emitted when a profile field actually changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdated {
    /// Only the fields whose value changed.
    pub changes: ProfileChanges,
}

/// Closed discriminator of the User event variants; the bus subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserEventType {
    /// See [`UserRegistered`].
    Registered,
    /// See [`KycVerified`].
    KycVerified,
    /// See [`KycRejected`].
    KycRejected,
    /// See [`ProfileUpdated`].
    ProfileUpdated,
}

impl UserEventType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Registered,
        Self::KycVerified,
        Self::KycRejected,
        Self::ProfileUpdated,
    ];

    /// The event type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => USER_REGISTERED_EVENT_TYPE,
            Self::KycVerified => KYC_VERIFIED_EVENT_TYPE,
            Self::KycRejected => KYC_REJECTED_EVENT_TYPE,
            Self::ProfileUpdated => PROFILE_UPDATED_EVENT_TYPE,
        }
    }
}

/// Event payload variants for the User context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserEventKind {
    /// A user has registered.
    Registered(UserRegistered),
    /// A user's KYC has been verified.
    KycVerified(KycVerified),
    /// A user's KYC has been rejected.
    KycRejected(KycRejected),
    /// A user's profile has changed.
    ProfileUpdated(ProfileUpdated),
}

impl UserEventKind {
    /// The discriminator of this payload.
    #[must_use]
    pub fn event_type(&self) -> UserEventType {
        match self {
            Self::Registered(_) => UserEventType::Registered,
            Self::KycVerified(_) => UserEventType::KycVerified,
            Self::KycRejected(_) => UserEventType::KycRejected,
            Self::ProfileUpdated(_) => UserEventType::ProfileUpdated,
        }
    }
}

/// Domain event envelope for the User context.
#[derive(Debug, Clone)]
pub struct UserEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: UserEventKind,
}

impl DomainEvent for UserEvent {
    type Kind = UserEventType;

    fn kind(&self) -> UserEventType {
        self.kind.event_type()
    }

    fn event_type(&self) -> &'static str {
        self.kind.event_type().as_str()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
