//! Domain event abstractions.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
///
/// Built once by the aggregate operation that raises the event and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Process-unique event identifier.
    pub event_id: Uuid,
    /// Event type name, fixed per event variant.
    pub event_type: String,
    /// Aggregate that raised this event. `None` when the aggregate had not
    /// been persisted yet (no identity assigned).
    pub aggregate_id: Option<Uuid>,
    /// Aggregate version after the mutation that produced this event.
    pub version: i64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Creates metadata with a fresh event identifier.
    #[must_use]
    pub fn new(
        event_type: &'static str,
        aggregate_id: Option<Uuid>,
        version: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            version,
            correlation_id,
            occurred_at,
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Clone + Debug + Send + Sync + 'static {
    /// Closed discriminator of the event variants, used as the bus
    /// subscription key.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the discriminator of this event.
    fn kind(&self) -> Self::Kind;

    /// Returns the event type name (used for logging and routing).
    fn event_type(&self) -> &'static str;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
