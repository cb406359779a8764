//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that buffer domain events as a side effect of
/// their state-changing operations.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces.
    type Event: DomainEvent;

    /// Returns the aggregate identifier, if one has been assigned.
    fn aggregate_id(&self) -> Option<Uuid>;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Returns a copy of the events not yet flushed by a repository.
    ///
    /// Mutating the returned vector does not affect the aggregate.
    fn pending_events(&self) -> Vec<Self::Event>;

    /// Clears the pending events. The version is left untouched.
    fn clear_events(&mut self);
}

/// Ordered buffer of pending events plus the version counter they advance.
///
/// Aggregates embed one of these and route every accepted mutation through
/// [`EventBuffer::apply`].
#[derive(Debug, Clone)]
pub struct EventBuffer<E> {
    pending: Vec<E>,
    version: i64,
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            version: 0,
        }
    }
}

impl<E: DomainEvent> EventBuffer<E> {
    /// Creates an empty buffer at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The version the next applied event must carry.
    #[must_use]
    pub fn next_version(&self) -> i64 {
        self.version + 1
    }

    /// Appends `event` and increments the version by exactly one.
    pub fn apply(&mut self, event: E) {
        debug_assert_eq!(
            event.metadata().version,
            self.next_version(),
            "event version must follow the aggregate version"
        );
        self.pending.push(event);
        self.version += 1;
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Independent copy of the pending events, in buffering order.
    #[must_use]
    pub fn pending(&self) -> Vec<E> {
        self.pending.clone()
    }

    /// Drops all pending events.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
