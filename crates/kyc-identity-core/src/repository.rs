//! Repository save orchestration.
//!
//! [`AggregateRepository::save`] runs the "persist snapshot, then notify"
//! sequence on top of a [`PersistenceStrategy`] supplied by the storage
//! adapter. Pending events are detached from the aggregate before the write,
//! so a failed or retried save never delivers the same event twice (at most
//! once per save attempt).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::aggregate::AggregateRoot;
use crate::bus::EventBus;
use crate::error::DomainError;
use crate::event::DomainEvent;

/// Storage primitive a concrete adapter supplies for one aggregate type.
#[async_trait]
pub trait PersistenceStrategy<A: AggregateRoot>: Send + Sync {
    /// Creates or updates the stored snapshot of `aggregate` and returns the
    /// canonical persisted representation.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` on any backing-store failure.
    async fn save_to_database(&self, aggregate: &A) -> Result<A, DomainError>;
}

/// Couples a persistence strategy with the event bus its saves flush into.
pub struct AggregateRepository<A, S>
where
    A: AggregateRoot,
    S: PersistenceStrategy<A> + ?Sized,
{
    store: Arc<S>,
    bus: Arc<EventBus<A::Event>>,
}

impl<A, S> Clone for AggregateRepository<A, S>
where
    A: AggregateRoot,
    S: PersistenceStrategy<A> + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<A, S> std::fmt::Debug for AggregateRepository<A, S>
where
    A: AggregateRoot,
    S: PersistenceStrategy<A> + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateRepository")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl<A, S> AggregateRepository<A, S>
where
    A: AggregateRoot,
    S: PersistenceStrategy<A> + ?Sized,
{
    /// Creates a repository over `store` that publishes into `bus`.
    #[must_use]
    pub fn new(store: Arc<S>, bus: Arc<EventBus<A::Event>>) -> Self {
        Self { store, bus }
    }

    /// The underlying persistence strategy, for lookups.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists `aggregate` and publishes its pending events.
    ///
    /// 1. Takes a copy of the pending events and clears the aggregate buffer.
    /// 2. Writes the snapshot through the persistence strategy.
    /// 3. Publishes the events, in buffering order, through the bus.
    /// 4. Returns the persisted representation from step 2.
    ///
    /// # Errors
    ///
    /// Propagates the persistence strategy's error unchanged. The events
    /// detached in step 1 are then dropped without being published.
    /// Handler failures never fail a save.
    pub async fn save(&self, aggregate: &mut A) -> Result<A, DomainError> {
        let to_publish = aggregate.pending_events();
        aggregate.clear_events();

        let persisted = match self.store.save_to_database(aggregate).await {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(
                    aggregate_id = ?aggregate.aggregate_id(),
                    dropped_events = to_publish.len(),
                    error = %err,
                    "persisting aggregate failed; pending events discarded"
                );
                return Err(err);
            }
        };

        debug!(
            aggregate_id = ?persisted.aggregate_id(),
            events = to_publish.len(),
            "aggregate persisted; publishing events"
        );

        for event in &to_publish {
            debug!(
                event_type = event.event_type(),
                version = event.metadata().version,
                "flushing event"
            );
            self.bus.publish(event).await;
        }

        Ok(persisted)
    }
}
