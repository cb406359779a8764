//! In-process event bus.
//!
//! Handlers subscribe to an event kind and are invoked sequentially, in
//! subscription order, for every published event of that kind. A failing
//! handler is logged and skipped; it never stops the remaining handlers and
//! never surfaces to the publisher.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{debug, error};

use crate::error::DomainError;
use crate::event::DomainEvent;

/// A unit of reaction to one or more event kinds.
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    /// Name used in logs when the handler fails.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Reacts to `event`.
    ///
    /// # Errors
    ///
    /// Any error is reported by the bus and otherwise ignored.
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}

type HandlerList<E> = Vec<Arc<dyn EventHandler<E>>>;

/// Publish/subscribe registry keyed by event kind.
pub struct EventBus<E: DomainEvent> {
    handlers: RwLock<HashMap<E::Kind, HandlerList<E>>>,
}

impl<E: DomainEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: DomainEvent> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<&E::Kind, usize> =
            handlers.iter().map(|(kind, list)| (kind, list.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

impl<E: DomainEvent> EventBus<E> {
    /// Creates a bus with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`. The same handler may be registered
    /// for several kinds, or several times for one kind.
    pub fn subscribe(&self, kind: E::Kind, handler: Arc<dyn EventHandler<E>>) {
        debug!(?kind, handler = handler.name(), "subscribing event handler");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(handler);
    }

    /// Removes the first subscription of `handler` (by identity) for `kind`.
    ///
    /// Returns `false` when nothing matched; that is not an error.
    pub fn unsubscribe<H>(&self, kind: E::Kind, handler: &Arc<H>) -> bool
    where
        H: EventHandler<E> + ?Sized,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let target = Arc::as_ptr(handler);
        match list
            .iter()
            .position(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), target))
        {
            Some(index) => {
                list.remove(index);
                if list.is_empty() {
                    handlers.remove(&kind);
                }
                true
            }
            None => false,
        }
    }

    /// Number of handlers subscribed to `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` to every handler subscribed to its kind, one after
    /// the other. Never fails: handler errors and panics are logged.
    pub async fn publish(&self, event: &E) {
        let handlers = self.snapshot(event.kind());
        let metadata = event.metadata();
        if handlers.is_empty() {
            debug!(
                event_type = event.event_type(),
                event_id = %metadata.event_id,
                "no handlers subscribed"
            );
            return;
        }

        debug!(
            event_type = event.event_type(),
            event_id = %metadata.event_id,
            handlers = handlers.len(),
            "publishing event"
        );

        for handler in handlers {
            match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(
                    handler = handler.name(),
                    event_type = event.event_type(),
                    event_id = %metadata.event_id,
                    error = %err,
                    "event handler failed"
                ),
                Err(_) => error!(
                    handler = handler.name(),
                    event_type = event.event_type(),
                    event_id = %metadata.event_id,
                    "event handler panicked"
                ),
            }
        }
    }

    // The lock is released before any handler runs so handlers may publish
    // or (un)subscribe themselves.
    fn snapshot(&self, kind: E::Kind) -> HandlerList<E> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}
