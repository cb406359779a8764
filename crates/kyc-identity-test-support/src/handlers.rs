//! Test event handlers: `EventHandler` doubles for bus and repository tests.

use std::sync::Mutex;

use async_trait::async_trait;
use kyc_identity_core::bus::EventHandler;
use kyc_identity_core::error::DomainError;
use kyc_identity_core::event::DomainEvent;

/// A handler that records every event it receives, in delivery order.
#[derive(Debug)]
pub struct RecordingHandler<E> {
    received: Mutex<Vec<E>>,
}

impl<E> Default for RecordingHandler<E> {
    fn default() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> RecordingHandler<E> {
    /// Creates a handler that has received nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received(&self) -> Vec<E> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl<E: DomainEvent> EventHandler<E> for RecordingHandler<E> {
    async fn handle(&self, event: &E) -> Result<(), DomainError> {
        self.received.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A handler that always fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingHandler;

#[async_trait]
impl<E: DomainEvent> EventHandler<E> for FailingHandler {
    async fn handle(&self, _event: &E) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("handler unavailable".into()))
    }
}

/// A handler that always panics.
#[derive(Debug)]
pub struct PanickingHandler;

#[async_trait]
impl<E: DomainEvent> EventHandler<E> for PanickingHandler {
    async fn handle(&self, _event: &E) -> Result<(), DomainError> {
        panic!("handler bug");
    }
}
