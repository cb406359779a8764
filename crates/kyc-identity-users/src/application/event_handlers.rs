//! Event handlers for the User context.
//!
//! Each handler reacts to one event kind. The side effects (welcome mail,
//! KYC notices, profile propagation) are recorded through `tracing`; an
//! outbound notifier can replace the log line without touching the bus
//! wiring.

use std::sync::Arc;

use async_trait::async_trait;
use kyc_identity_core::bus::{EventBus, EventHandler};
use kyc_identity_core::error::DomainError;
use tracing::{debug, info};

use crate::domain::events::{UserEvent, UserEventKind, UserEventType};

fn unexpected(handler: &'static str, event: &UserEvent) {
    debug!(
        handler,
        event_type = event.kind.event_type().as_str(),
        "ignoring event of another kind"
    );
}

/// Sends the welcome notification for a new registration.
#[derive(Debug, Default)]
pub struct WelcomeNotificationHandler;

#[async_trait]
impl EventHandler<UserEvent> for WelcomeNotificationHandler {
    fn name(&self) -> &'static str {
        "welcome_notification"
    }

    async fn handle(&self, event: &UserEvent) -> Result<(), DomainError> {
        let UserEventKind::Registered(payload) = &event.kind else {
            unexpected(self.name(), event);
            return Ok(());
        };
        info!(
            event_id = %event.metadata.event_id,
            aggregate_id = ?event.metadata.aggregate_id,
            email = %payload.email,
            name = %payload.name,
            "sending welcome notification"
        );
        Ok(())
    }
}

/// Notifies the user that their identity was verified.
#[derive(Debug, Default)]
pub struct KycVerifiedNotificationHandler;

#[async_trait]
impl EventHandler<UserEvent> for KycVerifiedNotificationHandler {
    fn name(&self) -> &'static str {
        "kyc_verified_notification"
    }

    async fn handle(&self, event: &UserEvent) -> Result<(), DomainError> {
        if !matches!(event.kind, UserEventKind::KycVerified(_)) {
            unexpected(self.name(), event);
            return Ok(());
        }
        info!(
            event_id = %event.metadata.event_id,
            aggregate_id = ?event.metadata.aggregate_id,
            "sending KYC verified notification"
        );
        Ok(())
    }
}

/// Notifies the user that their KYC submission was rejected.
#[derive(Debug, Default)]
pub struct KycRejectedNotificationHandler;

#[async_trait]
impl EventHandler<UserEvent> for KycRejectedNotificationHandler {
    fn name(&self) -> &'static str {
        "kyc_rejected_notification"
    }

    async fn handle(&self, event: &UserEvent) -> Result<(), DomainError> {
        let UserEventKind::KycRejected(payload) = &event.kind else {
            unexpected(self.name(), event);
            return Ok(());
        };
        info!(
            event_id = %event.metadata.event_id,
            aggregate_id = ?event.metadata.aggregate_id,
            reason = %payload.reason,
            "sending KYC rejected notification"
        );
        Ok(())
    }
}

/// Propagates profile changes to downstream systems.
#[derive(Debug, Default)]
pub struct ProfileChangePropagationHandler;

#[async_trait]
impl EventHandler<UserEvent> for ProfileChangePropagationHandler {
    fn name(&self) -> &'static str {
        "profile_change_propagation"
    }

    async fn handle(&self, event: &UserEvent) -> Result<(), DomainError> {
        let UserEventKind::ProfileUpdated(payload) = &event.kind else {
            unexpected(self.name(), event);
            return Ok(());
        };
        info!(
            event_id = %event.metadata.event_id,
            aggregate_id = ?event.metadata.aggregate_id,
            name_changed = payload.changes.name.is_some(),
            email_changed = payload.changes.email.is_some(),
            "propagating profile changes"
        );
        Ok(())
    }
}

/// Subscribes the User context's handlers, one per event kind.
pub fn register_user_event_handlers(bus: &EventBus<UserEvent>) {
    bus.subscribe(
        UserEventType::Registered,
        Arc::new(WelcomeNotificationHandler),
    );
    bus.subscribe(
        UserEventType::KycVerified,
        Arc::new(KycVerifiedNotificationHandler),
    );
    bus.subscribe(
        UserEventType::KycRejected,
        Arc::new(KycRejectedNotificationHandler),
    );
    bus.subscribe(
        UserEventType::ProfileUpdated,
        Arc::new(ProfileChangePropagationHandler),
    );
}
