//! Shared test doubles and utilities for the KYC Identity service.

mod clock;
mod handlers;

pub use clock::FixedClock;
pub use handlers::{FailingHandler, PanickingHandler, RecordingHandler};
