//! Application layer for the User context.

pub mod command_handlers;
pub mod event_handlers;
pub mod ports;
pub mod query_handlers;
