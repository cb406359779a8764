//! KYC Identity Core: domain event, aggregate and repository coordination.
//!
//! This crate defines the abstractions every bounded context builds on:
//! aggregates that buffer events, the in-process event bus, and the
//! repository save path that persists an aggregate and then flushes its
//! events. It contains no infrastructure code.

pub mod aggregate;
pub mod bus;
pub mod clock;
pub mod error;
pub mod event;
pub mod repository;

#[cfg(test)]
mod testing;
