//! Route modules, one per resource.

pub mod auth;
pub mod health;
pub mod kyc;
pub mod users;
