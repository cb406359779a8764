//! KYC Identity: User bounded context.
//!
//! Registration, KYC verification and profile management for user
//! identities. The `domain` module holds the `User` aggregate and its
//! events; `application` holds the use cases that drive it through the
//! repository save path.

pub mod application;
pub mod domain;

#[cfg(test)]
mod testing;
