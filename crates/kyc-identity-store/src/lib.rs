//! KYC Identity: user persistence adapters.
//!
//! Both stores implement `UserStore`: `PgUserStore` against PostgreSQL and
//! `InMemoryUserStore` for development runs and tests.

pub mod memory;
pub mod pg_user_store;
pub mod schema;

pub use memory::InMemoryUserStore;
pub use pg_user_store::PgUserStore;
