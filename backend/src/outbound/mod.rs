//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed client repository using Diesel ORM
//! - **identity**: reqwest client for the external login/auth service
//!
//! Adapters translate between domain types and wire or row representations.
//! They contain no business logic.

pub mod identity;
pub mod persistence;
