//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here are thin: they translate between Diesel row structs and
//! domain records and map database failures onto port errors. Row structs and
//! table definitions stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use client_registry::outbound::persistence::{DbPool, DieselClientRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clients")).await?;
//! let repository = DieselClientRepository::new(pool);
//! ```

mod diesel_client_repository;
mod migrations;
mod models;
mod password_codec;
mod pool;
mod schema;

pub use diesel_client_repository::DieselClientRepository;
pub use migrations::{MigrationError, run_migrations};
pub use password_codec::{PasswordCodec, PasswordCodecError, PlaintextPasswordCodec};
pub use pool::{DbPool, PoolConfig, PoolError};
