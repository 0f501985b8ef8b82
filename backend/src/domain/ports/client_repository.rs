//! Driven port for client record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Client, ClientId, ClientListQuery, ClientPatch, NewClient};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "client repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "client repository query failed: {message}",
    }
}

/// Storage contract for client records.
///
/// Adapters assign identifiers on insert and never change `created_at`
/// afterwards. Single-record writes are expected to be atomic; there is no
/// optimistic concurrency, so racing updates resolve last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Persist a new record stamped with `now` and return it with its id.
    async fn insert(
        &self,
        client: &NewClient,
        now: DateTime<Utc>,
    ) -> Result<Client, ClientRepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError>;

    /// Earliest-created record whose group name matches, ties broken by id.
    async fn find_first_by_group(
        &self,
        whatsapp_group_name: &str,
    ) -> Result<Option<Client>, ClientRepositoryError>;

    /// Apply a patch and set `updated_at` to `now`.
    ///
    /// Returns `None` when no record has the identifier.
    async fn update(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Client>, ClientRepositoryError>;

    /// Remove a record, reporting whether one existed.
    async fn delete(&self, id: &ClientId) -> Result<bool, ClientRepositoryError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<u64, ClientRepositoryError>;

    /// One sorted page of records.
    async fn list(&self, query: &ClientListQuery) -> Result<Vec<Client>, ClientRepositoryError>;
}
