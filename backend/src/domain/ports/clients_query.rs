//! Driving port for client record reads.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Client, ListClientsOptions};

use super::ClientStoreError;

/// Domain use-case port for client lookups and listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsQuery: Send + Sync {
    /// Fetch a record. Malformed identifiers yield `None` without a lookup.
    async fn get_by_id(&self, id: &str) -> Result<Option<Client>, ClientStoreError>;

    /// The active client for a messaging group: the earliest-created match.
    async fn get_active_by_group(
        &self,
        whatsapp_group_name: &str,
    ) -> Result<Option<Client>, ClientStoreError>;

    /// One page of records plus the unfiltered total.
    async fn list(&self, options: ListClientsOptions)
    -> Result<Paginated<Client>, ClientStoreError>;
}
