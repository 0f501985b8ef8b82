//! Record store service for client records.
//!
//! Implements the [`ClientsCommand`] and [`ClientsQuery`] driving ports on top
//! of any [`ClientRepository`]. Validation runs before storage is touched, so
//! rejected payloads never write. Storage failures are logged and propagated
//! unchanged; nothing is retried here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::Paginated;
use tracing::{debug, warn};

use crate::domain::ports::{
    ClientRepository, ClientRepositoryError, ClientStoreError, ClientsCommand, ClientsQuery,
};
use crate::domain::{Client, ClientId, ClientInput, ListClientsOptions};

/// Default ceiling for the page size of listings.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Client record service implementing the driving ports.
#[derive(Clone)]
pub struct ClientService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    max_page_size: u32,
}

impl<R> ClientService<R> {
    /// Create a service with the default maximum page size.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Override the largest accepted `limit` for listings.
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

fn storage_failure(operation: &'static str) -> impl FnOnce(ClientRepositoryError) -> ClientStoreError {
    move |error| {
        warn!(operation, error = %error, "client repository call failed");
        ClientStoreError::Storage(error)
    }
}

#[async_trait]
impl<R> ClientsCommand for ClientService<R>
where
    R: ClientRepository,
{
    async fn create(&self, candidate: ClientInput) -> Result<Client, ClientStoreError> {
        let new_client = candidate.validate_new().map_err(|errors| {
            debug!(errors = %errors, "rejected client candidate");
            ClientStoreError::Validation(errors)
        })?;

        let client = self
            .repository
            .insert(&new_client, self.now())
            .await
            .map_err(storage_failure("insert"))?;
        debug!(client_id = %client.id, "created client");
        Ok(client)
    }

    async fn update(&self, id: &str, changes: ClientInput) -> Result<Client, ClientStoreError> {
        let patch = changes
            .validate_patch()
            .map_err(ClientStoreError::Validation)?;
        let id = ClientId::new(id).map_err(|_| ClientStoreError::NotFound)?;

        let existing = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(storage_failure("find_by_id"))?
            .ok_or(ClientStoreError::NotFound)?;

        let now = self.now().max(existing.created_at);
        self.repository
            .update(&id, &patch, now)
            .await
            .map_err(storage_failure("update"))?
            .ok_or(ClientStoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<bool, ClientStoreError> {
        let Ok(id) = ClientId::new(id) else {
            return Ok(false);
        };
        self.repository
            .delete(&id)
            .await
            .map_err(storage_failure("delete"))
    }
}

#[async_trait]
impl<R> ClientsQuery for ClientService<R>
where
    R: ClientRepository,
{
    async fn get_by_id(&self, id: &str) -> Result<Option<Client>, ClientStoreError> {
        let Ok(id) = ClientId::new(id) else {
            return Ok(None);
        };
        self.repository
            .find_by_id(&id)
            .await
            .map_err(storage_failure("find_by_id"))
    }

    async fn get_active_by_group(
        &self,
        whatsapp_group_name: &str,
    ) -> Result<Option<Client>, ClientStoreError> {
        self.repository
            .find_first_by_group(whatsapp_group_name)
            .await
            .map_err(storage_failure("find_first_by_group"))
    }

    async fn list(
        &self,
        options: ListClientsOptions,
    ) -> Result<Paginated<Client>, ClientStoreError> {
        let query = options
            .into_query(self.max_page_size)
            .map_err(ClientStoreError::Validation)?;

        let items = self
            .repository
            .list(&query)
            .await
            .map_err(storage_failure("list"))?;
        let total = self
            .repository
            .count()
            .await
            .map_err(storage_failure("count"))?;
        Ok(Paginated::new(items, total, query.page))
    }
}

#[cfg(test)]
#[path = "client_service_tests.rs"]
mod tests;
