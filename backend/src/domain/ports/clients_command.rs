//! Driving port for client record mutations.
//!
//! Inbound adapters and the bootstrap CLI use this port to create, change and
//! remove client records without importing persistence concerns.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Client, ClientInput, ClientValidationErrors, Error};

use super::ClientRepositoryError;

/// Failures surfaced by the record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientStoreError {
    /// The payload failed schema or format checks.
    #[error("{0}")]
    Validation(ClientValidationErrors),
    /// No record has the requested identifier.
    #[error("Client not found")]
    NotFound,
    /// The backing store failed; never retried.
    #[error(transparent)]
    Storage(#[from] ClientRepositoryError),
}

impl From<ClientValidationErrors> for ClientStoreError {
    fn from(value: ClientValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Domain use-case port for client mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsCommand: Send + Sync {
    /// Validate a full candidate record and persist it.
    async fn create(&self, candidate: ClientInput) -> Result<Client, ClientStoreError>;

    /// Validate present fields and merge them into an existing record.
    ///
    /// Malformed identifiers are reported as [`ClientStoreError::NotFound`].
    async fn update(&self, id: &str, changes: ClientInput) -> Result<Client, ClientStoreError>;

    /// Remove a record. `false` when nothing matched, including malformed ids.
    async fn delete(&self, id: &str) -> Result<bool, ClientStoreError>;
}

impl From<ClientStoreError> for Error {
    fn from(value: ClientStoreError) -> Self {
        match value {
            ClientStoreError::Validation(errors) => {
                Error::invalid_request(errors.to_string()).with_details(json!({
                    "errors": errors.errors(),
                }))
            }
            ClientStoreError::NotFound => Error::not_found("Client not found"),
            ClientStoreError::Storage(source) => {
                Error::internal(format!("client repository error: {source}"))
            }
        }
    }
}
