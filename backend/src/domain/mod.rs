//! Domain primitives, services and ports.
//!
//! Purpose: define the client record model, the record store and credential
//! bootstrap services, and the ports adapters plug into. Nothing here knows
//! about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Client and its value objects, plus `ClientInput` payload validation.
//! - ClientService: record store implementing `ClientsCommand`/`ClientsQuery`.
//! - CredentialBootstrapService: Login/Auth handshake implementing
//!   `CredentialBootstrap`.

pub mod client;
pub mod client_service;
pub mod credential_bootstrap;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::client::{
    Client, ClientId, ClientInput, ClientListQuery, ClientPassword, ClientPatch,
    ClientSortField, ClientValidationErrors, ClientValueError, FieldError, ListClientsOptions,
    NewClient, ReporterPhone,
};
pub use self::client_service::{ClientService, DEFAULT_MAX_PAGE_SIZE};
pub use self::credential_bootstrap::{APP_GUID, CredentialBootstrapService, MTC_GROUP_ID};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use client_registry::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Client not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
