//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod client_repository;
mod clients_command;
mod clients_query;
mod credential_bootstrap;
mod identity_gateway;

#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError};
#[cfg(test)]
pub use clients_command::MockClientsCommand;
pub use clients_command::{ClientStoreError, ClientsCommand};
#[cfg(test)]
pub use clients_query::MockClientsQuery;
pub use clients_query::ClientsQuery;
#[cfg(test)]
pub use credential_bootstrap::MockCredentialBootstrap;
pub use credential_bootstrap::{
    BootstrapError, BootstrapPhase, BootstrappedClient, CredentialBootstrap,
};
#[cfg(test)]
pub use identity_gateway::MockIdentityGateway;
pub use identity_gateway::{
    AuthRequest, IdentityGateway, IdentityGatewayError, LoginRecord, SessionToken,
};
