//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ClientsCommand, ClientsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub clients: Arc<dyn ClientsCommand>,
    pub clients_query: Arc<dyn ClientsQuery>,
}

impl HttpState {
    /// Bundle the record store ports.
    pub fn new(clients: Arc<dyn ClientsCommand>, clients_query: Arc<dyn ClientsQuery>) -> Self {
        Self {
            clients,
            clients_query,
        }
    }

    /// Share one service for both the command and query side.
    ///
    /// # Examples
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use client_registry::domain::ClientService;
    /// use client_registry::inbound::http::state::HttpState;
    /// use client_registry::test_support::InMemoryClientRepository;
    /// use mockable::DefaultClock;
    ///
    /// let service = ClientService::new(
    ///     Arc::new(InMemoryClientRepository::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ClientsCommand + ClientsQuery + 'static,
    {
        Self {
            clients: service.clone(),
            clients_query: service,
        }
    }
}
