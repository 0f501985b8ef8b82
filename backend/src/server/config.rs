//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;
use client_registry::inbound::http::state::HttpState;

/// Everything `create_server` needs besides the health flags.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) cors_permissive: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state: web::Data::new(http_state),
            cors_permissive: true,
        }
    }

    /// Toggle the open cross-origin policy.
    #[must_use]
    pub fn with_cors_permissive(mut self, enabled: bool) -> Self {
        self.cors_permissive = enabled;
        self
    }
}
