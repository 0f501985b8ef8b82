//! Service configuration loaded via OrthoConfig.
//!
//! Values layer from CLI flags, `CLIENT_REGISTRY_*` environment variables
//! and configuration files. Optional values fall back to the defaults below
//! through accessor methods.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_MAX_PAGE_SIZE;
use crate::outbound::identity::{DEFAULT_AUTH_PATH, DEFAULT_LOGIN_PATH, IdentityEndpoints};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 15;
const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Problems with otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("no database URL configured; set CLIENT_REGISTRY_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("no identity service URL configured; set CLIENT_REGISTRY_IDENTITY_BASE_URL")]
    MissingIdentityBaseUrl,
}

/// Configuration for the HTTP server and the bootstrap CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLIENT_REGISTRY")]
pub struct ServiceSettings {
    /// Socket address the server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Largest number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Largest accepted `limit` for listings.
    pub max_page_size: Option<u32>,
    /// Base URL of the identity service.
    pub identity_base_url: Option<String>,
    /// Per-request timeout for identity service calls, in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Path of the phone lookup call.
    pub identity_login_path: Option<String>,
    /// Path of the credential exchange call.
    pub identity_auth_path: Option<String>,
    /// Answer every origin, including preflight requests.
    #[ortho_config(default = true)]
    pub cors_permissive: bool,
    /// Apply pending schema migrations at start-up.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServiceSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, falling back to the conventional `DATABASE_URL`.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingDatabaseUrl`] when neither is set.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| env::var(DATABASE_URL_FALLBACK).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1)
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE).max(1)
    }

    /// Identity service base URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingIdentityBaseUrl`] when unset.
    pub fn identity_base_url(&self) -> Result<&str, SettingsError> {
        self.identity_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingIdentityBaseUrl)
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }

    pub fn identity_endpoints(&self) -> IdentityEndpoints {
        IdentityEndpoints {
            login_path: self
                .identity_login_path
                .clone()
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_owned()),
            auth_path: self
                .identity_auth_path
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTH_PATH.to_owned()),
        }
    }
}
