//! Server entry-point: loads settings, prepares storage and serves the
//! client registry API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use client_registry::domain::ClientService;
use client_registry::inbound::http::health::HealthState;
use client_registry::inbound::http::state::HttpState;
use client_registry::outbound::persistence::{
    DbPool, DieselClientRepository, PoolConfig, run_migrations,
};
use client_registry::settings::ServiceSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let database_url = settings.database_url().map_err(io::Error::other)?;

    if settings.run_migrations {
        run_migrations(&database_url)
            .await
            .map_err(|err| io::Error::other(format!("run migrations: {err}")))?;
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;

    let repository = Arc::new(DieselClientRepository::new(pool));
    let service = ClientService::new(repository, Arc::new(DefaultClock))
        .with_max_page_size(settings.max_page_size());
    let http_state = HttpState::from_service(Arc::new(service));

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, http_state)
        .with_cors_permissive(settings.cors_permissive);
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "client registry listening");
    server.await
}
