//! Bootstrap a client record from a reporter phone number.
//!
//! Runs the login/auth handshake against the identity service, merges the
//! result with the reporter details and stores the record.
//!
//! ```sh
//! bootstrap-client --phone +972501234567 --reporter-name Dana --whatsapp-group-name ops
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use client_registry::domain::ports::{ClientsCommand, CredentialBootstrap};
use client_registry::domain::{ClientService, CredentialBootstrapService};
use client_registry::outbound::identity::IdentityHttpGateway;
use client_registry::outbound::persistence::{DbPool, DieselClientRepository, PoolConfig};
use client_registry::settings::ServiceSettings;

/// `bootstrap-client` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bootstrap-client",
    about = "Create a client record from identity service credentials",
    version
)]
struct CliArgs {
    /// Phone number registered with the identity service.
    #[arg(long, value_name = "phone")]
    phone: String,
    /// Reporter display name stored on the record.
    #[arg(long = "reporter-name", value_name = "name")]
    reporter_name: String,
    /// Reporter phone stored on the record; defaults to `--phone`.
    #[arg(long = "reporter-phone", value_name = "phone")]
    reporter_phone: Option<String>,
    /// Messaging group the client reports for.
    #[arg(long = "whatsapp-group-name", value_name = "group")]
    whatsapp_group_name: Option<String>,
    /// Overall deadline for both identity calls, in seconds.
    #[arg(long = "deadline-secs", value_name = "seconds")]
    deadline_secs: Option<u64>,
    /// Print the bootstrapped credentials without storing a record.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ServiceSettings::load_from_iter([OsString::from("bootstrap-client")])
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?;

    let base_url = settings.identity_base_url().map_err(io::Error::other)?;
    let gateway = IdentityHttpGateway::with_endpoints(
        base_url,
        settings.identity_timeout(),
        settings.identity_endpoints(),
    )
    .map_err(io::Error::other)?;
    let bootstrap = CredentialBootstrapService::new(Arc::new(gateway));

    let deadline = args.deadline_secs.map(Duration::from_secs);
    let credentials = bootstrap
        .bootstrap(&args.phone, deadline)
        .await
        .map_err(|error| io::Error::other(format!("bootstrap failed: {error}")))?;
    info!(bid = credentials.bid, uid = credentials.uid, "credentials bootstrapped");

    if args.dry_run {
        let json = serde_json::to_string_pretty(&credentials).map_err(io::Error::other)?;
        return writeln!(io::stdout().lock(), "{json}");
    }

    let database_url = settings.database_url().map_err(io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let store = ClientService::new(
        Arc::new(DieselClientRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    let reporter_phone = args.reporter_phone.unwrap_or_else(|| args.phone.clone());
    let input = credentials.into_input(args.reporter_name, reporter_phone, args.whatsapp_group_name);
    let client = store
        .create(input)
        .await
        .map_err(|error| io::Error::other(format!("store client: {error}")))?;
    info!(client_id = %client.id, "client stored");

    let json = serde_json::to_string_pretty(&client).map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{json}")
}
