//! HTTP inbound adapter exposing REST endpoints.

pub mod clients;
pub mod cors;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;

use actix_web::web;

pub use error::ApiResult;

/// Register the client endpoints and the 400 envelopes for malformed JSON
/// bodies and query strings.
///
/// # Examples
/// ```rust,ignore
/// use actix_web::{App, web};
/// use client_registry::inbound::http::{configure, state::HttpState};
///
/// let app = App::new()
///     .app_data(web::Data::new(state))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(clients::get_active_client)
        .service(clients::get_clients)
        .service(clients::create_client)
        .service(clients::update_client)
        .service(clients::delete_client);
}
