//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the client endpoints, the health probes and the
//! schema wrappers for the error envelope. Swagger UI serves it in debug
//! builds and `openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::Client;
use crate::inbound::http::clients::{ClientListResponse, DeletedResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Client registry API",
        description = "CRUD and lookup over client credential records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::clients::get_clients,
        crate::inbound::http::clients::get_active_client,
        crate::inbound::http::clients::create_client,
        crate::inbound::http::clients::update_client,
        crate::inbound::http::clients::delete_client,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Client,
        ClientListResponse,
        DeletedResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "clients", description = "Client record store"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
