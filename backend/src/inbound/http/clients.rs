//! Client record API handlers.
//!
//! ```text
//! GET    /clients?page=1&limit=10&sortBy=createdAt&sortOrder=desc
//! GET    /clients?id=<uuid>
//! GET    /clients/active?whatsappGroupName=<name>
//! POST   /clients {"bid":5,"uid":9,...}
//! PATCH  /clients?id=<uuid> {"reporterName":"Dana"}
//! DELETE /clients?id=<uuid>
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Client, ClientInput, Error, ListClientsOptions};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const CLIENT_NOT_FOUND: &str = "Client not found";
const CLIENT_ID_REQUIRED: &str = "Client ID is required";
const CLIENT_DELETED: &str = "Client deleted successfully";

/// Query string accepted by `GET /clients`.
///
/// When `id` is present the listing parameters are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClientsQueryParams {
    /// Fetch a single record instead of a page.
    pub id: Option<String>,
    /// One-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
    /// Record field to order by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

impl ClientsQueryParams {
    fn requested_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    fn into_options(self) -> ListClientsOptions {
        ListClientsOptions {
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}

/// Query string naming a single record.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientIdParam {
    /// Record identifier.
    pub id: Option<String>,
}

impl ClientIdParam {
    fn require(&self) -> ApiResult<&str> {
        non_blank(self.id.as_deref()).ok_or_else(|| Error::invalid_request(CLIENT_ID_REQUIRED))
    }
}

/// Query string for the active-client lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActiveClientParams {
    /// Messaging group whose first registered client is wanted.
    pub whatsapp_group_name: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|id| !id.trim().is_empty())
}

/// One page of client records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientListResponse {
    pub clients: Vec<Client>,
    /// Number of records in the whole collection.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Confirmation body returned by `DELETE /clients`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "Client deleted successfully")]
    pub message: String,
}

/// List client records, or fetch one when `id` is supplied.
#[utoipa::path(
    get,
    path = "/clients",
    params(ClientsQueryParams),
    responses(
        (status = 200, description = "A page of records, or the record named by id", body = ClientListResponse),
        (status = 400, description = "Invalid listing options", body = ErrorSchema),
        (status = 404, description = "No record has the id", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "getClients"
)]
#[get("/clients")]
pub async fn get_clients(
    state: web::Data<HttpState>,
    query: web::Query<ClientsQueryParams>,
) -> ApiResult<HttpResponse> {
    let params = query.into_inner();
    if let Some(id) = params.requested_id() {
        let client = state
            .clients_query
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(CLIENT_NOT_FOUND))?;
        return Ok(HttpResponse::Ok().json(client));
    }

    let page = state.clients_query.list(params.into_options()).await?;
    Ok(HttpResponse::Ok().json(ClientListResponse {
        clients: page.items,
        total: page.total,
        page: page.page,
        limit: page.limit,
    }))
}

/// Fetch the first client registered for a messaging group.
#[utoipa::path(
    get,
    path = "/clients/active",
    params(ActiveClientParams),
    responses(
        (status = 200, description = "Earliest registered client for the group", body = Client),
        (status = 400, description = "Missing group name", body = ErrorSchema),
        (status = 404, description = "No client for the group", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "getActiveClient"
)]
#[get("/clients/active")]
pub async fn get_active_client(
    state: web::Data<HttpState>,
    query: web::Query<ActiveClientParams>,
) -> ApiResult<web::Json<Client>> {
    state
        .clients_query
        .get_active_by_group(&query.whatsapp_group_name)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(CLIENT_NOT_FOUND))
}

/// Validate and store a new client record.
#[utoipa::path(
    post,
    path = "/clients",
    request_body(content = Object, description = "Client fields; id and timestamps are assigned by the server"),
    responses(
        (status = 201, description = "Stored record", body = Client),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "createClient"
)]
#[post("/clients")]
pub async fn create_client(
    state: web::Data<HttpState>,
    payload: web::Json<ClientInput>,
) -> ApiResult<HttpResponse> {
    let client = state.clients.create(payload.into_inner()).await?;
    info!(client_id = %client.id, "client created");
    Ok(HttpResponse::Created().json(client))
}

/// Apply a partial update to a client record.
#[utoipa::path(
    patch,
    path = "/clients",
    params(ClientIdParam),
    request_body(content = Object, description = "Subset of client fields to change"),
    responses(
        (status = 200, description = "Updated record", body = Client),
        (status = 400, description = "Missing id or invalid fields", body = ErrorSchema),
        (status = 404, description = "No record has the id", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "updateClient"
)]
#[patch("/clients")]
pub async fn update_client(
    state: web::Data<HttpState>,
    query: web::Query<ClientIdParam>,
    payload: web::Json<ClientInput>,
) -> ApiResult<web::Json<Client>> {
    let id = query.require()?;
    let client = state.clients.update(id, payload.into_inner()).await?;
    Ok(web::Json(client))
}

/// Remove a client record.
#[utoipa::path(
    delete,
    path = "/clients",
    params(ClientIdParam),
    responses(
        (status = 200, description = "Record removed", body = DeletedResponse),
        (status = 400, description = "Missing id", body = ErrorSchema),
        (status = 404, description = "No record has the id", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "deleteClient"
)]
#[delete("/clients")]
pub async fn delete_client(
    state: web::Data<HttpState>,
    query: web::Query<ClientIdParam>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = query.require()?;
    if !state.clients.delete(id).await? {
        return Err(Error::not_found(CLIENT_NOT_FOUND));
    }
    info!(client_id = id, "client deleted");
    Ok(web::Json(DeletedResponse {
        message: CLIENT_DELETED.to_owned(),
    }))
}

#[cfg(test)]
#[path = "clients_tests.rs"]
mod tests;
