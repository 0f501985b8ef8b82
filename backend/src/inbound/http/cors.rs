//! Open cross-origin policy for browser callers.
//!
//! Every response carries the allow headers and any `OPTIONS` request is
//! answered with an empty 204.

use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse};

use crate::domain::Error;

/// Methods advertised to preflight requests.
pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
/// Request headers advertised to preflight requests.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Response headers permitting any origin.
pub fn permissive_cors() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
}

/// Default service: 204 for preflight requests, the 404 envelope otherwise.
pub async fn preflight(req: HttpRequest) -> Result<HttpResponse, Error> {
    if req.method() == Method::OPTIONS {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found("Not found"))
    }
}
