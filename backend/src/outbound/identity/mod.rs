//! Identity service outbound adapter.
//!
//! Thin reqwest implementation of the `IdentityGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{
    DEFAULT_AUTH_PATH, DEFAULT_LOGIN_PATH, IdentityEndpoints, IdentityGatewayConfigError,
    IdentityHttpGateway,
};
