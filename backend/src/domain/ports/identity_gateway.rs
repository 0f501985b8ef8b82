//! Driven port for the external identity (login/auth) service.
//!
//! The service speaks a generic typed-parameter protocol and wraps every
//! payload in a separately encoded envelope. Adapters hide that wire shape
//! and hand the domain typed records.

use std::fmt;

use async_trait::async_trait;

use crate::domain::ClientPassword;

use super::define_port_error;

define_port_error! {
    /// Failures raised by identity gateway adapters.
    pub enum IdentityGatewayError {
        /// The service answered with a non-success HTTP status.
        Status { status: u16 } => "identity service returned HTTP {status}",
        /// The login table was absent or empty.
        NoData => "identity service returned no data",
        /// The auth payload carried no session token.
        MissingToken => "identity service returned no session token",
        /// The request did not finish before its deadline.
        Timeout { message: String } => "identity service timed out: {message}",
        /// The request could not be sent or the body could not be read.
        Transport { message: String } => "identity service transport failed: {message}",
        /// The outer response envelope could not be decoded.
        Envelope { message: String } => "identity service envelope malformed: {message}",
        /// The nested payload could not be decoded.
        Payload { message: String } => "identity service payload malformed: {message}",
    }
}

/// First row of the login table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
    /// Tenant identifier; doubles as company id and user name.
    pub comp_guid: String,
    /// Password-equivalent issued for web access.
    pub web_password: ClientPassword,
    /// Billing identifier, `0` when the service omits it.
    pub bid: i64,
    /// Billing user identifier, `0` when the service omits it.
    pub uid: i64,
}

/// Credentials presented in the auth call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub comp_id: String,
    pub user_name: String,
    pub password: ClientPassword,
    pub app_guid: String,
}

/// Session token returned by a successful auth call.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token; blank tokens are treated as absent.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Port for the two identity service calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Look up the login record for a phone number.
    async fn login(&self, phone: &str) -> Result<LoginRecord, IdentityGatewayError>;

    /// Exchange login credentials for a session token.
    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<SessionToken, IdentityGatewayError>;
}
