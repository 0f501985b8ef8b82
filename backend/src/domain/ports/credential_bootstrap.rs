//! Driving port for deriving client credentials from a phone number.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{ClientInput, ClientPassword};

use super::IdentityGatewayError;

/// Handshake phase a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    Login,
    Auth,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Auth => f.write_str("auth"),
        }
    }
}

/// Terminal failure of the credential handshake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// The login call failed; auth was never attempted.
    #[error("login failed: {reason}")]
    LoginFailed { reason: IdentityGatewayError },
    /// The auth call failed or returned no session token.
    #[error("auth failed: {reason}")]
    AuthFailed { reason: IdentityGatewayError },
}

impl BootstrapError {
    /// Phase the handshake stopped in.
    pub fn phase(&self) -> BootstrapPhase {
        match self {
            Self::LoginFailed { .. } => BootstrapPhase::Login,
            Self::AuthFailed { .. } => BootstrapPhase::Auth,
        }
    }

    /// Underlying gateway failure.
    pub fn reason(&self) -> &IdentityGatewayError {
        match self {
            Self::LoginFailed { reason } | Self::AuthFailed { reason } => reason,
        }
    }
}

/// Credential fields of a client record, ready for merging with reporter
/// details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrappedClient {
    pub bid: i64,
    pub uid: i64,
    #[serde(rename = "mtcGroupID")]
    pub mtc_group_id: i64,
    pub comp_id: String,
    pub user_name: String,
    pub password: ClientPassword,
    pub app_guid: String,
}

impl BootstrappedClient {
    /// Merge with reporter details into a create payload.
    pub fn into_input(
        self,
        reporter_name: impl Into<String>,
        reporter_phone: impl Into<String>,
        whatsapp_group_name: Option<String>,
    ) -> ClientInput {
        let input = ClientInput::default()
            .with_field("bid", self.bid)
            .with_field("uid", self.uid)
            .with_field("mtcGroupID", self.mtc_group_id)
            .with_field("compId", self.comp_id.clone())
            .with_field("userName", self.user_name.clone())
            .with_field("password", self.password.expose())
            .with_field("appGuid", self.app_guid.clone())
            .with_field("reporterName", reporter_name.into())
            .with_field("reporterPhone", reporter_phone.into());
        match whatsapp_group_name {
            Some(group) => input.with_field("whatsappGroupName", group),
            None => input,
        }
    }
}

/// Domain use-case port for the two-phase credential handshake.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialBootstrap: Send + Sync {
    /// Run login then auth for `phone`.
    ///
    /// `deadline` bounds both calls together; on expiry the running phase
    /// fails with a timeout reason.
    async fn bootstrap(
        &self,
        phone: &str,
        deadline: Option<Duration>,
    ) -> Result<BootstrappedClient, BootstrapError>;
}
