//! Two-phase credential handshake against the external identity service.
//!
//! The handshake is a small state machine: `Login` looks up the tenant
//! record for a phone number, `Auth` proves those credentials yield a
//! session, and `Done` carries the credential fields of a client record.
//! Each phase runs once. Any failure ends the handshake with a
//! [`BootstrapError`] naming the phase; nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::domain::ports::{
    AuthRequest, BootstrapError, BootstrappedClient, CredentialBootstrap, IdentityGateway,
    IdentityGatewayError, LoginRecord,
};

/// Application identifier presented to the identity service.
pub const APP_GUID: &str = "77C8F2FD-B1DE-4CEA-BE74-FD943B3BD54D";

/// Message-centre group every bootstrapped client belongs to.
pub const MTC_GROUP_ID: i64 = 21;

enum HandshakeState {
    Login { phone: String },
    Auth { login: LoginRecord },
    Done(BootstrappedClient),
}

/// Credential bootstrap service implementing the driving port.
#[derive(Clone)]
pub struct CredentialBootstrapService<G> {
    gateway: Arc<G>,
}

impl<G> CredentialBootstrapService<G> {
    /// Create a service over the given gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

async fn within<T, F>(deadline: Option<Instant>, call: F) -> Result<T, IdentityGatewayError>
where
    F: Future<Output = Result<T, IdentityGatewayError>>,
{
    match deadline {
        None => call.await,
        Some(at) => timeout_at(at, call)
            .await
            .map_err(|_| IdentityGatewayError::timeout("caller deadline elapsed"))?,
    }
}

impl<G> CredentialBootstrapService<G>
where
    G: IdentityGateway,
{
    async fn step(
        &self,
        state: HandshakeState,
        deadline: Option<Instant>,
    ) -> Result<HandshakeState, BootstrapError> {
        match state {
            HandshakeState::Login { phone } => {
                let login = within(deadline, self.gateway.login(&phone))
                    .await
                    .map_err(|reason| {
                        warn!(error = %reason, "identity login failed");
                        BootstrapError::LoginFailed { reason }
                    })?;
                debug!(bid = login.bid, uid = login.uid, "identity login succeeded");
                Ok(HandshakeState::Auth { login })
            }
            HandshakeState::Auth { login } => {
                let request = AuthRequest {
                    comp_id: login.comp_guid.clone(),
                    user_name: login.comp_guid.clone(),
                    password: login.web_password.clone(),
                    app_guid: APP_GUID.to_owned(),
                };
                within(deadline, self.gateway.authenticate(&request))
                    .await
                    .map_err(|reason| {
                        warn!(error = %reason, "identity auth failed");
                        BootstrapError::AuthFailed { reason }
                    })?;
                Ok(HandshakeState::Done(BootstrappedClient {
                    bid: login.bid,
                    uid: login.uid,
                    mtc_group_id: MTC_GROUP_ID,
                    comp_id: request.comp_id,
                    user_name: request.user_name,
                    password: request.password,
                    app_guid: request.app_guid,
                }))
            }
            done @ HandshakeState::Done(_) => Ok(done),
        }
    }
}

#[async_trait]
impl<G> CredentialBootstrap for CredentialBootstrapService<G>
where
    G: IdentityGateway,
{
    async fn bootstrap(
        &self,
        phone: &str,
        deadline: Option<Duration>,
    ) -> Result<BootstrappedClient, BootstrapError> {
        let deadline = deadline.map(|budget| Instant::now() + budget);
        let mut state = HandshakeState::Login {
            phone: phone.to_owned(),
        };
        loop {
            state = match self.step(state, deadline).await? {
                HandshakeState::Done(client) => return Ok(client),
                next => next,
            };
        }
    }
}

#[cfg(test)]
#[path = "credential_bootstrap_tests.rs"]
mod tests;
