//! Reqwest-backed identity gateway.
//!
//! Owns transport only: endpoint resolution, the request timeout, HTTP status
//! mapping and the two-step envelope/payload decode.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{ParamDto, decode_envelope, parse_auth, parse_login};
use crate::domain::ports::{
    AuthRequest, IdentityGateway, IdentityGatewayError, LoginRecord, SessionToken,
};

/// Default path of the phone lookup call.
pub const DEFAULT_LOGIN_PATH: &str = "/api/Login/GetLoginByPhone";
/// Default path of the credential exchange call.
pub const DEFAULT_AUTH_PATH: &str = "/api/Login/Auth";

/// Errors raised while constructing the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityGatewayConfigError {
    /// The base URL or an endpoint path did not parse.
    #[error("invalid identity service URL: {message}")]
    InvalidUrl { message: String },
    /// The HTTP client could not be built.
    #[error("failed to build identity HTTP client: {message}")]
    Client { message: String },
}

/// Endpoint paths relative to the service base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEndpoints {
    pub login_path: String,
    pub auth_path: String,
}

impl Default for IdentityEndpoints {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            auth_path: DEFAULT_AUTH_PATH.to_owned(),
        }
    }
}

/// Identity gateway adapter issuing JSON POSTs to two fixed endpoints.
pub struct IdentityHttpGateway {
    client: Client,
    login_url: Url,
    auth_url: Url,
}

impl IdentityHttpGateway {
    /// Build an adapter for `base_url` using the default endpoint paths.
    ///
    /// # Errors
    /// Returns [`IdentityGatewayConfigError`] when the URL does not parse or
    /// the reqwest client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IdentityGatewayConfigError> {
        Self::with_endpoints(base_url, timeout, IdentityEndpoints::default())
    }

    /// Build an adapter with explicit endpoint paths.
    ///
    /// # Errors
    /// Returns [`IdentityGatewayConfigError`] when a URL does not parse or the
    /// reqwest client cannot be built.
    pub fn with_endpoints(
        base_url: &str,
        timeout: Duration,
        endpoints: IdentityEndpoints,
    ) -> Result<Self, IdentityGatewayConfigError> {
        let base = Url::parse(base_url).map_err(|err| IdentityGatewayConfigError::InvalidUrl {
            message: format!("{base_url}: {err}"),
        })?;
        let login_url = join(&base, &endpoints.login_path)?;
        let auth_url = join(&base, &endpoints.auth_path)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| IdentityGatewayConfigError::Client {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            login_url,
            auth_url,
        })
    }

    async fn call(
        &self,
        url: &Url,
        params: &[ParamDto<'_>],
    ) -> Result<serde_json::Value, IdentityGatewayError> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(url, status, body.as_ref()));
        }
        decode_envelope(body.as_ref())
    }
}

fn join(base: &Url, path: &str) -> Result<Url, IdentityGatewayConfigError> {
    base.join(path)
        .map_err(|err| IdentityGatewayConfigError::InvalidUrl {
            message: format!("{path}: {err}"),
        })
}

#[async_trait]
impl IdentityGateway for IdentityHttpGateway {
    async fn login(&self, phone: &str) -> Result<LoginRecord, IdentityGatewayError> {
        let params = [ParamDto::string("phone", phone)];
        let payload = self.call(&self.login_url, &params).await?;
        parse_login(payload)
    }

    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<SessionToken, IdentityGatewayError> {
        let params = [
            ParamDto::string("compId", &request.comp_id),
            ParamDto::string("userName", &request.user_name),
            ParamDto::string("password", request.password.expose()),
            ParamDto::string("appGuid", &request.app_guid),
        ];
        let payload = self.call(&self.auth_url, &params).await?;
        parse_auth(payload)
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityGatewayError {
    if error.is_timeout() {
        IdentityGatewayError::timeout(error.to_string())
    } else {
        IdentityGatewayError::transport(error.to_string())
    }
}

fn map_status_error(url: &Url, status: StatusCode, body: &[u8]) -> IdentityGatewayError {
    debug!(
        endpoint = %url.path(),
        status = status.as_u16(),
        body = %body_preview(body),
        "identity service rejected request"
    );
    IdentityGatewayError::status(status.as_u16())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::ClientPassword;

    fn envelope(payload: serde_json::Value) -> serde_json::Value {
        json!({ "APIResponseText": payload.to_string() })
    }

    fn gateway(server: &MockServer) -> IdentityHttpGateway {
        IdentityHttpGateway::new(&server.uri(), Duration::from_secs(2)).expect("gateway")
    }

    #[rstest]
    fn default_paths_resolve_against_the_base() {
        let gateway =
            IdentityHttpGateway::new("https://id.example.test", Duration::from_secs(1))
                .expect("gateway");
        assert_eq!(
            gateway.login_url.as_str(),
            "https://id.example.test/api/Login/GetLoginByPhone"
        );
        assert_eq!(gateway.auth_url.as_str(), "https://id.example.test/api/Login/Auth");
    }

    #[rstest]
    fn unparsable_base_urls_are_rejected() {
        let result = IdentityHttpGateway::new("not a url", Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(IdentityGatewayConfigError::InvalidUrl { .. })
        ));
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[tokio::test]
    async fn login_posts_the_phone_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DEFAULT_LOGIN_PATH))
            .and(body_json(json!([
                { "paramName": "phone", "paramValue": "+972501234567", "paramType": "string" }
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "Table": [{ "compGuid": "C1", "webPswd": "p", "bid": "5", "uid": 9 }]
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let record = gateway(&server)
            .login("+972501234567")
            .await
            .expect("login record");
        assert_eq!(record.comp_guid, "C1");
        assert_eq!((record.bid, record.uid), (5, 9));
    }

    #[tokio::test]
    async fn authenticate_posts_all_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DEFAULT_AUTH_PATH))
            .and(body_json(json!([
                { "paramName": "compId", "paramValue": "C1", "paramType": "string" },
                { "paramName": "userName", "paramValue": "C1", "paramType": "string" },
                { "paramName": "password", "paramValue": "p", "paramType": "string" },
                { "paramName": "appGuid", "paramValue": "G", "paramType": "string" }
            ])))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "SessionToken": "tok" }))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = AuthRequest {
            comp_id: "C1".to_owned(),
            user_name: "C1".to_owned(),
            password: ClientPassword::new("p").expect("password"),
            app_guid: "G".to_owned(),
        };
        let token = gateway(&server).authenticate(&request).await;
        assert!(token.is_ok());
    }

    #[rstest]
    #[case(500)]
    #[case(404)]
    #[tokio::test]
    async fn non_success_statuses_map_to_status_errors(#[case] status: u16) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let error = gateway(&server)
            .login("+972501234567")
            .await
            .expect_err("status error");
        assert_eq!(error, IdentityGatewayError::Status { status });
    }

    #[tokio::test]
    async fn slow_responses_map_to_timeouts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "Table": [] })))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let gateway =
            IdentityHttpGateway::new(&server.uri(), Duration::from_millis(100)).expect("gateway");
        let error = gateway
            .login("+972501234567")
            .await
            .expect_err("timeout");
        assert!(matches!(error, IdentityGatewayError::Timeout { .. }));
    }

    #[tokio::test]
    async fn custom_paths_are_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "Table": [] }))))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = IdentityHttpGateway::with_endpoints(
            &server.uri(),
            Duration::from_secs(2),
            IdentityEndpoints {
                login_path: "/v2/login".to_owned(),
                auth_path: "/v2/auth".to_owned(),
            },
        )
        .expect("gateway");
        let error = gateway.login("+972501234567").await.expect_err("no data");
        assert_eq!(error, IdentityGatewayError::NoData);
    }
}
