use std::sync::Arc;
use std::time::Duration;

use domain::{Error, ErrorKind, Result};
use service::prelude::{SlurmClient, WatchDefaults};
use typed_builder::TypedBuilder;
use url::Url;

use crate::config::ClientConfig;
use crate::http::middleware::{AuthMiddleware, MiddlewareMenu};
use crate::http::{Authenticator, HttpTransport, NoAuth, Transport};
use crate::negotiate::negotiate;
use crate::registry::{VersionRegistry, VersionRequest};

pub const DEFAULT_USER_AGENT: &str = "slurm-client/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a [`SlurmClient`]. Either `transport` or `base_url` must be set; a
/// given transport wins and the HTTP settings are then ignored.
#[derive(TypedBuilder)]
pub struct ClientFactory {
    #[builder(default, setter(strip_option, into))]
    base_url: Option<String>,
    #[builder(default, setter(strip_option))]
    transport: Option<Arc<dyn Transport>>,
    #[builder(default = Arc::new(NoAuth))]
    authenticator: Arc<dyn Authenticator>,
    #[builder(default)]
    version: VersionRequest,
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    #[builder(default = DEFAULT_USER_AGENT.to_owned(), setter(into))]
    user_agent: String,
    #[builder(default)]
    insecure_skip_verify: bool,
    #[builder(default)]
    watch: WatchDefaults,
    #[builder(default)]
    registry: VersionRegistry,
}

impl ClientFactory {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::builder()
            .base_url(config.rest_url.clone())
            .authenticator(config.auth.authenticator()?)
            .version(config.version_request()?)
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .insecure_skip_verify(config.insecure_skip_verify)
            .watch(config.watch.defaults())
            .build())
    }

    /// Resolves the API version once, asking the server first when
    /// negotiation was requested, and binds the client to that adapter.
    pub async fn create(self) -> Result<SlurmClient> {
        let transport = self.transport()?;
        let version = match self.version {
            VersionRequest::Negotiate => negotiate(transport.as_ref(), &self.registry).await,
            request => self.registry.pick(request)?,
        };
        let adapter = self.registry.create(version, transport)?;
        tracing::debug!(%version, request = %self.version, "Slurm client created");
        Ok(SlurmClient::new(adapter, self.watch))
    }

    fn transport(&self) -> Result<Arc<dyn Transport>> {
        if let Some(transport) = &self.transport {
            return Ok(transport.clone());
        }
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                Error::not_initialized("neither a transport nor a base URL was configured")
            })?;
        let base = Url::parse(base_url).map_err(|e| {
            Error::new(ErrorKind::InvalidRequest, format!("invalid base URL {base_url:?}"))
                .with_cause(e)
        })?;

        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .danger_accept_invalid_certs(self.insecure_skip_verify)
            .build()
            .map_err(|e| {
                Error::new(ErrorKind::InvalidRequest, "cannot build the HTTP client").with_cause(e)
            })?;
        let client = MiddlewareMenu::builder()
            .client(client)
            .auth(Arc::new(AuthMiddleware::new(self.authenticator.clone())))
            .timeout(self.timeout)
            .build()
            .make();

        Ok(Arc::new(HttpTransport::new(base, client).with_timeout(self.timeout)))
    }
}

#[cfg(test)]
mod tests {
    use domain::model::vo::ApiVersion;
    use indoc::indoc;
    use mockito::Matcher;

    use super::*;
    use crate::http::{ApiResponse, MockTransport, TokenAuth};
    use crate::registry::STABLE;

    #[tokio::test]
    async fn nothing_to_talk_to() {
        let err = ClientFactory::builder().build().create().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientNotInitialized);

        let err = ClientFactory::builder().base_url("  ").build().create().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientNotInitialized);
    }

    #[tokio::test]
    async fn explicit_version_over_given_transport() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.path == "/slurm/v0.0.41/ping")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"pings": [{"hostname": "ctl1", "responding": true}]}"#,
                ))
            });

        let client = ClientFactory::builder()
            .transport(Arc::new(transport))
            .version(VersionRequest::Explicit(ApiVersion::V0_0_41))
            .build()
            .create()
            .await
            .unwrap();
        assert_eq!(client.version(), ApiVersion::V0_0_41);
        assert_eq!(client.ping().await.unwrap()[0].hostname, "ctl1");
    }

    #[tokio::test]
    async fn unknown_version_is_refused_before_any_request() {
        let mut transport = MockTransport::new();
        transport.expect_execute().never();
        let err = ClientFactory::builder()
            .transport(Arc::new(transport))
            .version(VersionRequest::Explicit(ApiVersion::new(0, 0, 38)))
            .build()
            .create()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[tokio::test]
    async fn negotiates_and_authenticates_over_http() {
        let mut server = mockito::Server::new_async().await;
        let openapi = server
            .mock("GET", "/openapi/v3")
            .match_header("x-slurm-user-token", "secret")
            .match_header("x-slurm-user-name", "alice")
            .match_header("user-agent", "portal/2")
            .with_status(200)
            .with_body(r#"{"info": {"version": "Slurm-24.11.4"}}"#)
            .create_async()
            .await;
        let jobs = server
            .mock("GET", "/slurm/v0.0.41/jobs")
            .match_header("x-slurm-user-token", "secret")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(indoc! {r#"
                {
                  "jobs": [{"job_id": 11, "job_state": ["PENDING"], "name": "sim"}],
                  "errors": [],
                  "warnings": []
                }
            "#})
            .create_async()
            .await;

        let client = ClientFactory::builder()
            .base_url(server.url())
            .authenticator(Arc::new(TokenAuth::new("secret", Some("alice".to_owned()))))
            .version(VersionRequest::Negotiate)
            .user_agent("portal/2")
            .build()
            .create()
            .await
            .unwrap();
        assert_eq!(client.version(), ApiVersion::V0_0_41);

        let list = client.jobs().list(&Default::default()).await.unwrap();
        assert_eq!(list.items[0].job_id, 11);

        openapi.assert_async().await;
        jobs.assert_async().await;
    }

    #[tokio::test]
    async fn unconfigured_version_is_negotiated() {
        let mut server = mockito::Server::new_async().await;
        let openapi = server
            .mock("GET", "/openapi/v3")
            .with_status(200)
            .with_body(r#"{"info": {"version": "Slurm-25.05.0"}}"#)
            .create_async()
            .await;

        let client =
            ClientFactory::builder().base_url(server.url()).build().create().await.unwrap();
        assert_eq!(client.version(), ApiVersion::V0_0_43);
        openapi.assert_async().await;

        let config = ClientConfig {
            rest_url: server.url(),
            ..Default::default()
        };
        let client = ClientFactory::from_config(&config).unwrap().create().await.unwrap();
        assert_eq!(client.version(), ApiVersion::V0_0_43);
    }

    #[tokio::test]
    async fn unreachable_openapi_falls_back_to_stable() {
        let mut server = mockito::Server::new_async().await;
        let _openapi = server.mock("GET", "/openapi/v3").with_status(500).create_async().await;

        let client = ClientFactory::builder()
            .base_url(server.url())
            .version(VersionRequest::Negotiate)
            .build()
            .create()
            .await
            .unwrap();
        assert_eq!(client.version(), STABLE);
    }

    #[tokio::test]
    async fn from_config_carries_settings() {
        let config = ClientConfig::from_yaml(indoc! {"
            rest_url: http://127.0.0.1:1
            api_version: stable
            auth:
              type: bearer
              token: abc
            watch:
              interval: 1
              buffer: 2
        "})
        .unwrap();
        let client = ClientFactory::from_config(&config).unwrap().create().await.unwrap();
        assert_eq!(client.version(), STABLE);
    }
}
