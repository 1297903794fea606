use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::Method;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use url::Url;

use crate::http::middleware::RequestTimeout;

/// One slurmrestd call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Starts with `/`, e.g. `/slurm/v0.0.42/jobs`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
    pub www_authenticate: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            www_authenticate: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and hands back whatever the server answered. Only
/// failures to get an answer at all are errors here; statuses are judged
/// by the adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> anyhow::Result<ApiResponse>;
}

pub struct HttpTransport {
    base: Url,
    client: ClientWithMiddleware,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(base: Url, client: ClientWithMiddleware) -> Self {
        Self {
            base,
            client,
            timeout: None,
        }
    }

    /// Bounds the whole exchange, body included. The timeout middleware only
    /// sees the response head.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        let joined = format!("{}{path}", self.base.as_str().trim_end_matches('/'));
        Url::parse(&joined).with_context(|| format!("Invalid request URL {joined:?}"))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;

        let mut builder =
            self.client.request(method, self.url(&path)?).header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?);
        }

        let started = tokio::time::Instant::now();
        let resp = builder.send().await.map_err(unwrap_middleware)?;
        let status = resp.status().as_u16();
        let www_authenticate = resp
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = match self.timeout {
            Some(waiting) => tokio::time::timeout_at(started + waiting, resp.bytes())
                .await
                .map_err(|_| RequestTimeout(waiting))??,
            None => resp.bytes().await?,
        };

        Ok(ApiResponse {
            status,
            body,
            www_authenticate,
        })
    }
}

/// Keeps the concrete error reachable through `downcast_ref`.
fn unwrap_middleware(e: reqwest_middleware::Error) -> anyhow::Error {
    match e {
        reqwest_middleware::Error::Middleware(e) => e,
        reqwest_middleware::Error::Reqwest(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use indoc::indoc;
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::http::middleware::{AuthMiddleware, MiddlewareMenu};
    use crate::http::NoAuth;

    fn transport(server: &mockito::Server, timeout: Duration) -> HttpTransport {
        let client = MiddlewareMenu::builder()
            .client(reqwest::Client::new())
            .auth(Arc::new(AuthMiddleware::new(Arc::new(NoAuth))))
            .timeout(timeout)
            .build()
            .make();
        HttpTransport::new(Url::parse(&format!("{}/", server.url())).unwrap(), client)
            .with_timeout(timeout)
    }

    #[tokio::test]
    async fn sends_query_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/slurm/v0.0.42/job/7")
            .match_query(Matcher::UrlEncoded("signal".into(), "SIGUSR1".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"comment": "hi"})))
            .with_status(200)
            .with_body(indoc! {r#"
                {"errors": [], "warnings": []}
            "#})
            .create_async()
            .await;

        let request = ApiRequest::new(Method::POST, "/slurm/v0.0.42/job/7")
            .with_query(vec![("signal".into(), "SIGUSR1".into())])
            .with_body(json!({"comment": "hi"}));
        let resp = transport(&server, Duration::from_secs(5)).execute(request).await.unwrap();

        mock.assert_async().await;
        assert!(resp.is_success());
        assert!(resp.body.starts_with(b"{\"errors\""));
    }

    #[tokio::test]
    async fn error_statuses_are_answers() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slurm/v0.0.42/jobs")
            .with_status(401)
            .with_header("www-authenticate", r#"Bearer error="invalid_token""#)
            .create_async()
            .await;

        let resp = transport(&server, Duration::from_secs(5))
            .execute(ApiRequest::new(Method::GET, "/slurm/v0.0.42/jobs"))
            .await
            .unwrap();
        assert_eq!(resp.status, 401);
        assert_eq!(resp.www_authenticate.as_deref(), Some(r#"Bearer error="invalid_token""#));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let client = MiddlewareMenu::builder()
            .client(reqwest::Client::new())
            .auth(Arc::new(AuthMiddleware::new(Arc::new(NoAuth))))
            .timeout(Duration::from_secs(5))
            .build()
            .make();
        // Port 9 (discard) is closed on test machines.
        let transport = HttpTransport::new(Url::parse("http://127.0.0.1:9").unwrap(), client);
        let err = transport
            .execute(ApiRequest::new(Method::GET, "/slurm/v0.0.42/ping"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<reqwest::Error>().is_some());
        assert!(err.downcast_ref::<RequestTimeout>().is_none());
    }

    #[tokio::test]
    async fn stalled_body_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Answer the head and part of the body, then hold the socket open.
        let _server = tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let mut held = Vec::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"jobs\": [")
                    .await;
                held.push(socket);
            }
        });

        let waiting = Duration::from_millis(200);
        let client = MiddlewareMenu::builder()
            .client(reqwest::Client::new())
            .auth(Arc::new(AuthMiddleware::new(Arc::new(NoAuth))))
            .timeout(waiting)
            .build()
            .make();
        let transport = HttpTransport::new(Url::parse(&format!("http://{addr}")).unwrap(), client)
            .with_timeout(waiting);

        let err = tokio::time::timeout(
            Duration::from_secs(3),
            transport.execute(ApiRequest::new(Method::GET, "/slurm/v0.0.42/jobs")),
        )
        .await
        .expect("body read is bounded")
        .unwrap_err();
        assert_eq!(err.downcast_ref::<RequestTimeout>(), Some(&RequestTimeout(waiting)));
    }

    #[test]
    fn base_path_is_kept() {
        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        let transport =
            HttpTransport::new(Url::parse("https://proxy.example/hpc/").unwrap(), client);
        assert_eq!(
            transport.url("/slurm/v0.0.44/jobs").unwrap().as_str(),
            "https://proxy.example/hpc/slurm/v0.0.44/jobs"
        );
    }
}
