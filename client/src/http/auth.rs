use std::sync::Arc;

use anyhow::Context;
use arc_swap::ArcSwap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;

use super::header::{SLURM_USER_NAME, SLURM_USER_TOKEN};

/// Decorates an outgoing request with credentials.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &mut Request) -> anyhow::Result<()>;

    fn scheme(&self) -> &'static str;
}

pub struct NoAuth;

#[async_trait::async_trait]
impl Authenticator for NoAuth {
    async fn authenticate(&self, _request: &mut Request) -> anyhow::Result<()> {
        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "none"
    }
}

/// slurmrestd's JWT plugin headers. The token can be swapped while requests
/// are in flight.
pub struct TokenAuth {
    token: ArcSwap<String>,
    user_name: Option<String>,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>, user_name: Option<String>) -> Self {
        Self {
            token: ArcSwap::from(Arc::new(token.into())),
            user_name: user_name.filter(|name| !name.is_empty()),
        }
    }

    pub fn rotate(&self, token: impl Into<String>) {
        self.token.store(Arc::new(token.into()));
        tracing::debug!("Slurm token rotated");
    }
}

#[async_trait::async_trait]
impl Authenticator for TokenAuth {
    async fn authenticate(&self, request: &mut Request) -> anyhow::Result<()> {
        let token = self.token.load();
        if token.is_empty() {
            return Ok(());
        }

        let headers = request.headers_mut();
        headers.insert(
            HeaderName::from_static(SLURM_USER_TOKEN),
            sensitive(&token).context("Slurm token contains characters not allowed in a header")?,
        );
        if let Some(user_name) = &self.user_name {
            headers.insert(
                HeaderName::from_static(SLURM_USER_NAME),
                HeaderValue::from_str(user_name)
                    .context("Slurm user name is not a valid header value")?,
            );
        }

        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "token"
    }
}

pub struct BearerAuth {
    header: HeaderValue,
}

impl BearerAuth {
    pub fn new(token: &str) -> anyhow::Result<Self> {
        let header = sensitive(&format!("Bearer {token}"))
            .context("Bearer token is not a valid header value")?;
        Ok(Self { header })
    }
}

#[async_trait::async_trait]
impl Authenticator for BearerAuth {
    async fn authenticate(&self, request: &mut Request) -> anyhow::Result<()> {
        request.headers_mut().insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "bearer"
    }
}

pub struct BasicAuth {
    header: HeaderValue,
}

impl BasicAuth {
    pub fn new(username: &str, password: &str) -> anyhow::Result<Self> {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        let header = sensitive(&format!("Basic {encoded}"))?;
        Ok(Self { header })
    }
}

#[async_trait::async_trait]
impl Authenticator for BasicAuth {
    async fn authenticate(&self, request: &mut Request) -> anyhow::Result<()> {
        request.headers_mut().insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "basic"
    }
}

fn sensitive(value: &str) -> anyhow::Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use url::Url;

    use super::*;

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("http://localhost:6820/slurm/v0.0.42/ping").unwrap())
    }

    #[tokio::test]
    async fn token_headers() {
        let auth = TokenAuth::new("jwt-1", Some("alice".to_owned()));
        let mut req = request();
        auth.authenticate(&mut req).await.unwrap();
        assert_eq!(req.headers()[SLURM_USER_TOKEN], "jwt-1");
        assert_eq!(req.headers()[SLURM_USER_NAME], "alice");

        auth.rotate("jwt-2");
        let mut req = request();
        auth.authenticate(&mut req).await.unwrap();
        assert_eq!(req.headers()[SLURM_USER_TOKEN], "jwt-2");
    }

    #[tokio::test]
    async fn empty_token_adds_nothing() {
        let auth = TokenAuth::new("", Some("alice".to_owned()));
        let mut req = request();
        auth.authenticate(&mut req).await.unwrap();
        assert!(req.headers().is_empty());
    }

    #[tokio::test]
    async fn basic_and_bearer() {
        let mut req = request();
        BasicAuth::new("alice", "s3cret").unwrap().authenticate(&mut req).await.unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Basic YWxpY2U6czNjcmV0");
        assert!(req.headers()[AUTHORIZATION].is_sensitive());

        let mut req = request();
        BearerAuth::new("abc").unwrap().authenticate(&mut req).await.unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(BearerAuth::new("bad\ntoken").is_err());
    }
}
