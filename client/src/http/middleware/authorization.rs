use std::sync::Arc;

use reqwest::header::WWW_AUTHENTICATE;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

use crate::http::header::parse_www_authenticate;
use crate::http::Authenticator;

/// Applies an [`Authenticator`] to every request and reports rejected
/// credentials. A 401 is passed through untouched.
pub struct AuthMiddleware {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthMiddleware {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait::async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        self.authenticator
            .authenticate(&mut req)
            .await
            .map_err(reqwest_middleware::Error::Middleware)?;
        let resp = next.run(req, extensions).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let challenge = resp
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|s| s.to_str().ok())
                .and_then(parse_www_authenticate);
            match challenge {
                Some(w3auth) => tracing::warn!(
                    auth = self.authenticator.scheme(),
                    realm = ?w3auth.realm,
                    error = ?w3auth.error,
                    description = ?w3auth.error_description,
                    "Credentials rejected"
                ),
                None => tracing::warn!(auth = self.authenticator.scheme(), "Credentials rejected"),
            }
        }

        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::middleware::MiddlewareMenu;
    use crate::http::TokenAuth;

    #[tokio::test]
    async fn token_reaches_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/slurm/v0.0.41/ping")
            .match_header("x-slurm-user-token", "jwt")
            .match_header("x-slurm-user-name", "root")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let auth = TokenAuth::new("jwt", Some("root".to_owned()));
        let client = MiddlewareMenu::builder()
            .client(reqwest::Client::new())
            .auth(Arc::new(AuthMiddleware::new(Arc::new(auth))))
            .timeout(Duration::from_secs(5))
            .build()
            .make();
        let resp = client.get(format!("{}/slurm/v0.0.41/ping", server.url())).send().await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_is_passed_through() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slurm/v0.0.41/ping")
            .with_status(401)
            .with_header("www-authenticate", r#"Bearer realm="slurm", error="invalid_token""#)
            .create_async()
            .await;

        let client = MiddlewareMenu::builder()
            .client(reqwest::Client::new())
            .auth(Arc::new(AuthMiddleware::new(Arc::new(TokenAuth::new("expired", None)))))
            .timeout(Duration::from_secs(5))
            .build()
            .make();
        let resp = client.get(format!("{}/slurm/v0.0.41/ping", server.url())).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
