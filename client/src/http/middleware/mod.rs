mod authorization;
mod timeout;

use std::sync::Arc;
use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use typed_builder::TypedBuilder;

#[rustfmt::skip]
pub use self::{
    authorization::AuthMiddleware,
    timeout::{RequestTimeout, TimeoutMiddleware},
};

#[derive(TypedBuilder)]
pub struct MiddlewareMenu {
    client: reqwest::Client,
    auth: Arc<AuthMiddleware>,
    timeout: Duration,
}

impl MiddlewareMenu {
    pub fn make(self) -> ClientWithMiddleware {
        let Self {
            client,
            auth,
            timeout,
        } = self;

        // Middlewares run in the order they are attached: Auth -> Timeout.
        // Requests are never retried here, callers decide with `Error::is_retryable`.
        ClientBuilder::new(client)
            .with_arc(auth)
            .with(TimeoutMiddleware::new(timeout))
            .build()
    }
}
