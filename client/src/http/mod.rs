mod auth;
pub mod header;
pub mod middleware;
mod transport;

#[rustfmt::skip]
pub use self::{
    auth::{Authenticator, BasicAuth, BearerAuth, NoAuth, TokenAuth},
    transport::{ApiRequest, ApiResponse, HttpTransport, Transport},
};

#[cfg(test)]
pub use self::transport::MockTransport;
