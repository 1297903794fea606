//! A typed client for slurmrestd that speaks several REST API versions
//! through one version-independent model.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use slurm_client::{ClientConfig, ClientFactory};
//!
//! let config = ClientConfig::load(None)?;
//! let client = ClientFactory::from_config(&config)?.create().await?;
//! let running = client.jobs().list(&Default::default()).await?;
//! println!("{} jobs on API {}", running.total, client.version());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod factory;
pub mod http;
pub mod negotiate;
pub mod registry;

#[rustfmt::skip]
pub use self::{
    config::{AuthConfig, ClientConfig, WatchConfig},
    factory::ClientFactory,
    http::{Authenticator, BasicAuth, BearerAuth, NoAuth, TokenAuth, Transport},
    registry::{VersionRegistry, VersionRequest},
};
pub use domain::model::entity::*;
pub use domain::model::vo::*;
pub use domain::model::{Filter, Resource};
pub use domain::service::{Adapted, VersionAdapter};
pub use domain::{ApiErrorDetail, Error, ErrorKind, Result};
pub use service::prelude::*;
