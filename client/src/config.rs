use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use domain::{Error, Result};
use serde::*;
use service::prelude::{WatchDefaults, DEFAULT_BUFFER, DEFAULT_POLL_INTERVAL};
use url::Url;

use crate::http::{Authenticator, BasicAuth, BearerAuth, NoAuth, TokenAuth};
use crate::registry::VersionRequest;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_rest_url")]
    pub rest_url: String,

    /// `auto` (ask the server), `latest`, `stable` or a version such as `v0.0.42`.
    #[serde(default = "ClientConfig::default_api_version")]
    pub api_version: String,

    /// Seconds.
    #[serde(default = "ClientConfig::default_timeout")]
    pub timeout: u64,

    #[serde(default = "ClientConfig::default_user_agent")]
    pub user_agent: String,

    #[serde(default = "Default::default")]
    pub insecure_skip_verify: bool,

    #[serde(default = "Default::default")]
    pub auth: AuthConfig,

    #[serde(default = "Default::default")]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    #[default]
    None,
    Token {
        token: String,
        #[serde(default = "Default::default")]
        user_name: Option<String>,
    },
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    /// Seconds between polls.
    #[serde(default = "WatchConfig::default_interval")]
    pub interval: u64,

    #[serde(default = "WatchConfig::default_buffer")]
    pub buffer: usize,
}

impl ClientConfig {
    pub fn default_rest_url() -> String {
        "http://localhost:6820".to_owned()
    }

    pub fn default_api_version() -> String {
        "auto".to_owned()
    }

    pub fn default_timeout() -> u64 {
        30
    }

    pub fn default_user_agent() -> String {
        "slurm-client/1.0".to_owned()
    }

    /// Reads `path` when given and present, then `SLURM_*` environment
    /// variables. Nested keys use `__`, e.g. `SLURM_AUTH__TOKEN`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let builder = builder.add_source(
            Environment::with_prefix("SLURM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::build(builder)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Self::build(config::Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.rest_url).map_err(|e| {
            Error::validation(format!("rest_url {:?} is not a URL", self.rest_url)).with_cause(e)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "rest_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout == 0 {
            return Err(Error::validation("timeout must be positive"));
        }
        if self.watch.interval == 0 {
            return Err(Error::validation("watch interval must be positive"));
        }
        if self.watch.buffer == 0 {
            return Err(Error::validation("watch buffer must be positive"));
        }
        self.version_request().map_err(|e| Error::validation(e.message().to_owned()))?;
        Ok(())
    }

    pub fn version_request(&self) -> Result<VersionRequest> {
        self.api_version.parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: Self::default_rest_url(),
            api_version: Self::default_api_version(),
            timeout: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            insecure_skip_verify: false,
            auth: AuthConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn authenticator(&self) -> anyhow::Result<Arc<dyn Authenticator>> {
        Ok(match self {
            Self::None => Arc::new(NoAuth),
            Self::Token { token, user_name } => {
                Arc::new(TokenAuth::new(token.clone(), user_name.clone()))
            }
            Self::Bearer { token } => Arc::new(BearerAuth::new(token)?),
            Self::Basic { username, password } => Arc::new(BasicAuth::new(username, password)?),
        })
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Self::default_interval(),
            buffer: Self::default_buffer(),
        }
    }
}

impl WatchConfig {
    pub fn default_interval() -> u64 {
        DEFAULT_POLL_INTERVAL.as_secs()
    }

    pub fn default_buffer() -> usize {
        DEFAULT_BUFFER
    }

    pub fn defaults(&self) -> WatchDefaults {
        WatchDefaults {
            poll_interval: Duration::from_secs(self.interval),
            buffer: self.buffer,
        }
    }
}
