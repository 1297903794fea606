use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use domain::model::vo::ApiVersion;
use domain::service::VersionAdapter;
use domain::{Error, ErrorKind, Result};

use crate::adapter::{Constructor, BUILTIN};
use crate::http::Transport;

/// The version picked by [`VersionRequest::Stable`].
pub const STABLE: ApiVersion = ApiVersion::V0_0_42;

/// Which API version a client should speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionRequest {
    Explicit(ApiVersion),
    Latest,
    Stable,
    /// Ask the server, see [`crate::negotiate`]. Falls back to [`STABLE`].
    #[default]
    Negotiate,
}

impl FromStr for VersionRequest {
    type Err = Error;

    /// `latest`, `stable`, `auto` or a version such as `v0.0.43`. Empty means `auto`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "stable" => Ok(Self::Stable),
            "" | "auto" | "negotiate" => Ok(Self::Negotiate),
            other => other.parse().map(Self::Explicit),
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(version) => write!(f, "{version}"),
            Self::Latest => f.write_str("latest"),
            Self::Stable => f.write_str("stable"),
            Self::Negotiate => f.write_str("auto"),
        }
    }
}

/// Explicit map from version to adapter constructor, resolved once per client.
#[derive(Clone)]
pub struct VersionRegistry {
    constructors: BTreeMap<ApiVersion, Constructor>,
}

impl VersionRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (version, constructor) in BUILTIN {
            registry.register(version, constructor);
        }
        registry
    }

    pub fn register(&mut self, version: ApiVersion, constructor: Constructor) -> &mut Self {
        self.constructors.insert(version, constructor);
        self
    }

    pub fn contains(&self, version: ApiVersion) -> bool {
        self.constructors.contains_key(&version)
    }

    /// Ascending.
    pub fn versions(&self) -> impl Iterator<Item = ApiVersion> + '_ {
        self.constructors.keys().copied()
    }

    pub fn latest(&self) -> Option<ApiVersion> {
        self.constructors.keys().next_back().copied()
    }

    /// Turns a request into a concrete, registered version. Negotiation needs a
    /// server and is done by the factory before it gets here.
    pub fn pick(&self, request: VersionRequest) -> Result<ApiVersion> {
        match request {
            VersionRequest::Explicit(version) if self.contains(version) => Ok(version),
            VersionRequest::Explicit(version) => Err(self.unknown(version)),
            VersionRequest::Latest => self.latest().ok_or_else(|| self.no_versions()),
            VersionRequest::Stable if self.contains(STABLE) => Ok(STABLE),
            VersionRequest::Stable => self.latest().ok_or_else(|| self.no_versions()),
            VersionRequest::Negotiate => Err(Error::new(
                ErrorKind::InvalidRequest,
                "version negotiation needs a server; resolve it through the client factory",
            )),
        }
    }

    pub fn create(
        &self,
        version: ApiVersion,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<dyn VersionAdapter>> {
        match self.constructors.get(&version) {
            Some(constructor) => Ok(constructor(transport)),
            None => Err(self.unknown(version)),
        }
    }

    pub fn resolve(
        &self,
        request: VersionRequest,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<dyn VersionAdapter>> {
        let version = self.pick(request)?;
        self.create(version, transport)
    }

    fn unknown(&self, version: ApiVersion) -> Error {
        let known = self.versions().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        Error::new(
            ErrorKind::UnsupportedOperation,
            format!("API version {version} is not supported (known: {known})"),
        )
        .with_version(version)
    }

    fn no_versions(&self) -> Error {
        Error::not_initialized("no API version is registered")
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for VersionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.versions()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    fn transport() -> Arc<dyn Transport> {
        Arc::new(MockTransport::new())
    }

    #[test]
    fn parse_requests() {
        assert_eq!("latest".parse::<VersionRequest>().unwrap(), VersionRequest::Latest);
        assert_eq!("".parse::<VersionRequest>().unwrap(), VersionRequest::Negotiate);
        assert_eq!(VersionRequest::default(), VersionRequest::Negotiate);
        assert_eq!("Stable".parse::<VersionRequest>().unwrap(), VersionRequest::Stable);
        assert_eq!("auto".parse::<VersionRequest>().unwrap(), VersionRequest::Negotiate);
        assert_eq!(
            "v0.0.41".parse::<VersionRequest>().unwrap(),
            VersionRequest::Explicit(ApiVersion::V0_0_41)
        );
        let err = "v0.0".parse::<VersionRequest>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn builtin_knows_five_versions() {
        let registry = VersionRegistry::builtin();
        assert_eq!(registry.versions().count(), 5);
        assert_eq!(registry.latest(), Some(ApiVersion::V0_0_44));
        assert_eq!(registry.pick(VersionRequest::Stable).unwrap(), ApiVersion::V0_0_42);
    }

    #[test]
    fn resolve_explicit() {
        let registry = VersionRegistry::builtin();
        let adapter = registry
            .resolve(VersionRequest::Explicit(ApiVersion::V0_0_43), transport())
            .unwrap();
        assert_eq!(adapter.version(), ApiVersion::V0_0_43);

        let err = registry
            .resolve(VersionRequest::Explicit(ApiVersion::new(0, 0, 39)), transport())
            .err()
            .expect("v0.0.39 is not registered");
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert!(err.message().contains("v0.0.40, v0.0.41"));
    }

    #[test]
    fn stable_falls_back_to_latest() {
        let mut registry = VersionRegistry::empty();
        assert_eq!(
            registry.pick(VersionRequest::Latest).unwrap_err().kind(),
            ErrorKind::ClientNotInitialized
        );
        registry.register(ApiVersion::V0_0_40, crate::adapter::v0_0_40::adapter);
        registry.register(ApiVersion::V0_0_41, crate::adapter::v0_0_41::adapter);
        assert_eq!(registry.pick(VersionRequest::Stable).unwrap(), ApiVersion::V0_0_41);
        assert_eq!(
            registry.pick(VersionRequest::Negotiate).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }
}
