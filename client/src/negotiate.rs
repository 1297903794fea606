//! Picking an API version by reading slurmrestd's OpenAPI document.

use std::collections::BTreeMap;

use domain::model::vo::ApiVersion;
use regex::Regex;
use reqwest::Method;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::http::{ApiRequest, Transport};
use crate::registry::{VersionRegistry, VersionRequest, STABLE};

pub const OPENAPI_PATH: &str = "/openapi/v3";

/// Slurm releases and the API versions their slurmrestd serves.
pub const RELEASES: [(&str, &[ApiVersion]); 4] = [
    ("24.05", &[ApiVersion::V0_0_40]),
    ("24.11", &[ApiVersion::V0_0_40, ApiVersion::V0_0_41]),
    (
        "25.05",
        &[
            ApiVersion::V0_0_40,
            ApiVersion::V0_0_41,
            ApiVersion::V0_0_42,
            ApiVersion::V0_0_43,
        ],
    ),
    (
        "25.11",
        &[
            ApiVersion::V0_0_41,
            ApiVersion::V0_0_42,
            ApiVersion::V0_0_43,
            ApiVersion::V0_0_44,
        ],
    ),
];

/// Versions served by a release such as `25.11`, `25.11.1` or `Slurm-25.11.1`.
/// Empty for releases this crate does not know.
pub fn release_versions(release: &str) -> &'static [ApiVersion] {
    let release = release.trim();
    let release = release.strip_prefix("Slurm-").unwrap_or(release);
    let mut parts = release.splitn(3, '.');
    let (Some(major), Some(minor)) = (parts.next(), parts.next()) else {
        return &[];
    };
    RELEASES
        .iter()
        .find(|(known, _)| known.split_once('.') == Some((major, minor)))
        .map(|(_, versions)| *versions)
        .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenApiDocument {
    info: OpenApiInfo,
    servers: Vec<OpenApiServer>,
    paths: BTreeMap<String, IgnoredAny>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenApiInfo {
    version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenApiServer {
    url: String,
}

/// The highest registered version the server advertises. Falls back to the
/// stable version when the lookup fails or finds nothing usable.
pub async fn negotiate(transport: &dyn Transport, registry: &VersionRegistry) -> ApiVersion {
    let fallback = registry.pick(VersionRequest::Stable).unwrap_or(STABLE);
    match discover(transport, registry).await {
        Ok(Some(version)) => {
            tracing::info!(%version, "Negotiated slurmrestd API version");
            version
        }
        Ok(None) => {
            tracing::warn!(%fallback, "slurmrestd advertises no known API version, using fallback");
            fallback
        }
        Err(e) => {
            tracing::warn!(%fallback, cause = %e, "API version discovery failed, using fallback");
            fallback
        }
    }
}

async fn discover(
    transport: &dyn Transport,
    registry: &VersionRegistry,
) -> anyhow::Result<Option<ApiVersion>> {
    let response = transport.execute(ApiRequest::new(Method::GET, OPENAPI_PATH)).await?;
    anyhow::ensure!(
        response.is_success(),
        "{OPENAPI_PATH} answered HTTP {}",
        response.status
    );
    let document: OpenApiDocument = serde_json::from_slice(&response.body)?;
    choose(&document, registry)
}

fn choose(
    document: &OpenApiDocument,
    registry: &VersionRegistry,
) -> anyhow::Result<Option<ApiVersion>> {
    let info = document.info.version.trim();

    if info.starts_with("Slurm-") {
        let best = release_versions(info)
            .iter()
            .copied()
            .filter(|v| registry.contains(*v))
            .max();
        if best.is_some() {
            return Ok(best);
        }
    } else if let Ok(version) = info.parse::<ApiVersion>() {
        if registry.contains(version) {
            return Ok(Some(version));
        }
    }

    let pattern = Regex::new(r"v\d+\.\d+\.\d+")?;
    let advertised = document
        .servers
        .iter()
        .map(|server| server.url.as_str())
        .chain(document.paths.keys().map(String::as_str))
        .flat_map(|text| pattern.find_iter(text))
        .filter_map(|m| m.as_str().parse::<ApiVersion>().ok())
        .filter(|v| registry.contains(*v))
        .max();
    Ok(advertised)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::http::{ApiResponse, MockTransport};

    fn serving(status: u16, body: &'static str) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.method == Method::GET && req.path == OPENAPI_PATH)
            .times(1)
            .returning(move |_| Ok(ApiResponse::new(status, body)));
        transport
    }

    #[test]
    fn release_table() {
        assert_eq!(release_versions("Slurm-24.05.3"), [ApiVersion::V0_0_40]);
        assert_eq!(release_versions("25.11").last(), Some(&ApiVersion::V0_0_44));
        assert!(release_versions("23.02.1").is_empty());
        assert!(release_versions("garbage").is_empty());
    }

    #[tokio::test]
    async fn slurm_release_maps_to_newest_served_version() {
        let transport =
            serving(200, r#"{"info": {"version": "Slurm-25.05.2"}, "servers": [{"url": "/"}]}"#);
        let version = negotiate(&transport, &VersionRegistry::builtin()).await;
        assert_eq!(version, ApiVersion::V0_0_43);
    }

    #[tokio::test]
    async fn paths_are_scanned_when_info_is_silent() {
        let transport = serving(
            200,
            indoc! {r#"
                {
                  "info": {"version": "dbv0.0.39"},
                  "paths": {
                    "/slurm/v0.0.41/jobs": {},
                    "/slurm/v0.0.42/jobs": {},
                    "/slurm/v0.0.99/jobs": {}
                  }
                }
            "#},
        );
        let version = negotiate(&transport, &VersionRegistry::builtin()).await;
        assert_eq!(version, ApiVersion::V0_0_42);
    }

    #[tokio::test]
    async fn failed_discovery_falls_back_to_stable() {
        let transport = serving(404, "");
        assert_eq!(negotiate(&transport, &VersionRegistry::builtin()).await, STABLE);

        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        assert_eq!(negotiate(&transport, &VersionRegistry::builtin()).await, STABLE);
    }

    #[tokio::test]
    async fn only_registered_versions_are_picked() {
        let mut registry = VersionRegistry::empty();
        registry.register(ApiVersion::V0_0_41, crate::adapter::v0_0_41::adapter);
        let transport = serving(200, r#"{"info": {"version": "Slurm-25.11.0"}}"#);
        assert_eq!(negotiate(&transport, &registry).await, ApiVersion::V0_0_41);
    }
}
