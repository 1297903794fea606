use std::fmt::Display;
use std::sync::Arc;

use domain::model::vo::{ApiVersion, Operation, ResourceKind};
use domain::{Error, ErrorKind, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::normalize::{self, DiagnosticsParser};
use crate::http::{ApiRequest, Transport};

/// Query string builder that skips unset values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Comma separated; nothing is added for an empty slice.
    pub fn csv(self, key: &str, values: &[impl ToString]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        self.set(key, joined)
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// The transport seen through one API version: every call is logged, judged
/// and decoded the same way.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    version: ApiVersion,
    diagnostics: DiagnosticsParser,
}

impl RestClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        version: ApiVersion,
        diagnostics: DiagnosticsParser,
    ) -> Self {
        Self {
            transport,
            version,
            diagnostics,
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn unsupported(&self, resource: ResourceKind, operation: Operation) -> Error {
        Error::unsupported(self.version, resource, operation)
    }

    pub fn not_found(&self, resource: ResourceKind, id: impl Display) -> Error {
        Error::not_found(format!("{resource} {id} not found")).with_version(self.version)
    }

    pub fn invalid_response(&self, message: impl Into<String>) -> Error {
        Error::new(ErrorKind::InvalidResponse, message).with_version(self.version)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: String,
        query: Query,
    ) -> Result<T> {
        let request = ApiRequest::new(Method::GET, path).with_query(query.into_pairs());
        self.call(operation, request).await
    }

    pub async fn post<B, T>(&self, operation: &str, path: String, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| {
            Error::new(ErrorKind::InvalidRequest, format!("{operation}: unencodable body: {e}"))
                .with_version(self.version)
        })?;
        self.call(operation, ApiRequest::new(Method::POST, path).with_body(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: String,
        query: Query,
    ) -> Result<T> {
        let request = ApiRequest::new(Method::DELETE, path).with_query(query.into_pairs());
        self.call(operation, request).await
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, request: ApiRequest) -> Result<T> {
        tracing::debug!(
            version = %self.version,
            operation,
            method = %request.method,
            path = %request.path,
            "Calling slurmrestd"
        );

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| normalize::transport_error(self.version, operation, e))?;
        let diagnostics =
            normalize::check_response(self.version, operation, &response, self.diagnostics)?;
        for warning in &diagnostics.warnings {
            tracing::warn!(
                version = %self.version,
                operation,
                warning = %warning,
                "slurmrestd warning"
            );
        }

        normalize::decode(self.version, operation, &response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_skips_unset() {
        let query = Query::new()
            .opt("update_time", None::<i64>)
            .opt("signal", Some("SIGKILL"))
            .csv("users", &["alice", "bob"])
            .csv("accounts", &[] as &[&str]);
        assert_eq!(
            query.into_pairs(),
            [
                ("signal".to_owned(), "SIGKILL".to_owned()),
                ("users".to_owned(), "alice,bob".to_owned())
            ]
        );
    }
}
