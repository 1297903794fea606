use std::fmt;

use crate::model::vo::{ApiVersion, Operation, ResourceKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failure classes every adapter call is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Local input check failed, or the backend answered 400/422.
    ValidationFailed,
    /// The request itself is malformed (e.g. an unparsable version string).
    InvalidRequest,
    NotFound,
    Conflict,
    Unauthorized,
    PermissionDenied,
    RateLimited,
    ServerInternal,
    ServerUnavailable,
    /// Connection refused, reset, DNS failure and other transport breakage.
    Network,
    Timeout,
    /// No transport or base URL was configured.
    ClientNotInitialized,
    /// The active API version lacks the operation.
    UnsupportedOperation,
    /// A 2xx body that could not be decoded into the wire schema.
    InvalidResponse,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::ValidationFailed,
            401 => Self::Unauthorized,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500 => Self::ServerInternal,
            502..=504 => Self::ServerUnavailable,
            _ => Self::Unknown,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network
                | Self::Timeout
                | Self::ServerInternal
                | Self::ServerUnavailable
                | Self::RateLimited
        )
    }
}

/// One entry of the `errors` array slurmrestd puts in its response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetail {
    pub code: String,
    pub number: Option<i32>,
    pub description: String,
    pub source: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.description.is_empty() {
            &self.code
        } else {
            &self.description
        };
        match (self.number, self.source.is_empty()) {
            (Some(n), false) => write!(f, "{text} (error {n}, {})", self.source),
            (Some(n), true) => write!(f, "{text} (error {n})"),
            (None, false) => write!(f, "{text} ({})", self.source),
            (None, true) => f.write_str(text),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    version: Option<ApiVersion>,
    status: Option<u16>,
    details: Vec<ApiErrorDetail>,
    #[source]
    cause: Option<BoxError>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            version: None,
            status: None,
            details: Vec::new(),
            cause: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn not_initialized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientNotInitialized, message)
    }

    pub fn unsupported(version: ApiVersion, resource: ResourceKind, operation: Operation) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperation,
            format!("{operation} {resource} is not supported by API {version}"),
        )
        .with_version(version)
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: Vec<ApiErrorDetail>) -> Self {
        self.details = details;
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn version(&self) -> Option<ApiVersion> {
        self.version
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn details(&self) -> &[ApiErrorDetail] {
        &self.details
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Walks the `source()` chain, starting with this error.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn std::error::Error + 'static)> {
        let mut next: Option<&(dyn std::error::Error + 'static)> = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.source();
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (400, ErrorKind::ValidationFailed),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::PermissionDenied),
            (404, ErrorKind::NotFound),
            (409, ErrorKind::Conflict),
            (422, ErrorKind::ValidationFailed),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::ServerInternal),
            (502, ErrorKind::ServerUnavailable),
            (503, ErrorKind::ServerUnavailable),
            (504, ErrorKind::ServerUnavailable),
            (418, ErrorKind::Unknown),
            (501, ErrorKind::Unknown),
        ];
        for (status, kind) in cases {
            assert_eq!(ErrorKind::from_status(status), kind, "status {status}");
        }
    }

    #[test]
    fn retryable_follows_kind() {
        assert!(Error::new(ErrorKind::RateLimited, "slow down").is_retryable());
        assert!(Error::new(ErrorKind::ServerUnavailable, "").is_retryable());
        assert!(!Error::new(ErrorKind::NotFound, "retry me please").is_retryable());
        assert!(!Error::new(ErrorKind::Conflict, "").is_retryable());
    }

    #[test]
    fn cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::new(ErrorKind::Network, "list jobs failed")
            .with_version(ApiVersion::V0_0_42)
            .with_cause(io);

        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(chain, ["NETWORK: list jobs failed", "refused"]);
        assert_eq!(err.version(), Some(ApiVersion::V0_0_42));
        let root = err.chain().last().unwrap();
        assert!(root.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn unsupported_message() {
        let err = Error::unsupported(
            ApiVersion::V0_0_40,
            ResourceKind::Partition,
            Operation::Create,
        );
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(err.message(), "create partition is not supported by API v0.0.40");
    }

    #[test]
    fn detail_display() {
        let detail = ApiErrorDetail {
            code: "ESLURM_INVALID_JOB_ID".to_owned(),
            number: Some(2017),
            description: "Invalid job id specified".to_owned(),
            source: "_handle_job_get".to_owned(),
        };
        assert_eq!(
            detail.to_string(),
            "Invalid job id specified (error 2017, _handle_job_get)"
        );
    }
}
