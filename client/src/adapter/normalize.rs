//! Turns transport failures, HTTP statuses and slurmrestd error envelopes
//! into [`domain::Error`].

use std::error::Error as StdError;

use domain::model::vo::ApiVersion;
use domain::{ApiErrorDetail, Error, ErrorKind, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::http::header::parse_www_authenticate;
use crate::http::middleware::RequestTimeout;
use crate::http::ApiResponse;

/// The `errors` and `warnings` arrays every slurmrestd response carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<ApiErrorDetail>,
    pub warnings: Vec<String>,
}

/// Reads [`Diagnostics`] out of a raw body in one version's schema. Must
/// return the empty value for bodies it cannot read.
pub type DiagnosticsParser = fn(&[u8]) -> Diagnostics;

/// Fails when the status is not 2xx or the envelope lists errors.
pub fn check_response(
    version: ApiVersion,
    operation: &str,
    response: &ApiResponse,
    parse: DiagnosticsParser,
) -> Result<Diagnostics> {
    let diagnostics = parse(&response.body);
    if response.is_success() && diagnostics.errors.is_empty() {
        return Ok(diagnostics);
    }

    let kind = if response.is_success() {
        ErrorKind::Unknown
    } else {
        ErrorKind::from_status(response.status)
    };
    let message = match diagnostics.errors.as_slice() {
        [] => {
            let reason = StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("unexpected status");
            let challenge = response
                .www_authenticate
                .as_deref()
                .and_then(parse_www_authenticate)
                .and_then(|w3auth| w3auth.error_description);
            match challenge {
                Some(description) => {
                    format!("{operation}: HTTP {} {reason}: {description}", response.status)
                }
                None => format!("{operation}: HTTP {} {reason}", response.status),
            }
        }
        [only] => format!("{operation}: {only}"),
        [first, rest @ ..] => format!("{operation}: {first} (and {} more)", rest.len()),
    };

    Err(Error::new(kind, message)
        .with_version(version)
        .with_status(response.status)
        .with_details(diagnostics.errors))
}

/// `None` stays `None`; anything else becomes a typed error carrying `version`.
pub fn wrap(version: ApiVersion, operation: &str, err: Option<anyhow::Error>) -> Option<Error> {
    err.map(|e| transport_error(version, operation, e))
}

pub fn transport_error(version: ApiVersion, operation: &str, err: anyhow::Error) -> Error {
    let err = match err.downcast::<Error>() {
        Ok(typed) if typed.version().is_some() => return typed,
        Ok(typed) => return typed.with_version(version),
        Err(err) => err,
    };

    let kind = classify(&err);
    let message = format!("{operation}: {err:#}");
    Error::new(kind, message).with_version(version).with_cause(root_cause(err))
}

/// Decodes a 2xx body. An empty body reads as `{}`.
pub fn decode<T: DeserializeOwned>(version: ApiVersion, operation: &str, body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| {
        Error::new(ErrorKind::InvalidResponse, format!("{operation}: undecodable response: {e}"))
            .with_version(version)
            .with_cause(e)
    })
}

fn classify(err: &anyhow::Error) -> ErrorKind {
    for cause in err.chain() {
        if cause.is::<RequestTimeout>() {
            return ErrorKind::Timeout;
        }
        if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
            if e.is_timeout() {
                return ErrorKind::Timeout;
            }
            if e.is_builder() {
                return ErrorKind::InvalidRequest;
            }
            return ErrorKind::Network;
        }
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            if e.kind() == std::io::ErrorKind::TimedOut {
                return ErrorKind::Timeout;
            }
            return ErrorKind::Network;
        }
        if cause.is::<url::ParseError>() {
            return ErrorKind::InvalidRequest;
        }
    }
    ErrorKind::Network
}

/// Keeps well-known errors concrete so callers can downcast the `source()`.
fn root_cause(err: anyhow::Error) -> Box<dyn StdError + Send + Sync> {
    let err = match err.downcast::<reqwest::Error>() {
        Ok(e) => return Box::new(e),
        Err(err) => err,
    };
    match err.downcast::<RequestTimeout>() {
        Ok(e) => Box::new(e),
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use indoc::indoc;

    use super::*;

    const V: ApiVersion = ApiVersion::V0_0_42;

    fn parser(body: &[u8]) -> Diagnostics {
        #[derive(serde::Deserialize, Default)]
        #[serde(default)]
        struct Envelope {
            errors: Vec<Entry>,
            warnings: Vec<Entry>,
        }
        #[derive(serde::Deserialize, Default)]
        #[serde(default)]
        struct Entry {
            description: String,
            error_number: i32,
            error: String,
            source: String,
        }

        let envelope: Envelope = serde_json::from_slice(body).unwrap_or_default();
        Diagnostics {
            errors: envelope
                .errors
                .into_iter()
                .map(|e| ApiErrorDetail {
                    code: e.error,
                    number: Some(e.error_number).filter(|n| *n != 0),
                    description: e.description,
                    source: e.source,
                })
                .collect(),
            warnings: envelope.warnings.into_iter().map(|w| w.description).collect(),
        }
    }

    #[test]
    fn status_decides_kind() {
        for (status, kind) in [
            (404, ErrorKind::NotFound),
            (409, ErrorKind::Conflict),
            (422, ErrorKind::ValidationFailed),
            (503, ErrorKind::ServerUnavailable),
            (418, ErrorKind::Unknown),
        ] {
            let err =
                check_response(V, "get job", &ApiResponse::new(status, ""), parser).unwrap_err();
            assert_eq!(err.kind(), kind, "{status}");
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.version(), Some(V));
        }
    }

    #[test]
    fn envelope_details_win() {
        let body = indoc! {r#"
            {
              "errors": [
                {
                  "description": "Job 42 not found", "error_number": 2017,
                  "error": "Invalid job id specified", "source": "_handle_job_get"
                },
                {"description": "second", "error_number": 0, "error": "", "source": ""}
              ],
              "warnings": []
            }
        "#};
        let err = check_response(V, "get job", &ApiResponse::new(500, body), parser).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerInternal);
        assert_eq!(
            err.message(),
            "get job: Job 42 not found (error 2017, _handle_job_get) (and 1 more)"
        );
        assert_eq!(err.details().len(), 2);
        assert_eq!(err.details()[0].number, Some(2017));
    }

    #[test]
    fn success_with_errors_is_unknown() {
        let body = r#"{"errors": [{"description": "partial failure"}]}"#;
        let err =
            check_response(V, "update node", &ApiResponse::new(200, body), parser).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn success_keeps_warnings() {
        let body = r#"{"warnings": [{"description": "deprecated field"}]}"#;
        let diagnostics =
            check_response(V, "list jobs", &ApiResponse::new(200, body), parser).unwrap();
        assert_eq!(diagnostics.warnings, ["deprecated field"]);
    }

    #[test]
    fn unauthorized_mentions_challenge() {
        let resp = ApiResponse {
            status: 401,
            body: Default::default(),
            www_authenticate: Some(
                r#"Bearer error="invalid_token", error_description="token expired""#.to_owned(),
            ),
        };
        let err = check_response(V, "list jobs", &resp, parser).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), "list jobs: HTTP 401 Unauthorized: token expired");
    }

    #[test]
    fn wrap_none_is_none() {
        assert!(wrap(V, "ping", None).is_none());
    }

    #[test]
    fn transport_failures() {
        let err =
            wrap(V, "list jobs", Some(RequestTimeout(Duration::from_secs(30)).into())).unwrap();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.version(), Some(V));
        assert!(err.chain().any(|e| e.is::<RequestTimeout>()));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = transport_error(V, "list jobs", anyhow::Error::new(io).context("connect"));
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.is_retryable());
    }

    #[test]
    fn typed_errors_pass_through() {
        let typed = Error::not_found("job 1 not found");
        let err = transport_error(V, "get job", typed.into());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.version(), Some(V));
    }

    #[test]
    fn undecodable_body() {
        let err = decode::<serde_json::Value>(V, "list jobs", b"<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        let empty: serde_json::Value = decode(V, "delete job", b"").unwrap();
        assert!(empty.as_object().is_some_and(|o| o.is_empty()));
    }
}
