/// A parsed `WWW-Authenticate` challenge, as sent by slurmrestd's JWT plugin
/// or by an authenticating proxy in front of it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WwwAuthenticate {
    pub scheme: String,
    pub realm: Option<String>,
    pub error: Option<AuthError>,
    pub error_description: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// HTTP 400 (Bad Request)
    InvalidRequest,
    /// HTTP 401 (Unauthorized)
    InvalidToken,
    /// HTTP 403 (Forbidden)
    InsufficientScope,
    Other(String),
}

impl AuthError {
    fn new(s: &str) -> Self {
        match s {
            "invalid_request" => Self::InvalidRequest,
            "invalid_token" => Self::InvalidToken,
            "insufficient_scope" => Self::InsufficientScope,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Parameters may come in any order; unknown ones are ignored.
pub fn parse(s: &str) -> Option<WwwAuthenticate> {
    let s = s.trim();
    let (scheme, params) = s.split_once(' ').unwrap_or((s, ""));
    if scheme.is_empty() || scheme.contains('=') {
        return None;
    }

    let mut challenge = WwwAuthenticate {
        scheme: scheme.to_owned(),
        ..Default::default()
    };
    for param in split_params(params) {
        let (key, value) = param.split_once('=')?;
        let value = value.trim().trim_matches('"');
        match key.trim() {
            "realm" => challenge.realm = Some(value.to_owned()),
            "error" => challenge.error = Some(AuthError::new(value)),
            "error_description" => challenge.error_description = Some(value.to_owned()),
            _ => {}
        }
    }

    Some(challenge)
}

/// Splits on commas outside quoted strings.
fn split_params(params: &str) -> impl Iterator<Item = &str> {
    let mut quoted = false;
    params
        .split(move |c: char| {
            if c == '"' {
                quoted = !quoted;
            }
            c == ',' && !quoted
        })
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{parse, AuthError, WwwAuthenticate};

    #[test]
    fn test_success() {
        let s = concat!(
            r#"Bearer realm="slurm",error="invalid_token","#,
            r#"error_description="token expired, renew it""#,
        );
        let expected = WwwAuthenticate {
            scheme: "Bearer".to_owned(),
            realm: Some("slurm".to_owned()),
            error: Some(AuthError::InvalidToken),
            error_description: Some("token expired, renew it".to_owned()),
        };
        assert_eq!(Some(expected), parse(s));
    }

    #[test]
    fn test_any_order_and_missing_fields() {
        let parsed = parse(r#"Basic error="insufficient_scope", realm="proxy""#).unwrap();
        assert_eq!(parsed.scheme, "Basic");
        assert_eq!(parsed.realm.as_deref(), Some("proxy"));
        assert_eq!(parsed.error, Some(AuthError::InsufficientScope));
        assert_eq!(parsed.error_description, None);

        assert_eq!(parse("Negotiate").unwrap().scheme, "Negotiate");
    }

    #[test]
    fn test_fail() {
        assert!(parse("").is_none());
        assert!(parse("realm=x").is_none());
        assert!(parse("Bearer realm").is_none());
    }
}
