use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, ErrorKind};

/// A slurmrestd API version such as `v0.0.42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ApiVersion {
    pub const V0_0_40: Self = Self::new(0, 0, 40);
    pub const V0_0_41: Self = Self::new(0, 0, 41);
    pub const V0_0_42: Self = Self::new(0, 0, 42);
    pub const V0_0_43: Self = Self::new(0, 0, 43);
    pub const V0_0_44: Self = Self::new(0, 0, 44);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Accepts `v0.0.42` as well as `0.0.42`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || Error::new(ErrorKind::InvalidRequest, format!("invalid API version {s:?}"));

        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let mut parts = digits.split('.').map(|p| p.parse::<u16>().map_err(|_| invalid()));
        let major = parts.next().ok_or_else(invalid)??;
        let minor = parts.next().ok_or_else(invalid)??;
        let patch = parts.next().ok_or_else(invalid)??;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_and_without_prefix() {
        assert_eq!("v0.0.42".parse::<ApiVersion>().unwrap(), ApiVersion::V0_0_42);
        assert_eq!("0.0.44".parse::<ApiVersion>().unwrap(), ApiVersion::V0_0_44);
        assert_eq!(" V0.0.40 ".parse::<ApiVersion>().unwrap(), ApiVersion::V0_0_40);
    }

    #[test]
    fn parse_rejects_garbage() {
        for s in ["", "v", "v0.0", "v0.0.42.1", "latest", "v0.x.1"] {
            let err = s.parse::<ApiVersion>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{s:?}");
        }
    }

    #[test]
    fn ordering_and_display() {
        assert!(ApiVersion::V0_0_40 < ApiVersion::V0_0_44);
        assert_eq!(ApiVersion::V0_0_43.to_string(), "v0.0.43");
    }
}
