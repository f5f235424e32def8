use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const SCHEMES: [&str; 4] = ["redis://", "rediss://", "redis+unix://", "unix://"];

/// Address of a store instance, as a `redis://` style URL.
///
/// - The raw string is kept verbatim and handed to the client library.
/// - Only the scheme and a non-empty remainder are validated here.
/// - `Display` masks credentials so the value can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(s: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(s.into())
    }

    /// Raw URL, credentials included.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL with the password (if any) replaced by `***`.
    pub fn redacted(&self) -> String {
        let Some(scheme_end) = self.0.find("://").map(|i| i + 3) else {
            return self.0.clone();
        };
        let rest = &self.0[scheme_end..];
        let Some(at) = rest.rfind('@') else {
            return self.0.clone();
        };
        let userinfo = &rest[..at];
        let user = match userinfo.split_once(':') {
            Some((user, _)) => format!("{user}:***"),
            None => userinfo.to_string(),
        };
        format!("{}{}@{}", &self.0[..scheme_end], user, &rest[at + 1..])
    }
}

impl FromStr for Endpoint {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for Endpoint {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        let Some(scheme) = SCHEMES.iter().find(|p| trimmed.starts_with(*p)) else {
            return Err(ModelError::InvalidEndpoint {
                endpoint: s.clone(),
                reason: format!("expected one of {}", SCHEMES.join(", ")),
            });
        };
        if trimmed.len() == scheme.len() {
            return Err(ModelError::InvalidEndpoint {
                endpoint: s.clone(),
                reason: "missing host".into(),
            });
        }
        Ok(Endpoint(trimmed.to_string()))
    }
}

impl From<Endpoint> for String {
    fn from(e: Endpoint) -> Self {
        e.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_schemes() {
        for url in [
            "redis://localhost:6379/0",
            "rediss://cache.internal:6380",
            "unix:///var/run/redis.sock",
            "redis+unix:///tmp/redis.sock",
        ] {
            let parsed = url.parse::<Endpoint>();
            assert!(parsed.is_ok(), "expected {url} to parse, got {parsed:?}");
        }
    }

    #[test]
    fn rejects_bad_input() {
        for url in ["", "localhost:6379", "http://localhost", "redis://", "  "] {
            assert!(
                url.parse::<Endpoint>().is_err(),
                "expected error for endpoint {url:?}"
            );
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let e = Endpoint::new("  redis://h:1  ").unwrap();
        assert_eq!(e.as_str(), "redis://h:1");
    }

    #[test]
    fn display_hides_password() {
        let e = Endpoint::new("redis://admin:s3cret@db:6379/2").unwrap();
        assert_eq!(e.to_string(), "redis://admin:***@db:6379/2");
        assert_eq!(e.as_str(), "redis://admin:s3cret@db:6379/2");

        let anon = Endpoint::new("redis://:pw@db").unwrap();
        assert_eq!(anon.to_string(), "redis://:***@db");

        let plain = Endpoint::new("redis://db:6379").unwrap();
        assert_eq!(plain.to_string(), "redis://db:6379");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: Endpoint = serde_json::from_str(r#""redis://a:1""#).unwrap();
        assert_eq!(ok.as_str(), "redis://a:1");

        assert!(serde_json::from_str::<Endpoint>(r#""nope""#).is_err());
    }
}
