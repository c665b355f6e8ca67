//! HTTP methods as they appear on gateway resources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An HTTP method attached to a resource.
///
/// Routes declare `GET`, `POST`, `PUT` and `DELETE`. `OPTIONS` is added for
/// CORS preflight and `ANY` for proxy resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// Any method (catch-all).
    Any,
}

impl HttpMethod {
    /// Methods a route may declare, in the order they are attached.
    pub const ROUTE_METHODS: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the uppercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Any => "ANY",
        }
    }

    /// Returns `true` if routes may declare this method.
    #[must_use]
    pub fn is_route_method(&self) -> bool {
        Self::ROUTE_METHODS.contains(self)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Parses a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "ANY" => Ok(Self::Any),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = UnknownMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Options => Self::OPTIONS,
            // Uppercase ASCII letters are always a valid method token.
            HttpMethod::Any => Self::from_bytes(b"ANY").expect("ANY is a valid method token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_method_order() {
        assert_eq!(
            HttpMethod::ROUTE_METHODS.map(|m| m.as_str()),
            ["GET", "POST", "PUT", "DELETE"]
        );
        assert!(HttpMethod::Get.is_route_method());
        assert!(!HttpMethod::Any.is_route_method());
        assert!(!HttpMethod::Options.is_route_method());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("patch".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase() {
        assert_eq!(
            serde_json::to_string(&HttpMethod::Options).unwrap(),
            "\"OPTIONS\""
        );
        let parsed: HttpMethod = serde_json::from_str("\"ANY\"").unwrap();
        assert_eq!(parsed, HttpMethod::Any);
    }

    #[test]
    fn test_http_interop() {
        assert_eq!(http::Method::from(HttpMethod::Put), http::Method::PUT);
        assert_eq!(http::Method::from(HttpMethod::Any).as_str(), "ANY");
        assert_eq!(
            HttpMethod::try_from(&http::Method::DELETE).unwrap(),
            HttpMethod::Delete
        );
        assert!(HttpMethod::try_from(&http::Method::PATCH).is_err());
    }

    #[test]
    fn test_any_stays_distinct_from_get() {
        let any = http::Method::from(HttpMethod::Any);
        assert_ne!(any, http::Method::GET);
        assert_eq!(HttpMethod::try_from(&any).unwrap(), HttpMethod::Any);
    }
}
