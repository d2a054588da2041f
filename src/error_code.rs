//! 错误码：本地合成错误码与远端 HTTP 状态分类。
//!
//! Error codes surfaced through [`ServiceError`](crate::ServiceError).
//!
//! Remote failures keep the code the service reported (HTTP-style, e.g. `404`).
//! Failures that never reached the service, or whose answer could not be read,
//! get a synthetic code from a reserved negative range so callers can tell them
//! apart from anything the service itself says.
//!
//! | Range            | Origin                                     |
//! |------------------|--------------------------------------------|
//! | `100..=599`      | Remote service (HTTP status or body code)  |
//! | `-1999..=-1000`  | Client-local (validation, decode, transport) |
//!
//! ## Example
//!
//! ```rust
//! use watson_sdk::error_code::{RemoteErrorClass, SyntheticCode};
//!
//! assert_eq!(SyntheticCode::Timeout.code(), -1004);
//! assert!(SyntheticCode::is_synthetic(-1004));
//! assert!(!SyntheticCode::is_synthetic(404));
//! assert_eq!(RemoteErrorClass::from_http_status(404).name(), "not_found");
//! ```

use std::fmt;
use std::ops::RangeInclusive;

/// Reserved range for client-local error codes.
pub const SYNTHETIC_RANGE: RangeInclusive<i32> = -1999..=-1000;

/// Which layer of the request lifecycle produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller parameters rejected before anything was sent.
    Validation,
    /// Client could not be configured (bad base URL, no runtime, ...).
    Configuration,
    /// No response arrived within the call timeout.
    Timeout,
    /// Connection, DNS or TLS failure.
    Network,
    /// The service answered with an error.
    Remote,
    /// The service answered but the body could not be interpreted.
    Decode,
    /// The request task ended without producing an outcome.
    Abandoned,
}

impl ErrorKind {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Remote => "remote",
            Self::Decode => "decode",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Client-local error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticCode {
    /// -1001: Missing or malformed caller parameters
    Validation,
    /// -1002: Client configuration is unusable
    Configuration,
    /// -1003: Response body could not be decoded into the expected model
    Decode,
    /// -1004: Request exceeded its timeout
    Timeout,
    /// -1005: Network-level failure
    Network,
    /// -1006: Request task ended without an outcome
    Abandoned,
}

impl SyntheticCode {
    #[inline]
    pub fn code(&self) -> i32 {
        match self {
            Self::Validation => -1001,
            Self::Configuration => -1002,
            Self::Decode => -1003,
            Self::Timeout => -1004,
            Self::Network => -1005,
            Self::Abandoned => -1006,
        }
    }

    /// Synthetic code for a local error kind; `None` for [`ErrorKind::Remote`].
    pub fn for_kind(kind: ErrorKind) -> Option<Self> {
        let code = match kind {
            ErrorKind::Validation => Self::Validation,
            ErrorKind::Configuration => Self::Configuration,
            ErrorKind::Decode => Self::Decode,
            ErrorKind::Timeout => Self::Timeout,
            ErrorKind::Network => Self::Network,
            ErrorKind::Abandoned => Self::Abandoned,
            ErrorKind::Remote => return None,
        };
        Some(code)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let code = match code {
            -1001 => Self::Validation,
            -1002 => Self::Configuration,
            -1003 => Self::Decode,
            -1004 => Self::Timeout,
            -1005 => Self::Network,
            -1006 => Self::Abandoned,
            _ => return None,
        };
        Some(code)
    }

    #[inline]
    pub fn is_synthetic(code: i32) -> bool {
        SYNTHETIC_RANGE.contains(&code)
    }
}

impl fmt::Display for SyntheticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Coarse classification of remote failures, used for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorClass {
    InvalidRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    RequestTooLarge,
    UnsupportedMediaType,
    RateLimited,
    ServerError,
    Unavailable,
    Timeout,
    Unknown,
}

impl RemoteErrorClass {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RequestTooLarge => "request_too_large",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            413 => Self::RequestTooLarge,
            415 => Self::UnsupportedMediaType,
            429 => Self::RateLimited,
            500 | 502 => Self::ServerError,
            503 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RemoteErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_codes_stay_in_reserved_range() {
        for kind in [
            ErrorKind::Validation,
            ErrorKind::Configuration,
            ErrorKind::Decode,
            ErrorKind::Timeout,
            ErrorKind::Network,
            ErrorKind::Abandoned,
        ] {
            let code = SyntheticCode::for_kind(kind).unwrap();
            assert!(SyntheticCode::is_synthetic(code.code()), "{kind} -> {code}");
            assert_eq!(SyntheticCode::from_code(code.code()), Some(code));
        }
        assert!(SyntheticCode::for_kind(ErrorKind::Remote).is_none());
    }

    #[test]
    fn http_codes_are_not_synthetic() {
        for status in [200, 400, 404, 415, 500, 599] {
            assert!(!SyntheticCode::is_synthetic(status));
        }
    }

    #[test]
    fn remote_classes_from_status() {
        assert_eq!(RemoteErrorClass::from_http_status(400), RemoteErrorClass::InvalidRequest);
        assert_eq!(RemoteErrorClass::from_http_status(404).name(), "not_found");
        assert_eq!(RemoteErrorClass::from_http_status(503), RemoteErrorClass::Unavailable);
        assert_eq!(RemoteErrorClass::from_http_status(418), RemoteErrorClass::Unknown);
    }
}
