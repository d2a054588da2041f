use crate::decode::DecodeError;
use crate::error_code::{ErrorKind, SyntheticCode};
use crate::transport::TransportError;
use std::sync::Arc;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "classifier_id", "base_url")
    pub field_path: Option<String>,
    /// Additional context about the error
    pub details: Option<String>,
    /// Source of the error (e.g., "request_builder", "classifier")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified internal error type.
///
/// Each variant maps to one layer of the request lifecycle; callers of service
/// operations see it folded into a [`ServiceError`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: HTTP {status} (code {code}): {message}")]
    Remote {
        status: u16,
        code: i32,
        message: String,
        description: Option<String>,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::Io(_) => ErrorKind::Validation,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Transport(TransportError::Timeout { .. }) => ErrorKind::Timeout,
            Error::Transport(_) => ErrorKind::Network,
            Error::Remote { .. } => ErrorKind::Remote,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Remote code for service errors, synthetic code for everything local.
    pub fn code(&self) -> i32 {
        match self {
            Error::Remote { code, .. } => *code,
            other => SyntheticCode::for_kind(other.kind())
                .map(|c| c.code())
                .unwrap_or_default(),
        }
    }
}

/// The error delivered to callers of every service operation.
///
/// `code` is the remote code for [`ErrorKind::Remote`] and a value from
/// [`SYNTHETIC_RANGE`](crate::error_code::SYNTHETIC_RANGE) otherwise.
#[derive(Debug, Clone, Error)]
#[error("{kind} error {code}: {message}")]
pub struct ServiceError {
    pub code: i32,
    pub message: String,
    pub kind: ErrorKind,
    #[source]
    pub cause: Option<Arc<Error>>,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            kind,
            cause: None,
        }
    }

    /// Request task finished without resolving its completion.
    pub fn abandoned() -> Self {
        Self::new(
            ErrorKind::Abandoned,
            SyntheticCode::Abandoned.code(),
            "request ended without an outcome",
        )
    }

    pub fn is_synthetic(&self) -> bool {
        SyntheticCode::is_synthetic(self.code)
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    /// HTTP status of the response that carried a remote error.
    pub fn http_status(&self) -> Option<u16> {
        match self.cause.as_deref() {
            Some(Error::Remote { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            code: err.code(),
            message,
            kind: err.kind(),
            cause: Some(Arc::new(err)),
        }
    }
}
