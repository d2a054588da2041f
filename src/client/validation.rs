//! 参数校验：在发送前快速失败。
//!
//! Parameter validation (fail fast, before any network I/O).

use crate::{Error, ErrorContext, Result};
use url::Url;

/// Require a non-blank string parameter.
pub(crate) fn require_non_blank<'a>(field: &str, value: &'a str, source: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::validation_with_context(
            format!("{} must not be empty", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_source(source),
        ));
    }
    Ok(value)
}

/// Require a non-empty byte payload (training files and the like).
pub(crate) fn require_non_empty_bytes(field: &str, data: &[u8], source: &str) -> Result<()> {
    if data.is_empty() {
        return Err(Error::validation_with_context(
            format!("{} must not be empty", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_source(source),
        ));
    }
    Ok(())
}

/// Require an absolute http(s) URL parameter.
pub(crate) fn require_http_url(field: &str, value: &str, source: &str) -> Result<Url> {
    let value = require_non_blank(field, value, source)?;
    let invalid = |details: String| {
        Error::validation_with_context(
            format!("{} must be an absolute http(s) URL", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(details)
                .with_source(source),
        )
    };
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}
