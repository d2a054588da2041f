//! 传输层：异步执行 HTTP 交换并施加单一超时。
//!
//! Transport invoker.
//!
//! A [`Transport`] performs one HTTP exchange. [`send`] wraps it with the
//! caller's timeout: when the timeout fires the in-flight exchange future is
//! dropped, which releases its connection, and the call resolves to
//! [`TransportError::Timeout`]. A response arriving later has nowhere to go.

pub mod http;

pub use http::HttpTransport;

use crate::request::OutboundRequest;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Raw HTTP response, consumed once by the response classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lower-case.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// One HTTP exchange, without timeout handling.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Execute `request` on `transport`, resolving to a timeout error once
/// `timeout` elapses.
pub async fn send(
    transport: &dyn Transport,
    request: OutboundRequest,
    timeout: Duration,
) -> Result<RawResponse, TransportError> {
    let request_id = request.request_id.clone();
    let path = request.path();
    let method = request.method.clone();
    let start = Instant::now();

    debug!(
        request_id = request_id.as_str(),
        method = %method,
        path = path.as_str(),
        "watson-sdk sending request"
    );

    match tokio::time::timeout(timeout, transport.execute(request)).await {
        Ok(result) => {
            if let Ok(response) = &result {
                debug!(
                    request_id = request_id.as_str(),
                    http_status = response.status,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "watson-sdk response received"
                );
            }
            result
        }
        Err(_) => {
            warn!(
                request_id = request_id.as_str(),
                path = path.as_str(),
                timeout_ms = timeout.as_millis() as u64,
                "watson-sdk request timed out"
            );
            Err(TransportError::Timeout { after: timeout })
        }
    }
}
