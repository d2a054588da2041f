//! 请求构建：方法、路径、认证头与 JSON / 表单 / multipart 请求体。
//!
//! Outbound request construction.
//!
//! [`RequestBuilder`] turns an operation's typed parameters into a fully
//! specified [`OutboundRequest`]: method, path segments, query, headers
//! (authentication, content type, correlation id) and body. Nothing here
//! touches the network.

use crate::client::config::ServiceConfiguration;
use crate::{Error, ErrorContext, Result};
use bytes::{BufMut, Bytes, BytesMut};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Header carrying the client-generated correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Watson-Client-Request-Id";
pub const LEARNING_OPT_OUT_HEADER: &str = "X-Watson-Learning-Opt-Out";

/// One named part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

impl MultipartPart {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Ordered multipart parts under one boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    parts: Vec<MultipartPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::with_boundary(format!("watson-sdk-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, part: MultipartPart) {
        self.parts.push(part);
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Wire encoding; parts are written in insertion order.
    pub fn encode(&self) -> Bytes {
        let size: usize = self.parts.iter().map(|p| p.data.len() + 256).sum();
        let mut buf = BytesMut::with_capacity(size + self.boundary.len() + 8);
        for part in &self.parts {
            buf.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
            let mut disposition = format!(
                "Content-Disposition: form-data; name=\"{}\"",
                escape_quoted(&part.name)
            );
            if let Some(filename) = &part.filename {
                disposition.push_str(&format!("; filename=\"{}\"", escape_quoted(filename)));
            }
            buf.put_slice(disposition.as_bytes());
            buf.put_slice(format!("\r\nContent-Type: {}\r\n\r\n", part.content_type).as_bytes());
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf.freeze()
    }
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn content_type(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Json(_) => Some(CONTENT_TYPE_JSON.to_string()),
            Self::Form(_) => Some(CONTENT_TYPE_FORM.to_string()),
            Self::Multipart(body) => Some(body.content_type()),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::None => Bytes::new(),
            Self::Json(value) => Bytes::from(value.to_string()),
            Self::Form(pairs) => Bytes::from(
                url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish(),
            ),
            Self::Multipart(body) => body.encode(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A fully specified request, owned by the call that built it.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Unescaped path segments, appended to the base URL by the transport.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
    pub request_id: String,
}

impl OutboundRequest {
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for [`OutboundRequest`].
pub struct RequestBuilder<'a> {
    config: &'a ServiceConfiguration,
    method: Method,
    segments: Vec<String>,
    body: RequestBody,
    error: Option<Error>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ServiceConfiguration, method: Method, segments: &[&str]) -> Self {
        Self {
            config,
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            body: RequestBody::None,
            error: None,
        }
    }

    /// JSON body; serialization failures surface from [`RequestBuilder::build`].
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = RequestBody::Json(value),
            Err(e) => {
                self.error = Some(Error::validation_with_context(
                    format!("request body is not serializable: {}", e),
                    ErrorContext::new().with_source("request_builder"),
                ))
            }
        }
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Append a multipart part, switching the body to multipart if needed.
    pub fn part(mut self, part: MultipartPart) -> Self {
        match &mut self.body {
            RequestBody::Multipart(body) => body.push(part),
            _ => {
                let mut body = MultipartBody::new();
                body.push(part);
                self.body = RequestBody::Multipart(body);
            }
        }
        self
    }

    pub fn build(self) -> Result<OutboundRequest> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let RequestBody::Multipart(body) = &self.body {
            validate_parts(body)?;
        }

        let request_id = Uuid::new_v4().to_string();
        let mut headers = HashMap::new();
        headers.insert("Accept".into(), CONTENT_TYPE_JSON.into());
        headers.insert("User-Agent".into(), self.config.user_agent.clone());
        headers.insert(REQUEST_ID_HEADER.into(), request_id.clone());
        if let Some(auth) = self.config.credentials.authorization() {
            headers.insert("Authorization".into(), auth);
        }
        if let Some(content_type) = self.body.content_type() {
            headers.insert("Content-Type".into(), content_type);
        }
        if self.config.learning_opt_out {
            headers.insert(LEARNING_OPT_OUT_HEADER.into(), "true".into());
        }

        let query = self
            .config
            .credentials
            .query_param()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .into_iter()
            .collect();

        Ok(OutboundRequest {
            method: self.method,
            segments: self.segments,
            query,
            headers,
            body: self.body,
            request_id,
        })
    }
}

fn validate_parts(body: &MultipartBody) -> Result<()> {
    if body.parts().is_empty() {
        return Err(Error::validation_with_context(
            "multipart body has no parts",
            ErrorContext::new().with_source("request_builder"),
        ));
    }
    for part in body.parts() {
        if part.name.trim().is_empty() {
            return Err(Error::validation_with_context(
                "multipart part name must not be empty",
                ErrorContext::new().with_source("request_builder"),
            ));
        }
        if part.data.is_empty() {
            return Err(Error::validation_with_context(
                format!("multipart part '{}' is empty", part.name),
                ErrorContext::new()
                    .with_field_path(part.name.clone())
                    .with_source("request_builder"),
            ));
        }
    }
    Ok(())
}
