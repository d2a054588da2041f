//! Response classification.
//!
//! [`classify`] is a pure function of a [`RawResponse`]'s status, content type
//! and body. It decides whether the body should go to the model decoder, whether
//! the call succeeded without payload, or whether the service reported an
//! error. Interpreting *which* error it was (e.g. "classifier not found" versus
//! "nothing to delete") is left to the caller.

use crate::decode::{json_type_name, DecodeError, Node};
use crate::transport::RawResponse;
use crate::{Error, ServiceError};
use bytes::Bytes;
use serde_json::Value;

pub const UNRECOGNIZED_ERROR_BODY: &str = "unrecognized error body";

#[derive(Debug)]
pub enum Outcome {
    /// 2xx with a JSON body.
    Success(Bytes),
    /// 2xx with an empty body.
    SuccessEmpty,
    /// The service reported an error (or answered with a non-2xx status).
    RemoteError(ServiceError),
    /// 2xx whose body cannot be a model payload.
    DecodeError(DecodeError),
}

/// Structured error document: `{code, error, description}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteErrorBody {
    pub code: Option<i32>,
    pub message: String,
    pub description: Option<String>,
}

impl RemoteErrorBody {
    /// Parse the remote error convention; `None` when the body does not follow it.
    ///
    /// The message is taken from `error`, falling back to `error_message`,
    /// `statusInfo` (AlchemyAPI) and `message`.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let node = Node::root(&value);
        node.as_object().ok()?;

        let message = ["error", "error_message", "statusInfo", "message"]
            .iter()
            .find_map(|key| node.opt_str(key).ok().flatten())?;
        let code = node
            .field("code")
            .ok()
            .flatten()
            .and_then(|n| n.as_u64().ok())
            .and_then(|c| i32::try_from(c).ok())
            .filter(|c| (100..=599).contains(c));
        let description = node.opt_str("description").ok().flatten();

        Some(Self {
            code,
            message,
            description,
        })
    }
}

pub fn classify(response: RawResponse) -> Outcome {
    let status = response.status;

    if (200..=299).contains(&status) {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Outcome::SuccessEmpty;
        }
        if let Some(content_type) = response.content_type() {
            if !is_json_content_type(content_type) {
                return Outcome::DecodeError(DecodeError::new(
                    "$",
                    "application/json body",
                    content_type.to_string(),
                ));
            }
        }
        return match serde_json::from_slice::<Value>(&response.body) {
            Ok(value) if value.is_object() => Outcome::Success(response.body),
            Ok(value) => {
                Outcome::DecodeError(DecodeError::new("$", "object", json_type_name(&value)))
            }
            Err(e) => Outcome::DecodeError(DecodeError::new("$", "JSON document", e.to_string())),
        };
    }

    let remote = if (400..=599).contains(&status) {
        match RemoteErrorBody::parse(&response.body) {
            Some(body) => Error::Remote {
                status,
                code: body.code.unwrap_or(status as i32),
                message: body.message,
                description: body.description,
            },
            None => Error::Remote {
                status,
                code: status as i32,
                message: UNRECOGNIZED_ERROR_BODY.to_string(),
                description: None,
            },
        }
    } else {
        Error::Remote {
            status,
            code: status as i32,
            message: format!("unexpected HTTP status {}", status),
            description: None,
        }
    };
    Outcome::RemoteError(remote.into())
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json") || essence == "text/json"
}
