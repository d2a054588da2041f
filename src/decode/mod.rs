//! 模型解码：将 JSON 响应逐字段解码为强类型结果模型。
//!
//! Field-by-field decoding of JSON bodies into result models.
//!
//! Every model attribute is optional at this boundary: a missing key or an
//! explicit `null` decodes to `None`. A key that *is* present but carries the
//! wrong type fails the whole decode with a [`DecodeError`] naming the field
//! path, so a decoded model is either fully trustworthy or not returned at all.
//! Arrays decode element-wise in source order and a single bad element fails
//! the whole collection.

mod node;

pub use node::Node;

use serde_json::Value;

/// A present field whose value could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}`: expected {expected}, found {actual}")]
pub struct DecodeError {
    /// JSON path of the offending value (e.g. `$.concepts[2].relevance`).
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl DecodeError {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Types that can be built from a JSON node.
pub trait Decode: Sized {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError>;
}

/// Parse `bytes` as JSON and decode the document root into `T`.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::new("$", "JSON document", e.to_string()))?;
    T::decode(&Node::root(&value))
}

/// Short JSON type name used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Decode for String {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_string()
    }
}

impl Decode for f64 {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_f64()
    }
}

impl Decode for u64 {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_u64()
    }
}

impl Decode for bool {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_flag()
    }
}

impl Decode for Value {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        Ok(node.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Scored {
        text: Option<String>,
        relevance: Option<f64>,
    }

    impl Decode for Scored {
        fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                text: node.opt_str("text")?,
                relevance: node.opt_f64("relevance")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Doc {
        language: Option<String>,
        items: Option<Vec<Scored>>,
    }

    impl Decode for Doc {
        fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                language: node.opt_str("language")?,
                items: node.opt_list("items")?,
            })
        }
    }

    #[test]
    fn missing_and_null_fields_are_absent() {
        let doc: Doc = decode(br#"{"language": null}"#).unwrap();
        assert_eq!(
            doc,
            Doc {
                language: None,
                items: None
            }
        );
    }

    #[test]
    fn empty_array_is_present_but_empty() {
        let doc: Doc = decode(br#"{"items": []}"#).unwrap();
        assert_eq!(doc.items, Some(vec![]));
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let err = decode::<Doc>(br#"{"language": 7}"#).unwrap_err();
        assert_eq!(err, DecodeError::new("$.language", "string", "number"));
    }

    #[test]
    fn one_bad_element_fails_the_collection() {
        let body = br#"{"items": [
            {"text": "a", "relevance": "0.9"},
            {"text": "b", "relevance": "high"},
            {"text": "c", "relevance": 0.1}
        ]}"#;
        let err = decode::<Doc>(body).unwrap_err();
        assert_eq!(err.field, "$.items[1].relevance");
        assert_eq!(err.expected, "number");
    }

    #[test]
    fn array_order_is_preserved() {
        let body = br#"{"items": [{"text": "z"}, {"text": "a"}, {"text": "m"}]}"#;
        let doc: Doc = decode(body).unwrap();
        let texts: Vec<_> = doc
            .items
            .unwrap()
            .into_iter()
            .map(|s| s.text.unwrap())
            .collect();
        assert_eq!(texts, vec!["z", "a", "m"]);
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let err = decode::<Doc>(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.field, "$");
        assert_eq!(err.expected, "JSON document");
    }

    #[test]
    fn root_must_be_an_object() {
        let err = decode::<Doc>(b"[1, 2]").unwrap_err();
        assert_eq!(err, DecodeError::new("$", "object", "array"));
    }

    #[test]
    fn decoding_twice_is_idempotent() {
        let body = br#"{"language": "en", "items": [{"text": "x", "relevance": 0.5}]}"#;
        assert_eq!(decode::<Doc>(body).unwrap(), decode::<Doc>(body).unwrap());
    }
}
