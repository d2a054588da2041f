//! Path-tracking cursor over a JSON value.

use super::{json_type_name, Decode, DecodeError};
use serde_json::{Map, Value};

/// A JSON value together with the path it was reached by.
///
/// Accessors either return the typed value or a [`DecodeError`] carrying the
/// path, the expected type and the actual type found.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn mismatch(&self, expected: &str) -> DecodeError {
        DecodeError::new(&self.path, expected, json_type_name(self.value))
    }

    pub fn as_object(&self) -> Result<&'a Map<String, Value>, DecodeError> {
        self.value.as_object().ok_or_else(|| self.mismatch("object"))
    }

    /// Child node for `key`; `None` when the key is missing or `null`.
    pub fn field(&self, key: &str) -> Result<Option<Node<'a>>, DecodeError> {
        let object = self.as_object()?;
        Ok(match object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Node {
                value,
                path: format!("{}.{}", self.path, key),
            }),
        })
    }

    /// First of `keys` that is present and non-null.
    pub fn field_any(&self, keys: &[&str]) -> Result<Option<Node<'a>>, DecodeError> {
        for key in keys {
            if let Some(node) = self.field(key)? {
                return Ok(Some(node));
            }
        }
        Ok(None)
    }

    pub fn as_string(&self) -> Result<String, DecodeError> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch("string"))
    }

    /// JSON number, or a string holding one (`"0.93"`).
    pub fn as_f64(&self) -> Result<f64, DecodeError> {
        match self.value {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.mismatch("number")),
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                DecodeError::new(&self.path, "number", format!("string {:?}", s))
            }),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Non-negative integer, or a string holding one (`"3"`).
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        match self.value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| DecodeError::new(&self.path, "unsigned integer", n.to_string())),
            Value::String(s) => s.trim().parse::<u64>().map_err(|_| {
                DecodeError::new(&self.path, "unsigned integer", format!("string {:?}", s))
            }),
            _ => Err(self.mismatch("unsigned integer")),
        }
    }

    /// Boolean, or one of the textual flags `yes`/`no`, `true`/`false`, `1`/`0`.
    pub fn as_flag(&self) -> Result<bool, DecodeError> {
        let expected = "boolean flag";
        match self.value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(DecodeError::new(&self.path, expected, n.to_string())),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" => Ok(true),
                "no" | "false" | "0" => Ok(false),
                _ => Err(DecodeError::new(&self.path, expected, format!("string {:?}", s))),
            },
            _ => Err(self.mismatch(expected)),
        }
    }

    pub fn decode<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Decode every element of an array, in order; the first failure wins.
    pub fn list<T: Decode>(&self) -> Result<Vec<T>, DecodeError> {
        let items = self.value.as_array().ok_or_else(|| self.mismatch("array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, value)| {
                T::decode(&Node {
                    value,
                    path: format!("{}[{}]", self.path, i),
                })
            })
            .collect()
    }

    pub fn opt<T: Decode>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        self.field(key)?.map(|n| T::decode(&n)).transpose()
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<String>, DecodeError> {
        self.field(key)?.map(|n| n.as_string()).transpose()
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>, DecodeError> {
        self.field(key)?.map(|n| n.as_f64()).transpose()
    }

    pub fn opt_u64(&self, key: &str) -> Result<Option<u64>, DecodeError> {
        self.field(key)?.map(|n| n.as_u64()).transpose()
    }

    pub fn opt_flag(&self, key: &str) -> Result<Option<bool>, DecodeError> {
        self.field(key)?.map(|n| n.as_flag()).transpose()
    }

    pub fn opt_list<T: Decode>(&self, key: &str) -> Result<Option<Vec<T>>, DecodeError> {
        self.field(key)?.map(|n| n.list()).transpose()
    }

    /// Like [`Node::opt_list`] but a missing key is an error.
    pub fn req_list<T: Decode>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        self.opt_list(key)?.ok_or_else(|| self.absent(key))
    }

    fn absent(&self, key: &str) -> DecodeError {
        DecodeError::new(format!("{}.{}", self.path, key), "value", "absent")
    }
}
