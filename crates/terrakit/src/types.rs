//! Value types shared by variable staging and output decoding.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A terraform input or output value.
///
/// Only strings and lists of strings get special rendering in tfvars files.
/// Everything else (numbers, booleans, maps) is carried as already-rendered
/// text and written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    /// Quoted string scalar
    String(String),
    /// List of strings, rendered as `["a","b"]`
    List(Vec<String>),
    /// Pre-rendered literal, written as-is
    Raw(String),
}

impl VarValue {
    /// Wrap anything printable as a raw literal.
    pub fn raw(value: impl fmt::Display) -> Self {
        VarValue::Raw(value.to_string())
    }

    /// Convert back to a JSON value.
    ///
    /// Raw literals that parse as JSON come back structured; anything else
    /// becomes a JSON string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            VarValue::String(s) => serde_json::Value::String(s.clone()),
            VarValue::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|i| serde_json::Value::String(i.clone()))
                    .collect(),
            ),
            VarValue::Raw(text) => serde_json::from_str(text)
                .unwrap_or_else(|_| serde_json::Value::String(text.clone())),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::String(s) | VarValue::Raw(s) => write!(f, "{s}"),
            VarValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        VarValue::String(value)
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::String(value.to_string())
    }
}

impl From<Vec<String>> for VarValue {
    fn from(value: Vec<String>) -> Self {
        VarValue::List(value)
    }
}

impl From<Vec<&str>> for VarValue {
    fn from(value: Vec<&str>) -> Self {
        VarValue::List(value.into_iter().map(String::from).collect())
    }
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        VarValue::raw(value)
    }
}

impl From<serde_json::Value> for VarValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => VarValue::String(s),
            serde_json::Value::Array(items)
                if items.iter().all(serde_json::Value::is_string) =>
            {
                VarValue::List(
                    items
                        .into_iter()
                        .filter_map(|i| match i {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => VarValue::Raw(other.to_string()),
        }
    }
}

/// Named input values written to the generated tfvars file.
///
/// Sorted so the generated file is byte-identical across runs.
pub type Variables = BTreeMap<String, VarValue>;

/// Credentials passed to apply/destroy as `-var name=value` flags.
pub type Credentials = BTreeMap<String, String>;

/// Decoded output values keyed by output name.
pub type Outputs = BTreeMap<String, VarValue>;

/// One entry of `terraform output -json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputEntry {
    /// Whether terraform marked the output sensitive
    #[serde(default)]
    pub sensitive: bool,

    /// Declared type; a string or a nested type expression
    #[serde(rename = "type", default)]
    pub value_type: serde_json::Value,

    /// The output value
    #[serde(default)]
    pub value: serde_json::Value,
}
