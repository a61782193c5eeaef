//! Decoding of terraform's structured and free-text output.

use crate::error::{Error, Result};
use crate::types::{OutputEntry, Outputs, VarValue};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("version pattern is valid"));

/// Decode `terraform output -json` into bare values.
///
/// Sensitivity and type metadata are dropped. Terraform prints `{}` when
/// the state has no outputs, so empty input is a decode error.
pub fn parse_outputs(json: &[u8]) -> Result<Outputs> {
    let entries: BTreeMap<String, OutputEntry> =
        serde_json::from_slice(json).map_err(|e| Error::Decode {
            what: "terraform outputs",
            message: e.to_string(),
        })?;

    Ok(entries
        .into_iter()
        .map(|(name, entry)| (name, VarValue::from(entry.value)))
        .collect())
}

/// Extract the first `x.y.z` version from `terraform version` output.
pub fn parse_version(text: &str) -> Result<String> {
    VERSION_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .ok_or(Error::VersionNotFound)
}

/// Strip the single trailing newline terraform appends to `output <name>`.
pub fn trim_output(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}
