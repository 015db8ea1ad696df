//! Lenient decoding of model output.
//!
//! Models wrap JSON in prose, markdown fences or reasoning preambles. We slice from
//! the first opening bracket to the last matching closing bracket and hand that to
//! serde; anything else is a parse error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Slice `[ ... ]` (first `[` to last `]`), if present and well ordered.
pub fn slice_json_array(raw: &str) -> Option<&str> {
    slice_between(raw, '[', ']')
}

/// Slice `{ ... }` (first `{` to last `}`), if present and well ordered.
pub fn slice_json_object(raw: &str) -> Option<&str> {
    slice_between(raw, '{', '}')
}

fn slice_between(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    raw.get(start..=end)
}

pub fn parse_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let s = slice_json_array(raw)
        .ok_or_else(|| Error::Parse("no JSON array in model output".to_string()))?;
    serde_json::from_str(s).map_err(|e| Error::Parse(e.to_string()))
}

pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let s = slice_json_object(raw)
        .ok_or_else(|| Error::Parse("no JSON object in model output".to_string()))?;
    serde_json::from_str(s).map_err(|e| Error::Parse(e.to_string()))
}

/// Non-empty trimmed lines, list markers stripped.
pub fn plain_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(crate::dedupe::strip_list_marker)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
