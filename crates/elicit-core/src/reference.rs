//! Placeholder references between elements
//!
//! A string value may contain `{{ name }}` placeholders naming other
//! elements. Whitespace inside the braces is ignored.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::value::Value;

/// Matches `{{ name }}`; the capture is the trimmed name.
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").unwrap());

/// Keys referenced by `value`, in order of first occurrence.
///
/// Lists reference nothing. Empty placeholders (`{{ }}`) are not references.
pub fn extract_references(value: &Value) -> Vec<String> {
    match value {
        Value::Text(s) => extract_from_str(s),
        Value::List(_) => Vec::new(),
    }
}

pub fn extract_from_str(s: &str) -> Vec<String> {
    let mut references: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_PATTERN.captures_iter(s) {
        let name = caps[1].trim();
        if !name.is_empty() && !references.iter().any(|r| r == name) {
            references.push(name.to_string());
        }
    }
    references
}

/// Replace every placeholder whose name `lookup` knows.
///
/// Uses a single left-to-right pass, so replacement text that itself looks
/// like a placeholder is not expanded again. Unknown placeholders are kept
/// verbatim.
pub fn render<F>(s: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_PATTERN
        .replace_all(s, |caps: &Captures<'_>| {
            lookup(caps[1].trim()).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace every placeholder naming `reference` with `replacement`.
pub fn substitute(s: &str, reference: &str, replacement: &str) -> String {
    render(s, |name| (name == reference).then(|| replacement.to_string()))
}
