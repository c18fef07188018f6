//! Template formatter
//!
//! Resolves `{dotted.path}` placeholders against the memory store. The store is
//! viewed as a tagged value tree (`serde_json::Value`); a path that walks into a
//! non-mapping or a missing key leaves the placeholder text untouched.
//! Replacement is a single pass, so resolved values containing braces are
//! never re-expanded.

use regex::{Captures, Regex};
use serde_json::Value;

use crate::errors::{AvaError, Result};
use crate::memory::store::MemoryStore;

/// Shown for `{name}` before a name is known
pub const DEFAULT_NAME: &str = "friend";
/// Shown for `{mood}` before a mood is detected
pub const DEFAULT_MOOD: &str = "okay";

/// Placeholder formatter with a precompiled pattern
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    placeholder: Regex,
}

impl TemplateFormatter {
    pub fn new() -> Result<Self> {
        let placeholder = Regex::new(r"\{([^{}]*)\}")
            .map_err(|e| AvaError::Resolution(format!("placeholder pattern: {}", e)))?;
        Ok(Self { placeholder })
    }

    /// Format `template` against `store`
    pub fn format(&self, template: &str, store: &MemoryStore) -> Result<String> {
        if template.is_empty() || !self.placeholder.is_match(template) {
            return Ok(template.to_string());
        }

        let root = store.to_value()?;
        let rendered = self.placeholder.replace_all(template, |caps: &Captures| {
            let path = caps[1].trim();
            resolve(&root, path).unwrap_or_else(|| caps[0].to_string())
        });
        Ok(rendered.into_owned())
    }
}

/// Resolve one placeholder body
fn resolve(root: &Value, path: &str) -> Option<String> {
    match path {
        "name" => Some(non_empty(root.get("name")).unwrap_or_else(|| DEFAULT_NAME.to_string())),
        "mood" => Some(non_empty(root.get("mood")).unwrap_or_else(|| DEFAULT_MOOD.to_string())),
        _ => walk(root, path).and_then(render),
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value.and_then(render).filter(|s| !s.is_empty())
}

/// Walk a dotted path through nested mappings
fn walk<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |current, key| match current {
        Value::Object(map) => map.get(key),
        _ => None,
    })
}

/// Human-readable text for a resolved value
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(render)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
