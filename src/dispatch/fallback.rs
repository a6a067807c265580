//! Generic rendering for unrecognized block types.
//!
//! A block whose type has no dedicated payload is shown as a `**key**: value`
//! listing of its decoded body, one field per line, so future producer types
//! stay readable instead of breaking the message.

use serde_json::Value;

/// Placeholder shown when there is nothing to list.
pub const EMPTY_LISTING: &str = "No content available";

/// Renders a decoded body as a labeled listing.
///
/// Objects list their fields in producer order. Anything else (an empty
/// object, an array, a scalar) yields [`EMPTY_LISTING`].
///
/// # Examples
///
/// ```
/// use blockstream::dispatch::labeled_text;
/// use serde_json::json;
///
/// assert_eq!(labeled_text(&json!({"a": 1})), "**a**: 1");
/// assert_eq!(labeled_text(&json!({"name": "x", "tags": ["p", "q"]})), "**name**: x\n**tags**: p,q");
/// ```
#[must_use]
pub fn labeled_text(value: &Value) -> String {
    match value {
        Value::Object(fields) if !fields.is_empty() => fields
            .iter()
            .map(|(key, value)| format!("**{key}**: {}", display_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => EMPTY_LISTING.to_string(),
    }
}

/// Inline display of a field value.
///
/// Strings are shown bare, arrays as comma-joined elements, and nested
/// objects as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
