use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Normalizes one stream item into plain text.
///
/// A `content` string field wins, a bare string is returned as is, and
/// anything else is rendered as JSON. Items that cannot be serialized fall
/// back to their `Debug` form.
pub fn extract_text<T>(item: &T) -> String
where
    T: Serialize + Debug + ?Sized,
{
    let value = match serde_json::to_value(item) {
        Ok(value) => value,
        Err(_) => return format!("{item:?}"),
    };

    match value {
        Value::String(text) => text,
        Value::Object(ref map) => match map.get("content") {
            Some(Value::String(content)) => content.clone(),
            _ => render_json(&value, item),
        },
        other => render_json(&other, item),
    }
}

fn render_json<T: Debug + ?Sized>(value: &Value, item: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{item:?}"))
}
