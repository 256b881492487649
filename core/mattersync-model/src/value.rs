use serde_json::Value;

/// Truthiness as the editor UI understands it.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Arrays and
/// objects are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
