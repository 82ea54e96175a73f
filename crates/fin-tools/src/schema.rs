//! JSON Schema builders for tool input schemas

use serde_json::{Value, json};

/// Create a JSON Schema object type
///
/// # Example
///
/// ```
/// use fin_tools::schema::{array, number, object, string};
///
/// let schema = object(
///     serde_json::json!({
///         "series": array(number(None), Some("Values ordered oldest to newest")),
///         "label": string(Some("Optional label")),
///     }),
///     &["series"],
/// );
/// assert_eq!(schema["required"][0], "series");
/// ```
pub fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn typed(type_name: &str, description: Option<&str>) -> Value {
    match description {
        Some(d) => json!({ "type": type_name, "description": d }),
        None => json!({ "type": type_name }),
    }
}

/// Create a JSON Schema string type
pub fn string(description: Option<&str>) -> Value {
    typed("string", description)
}

/// Create a JSON Schema string type restricted to `values`
pub fn string_enum(values: &[&str], description: Option<&str>) -> Value {
    let mut schema = string(description);
    schema["enum"] = json!(values);
    schema
}

/// Create a JSON Schema number type
pub fn number(description: Option<&str>) -> Value {
    typed("number", description)
}

/// Create a JSON Schema integer type
pub fn integer(description: Option<&str>) -> Value {
    typed("integer", description)
}

/// Create a JSON Schema array type
pub fn array(items: Value, description: Option<&str>) -> Value {
    let mut schema = typed("array", description);
    schema["items"] = items;
    schema
}

/// Attach a default value to a schema
pub fn with_default(mut schema: Value, default: Value) -> Value {
    schema["default"] = default;
    schema
}
