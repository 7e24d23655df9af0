//! Payload field lookup and `{{fieldPath}}` template interpolation.
//!
//! Action configs may embed placeholders such as `"Order {{orderId}} placed"`
//! which are resolved against the triggering event's payload before the
//! action runs. A placeholder referencing a missing field renders as an
//! empty string; interpolation never fails.

use serde_json::Value;

/// Resolve a dotted field path (e.g. `"order.total"`) inside a JSON value.
///
/// Returns `None` when any segment is missing or a non-object is traversed.
#[must_use]
pub fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = payload;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Render a template, replacing every `{{fieldPath}}` placeholder with the
/// corresponding payload value. Strings render verbatim; other JSON values
/// render in their JSON form; missing fields render as the empty string.
#[must_use]
pub fn render(template: &str, payload: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let path = after[..end].trim();
                if let Some(value) = lookup(payload, path) {
                    match value {
                        Value::String(s) => out.push_str(s),
                        Value::Null => {}
                        other => out.push_str(&other.to_string()),
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder, keep the literal text.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_replace_placeholder_with_string_value() {
        let payload = serde_json::json!({"orderId": "X123"});
        assert_eq!(
            render("Order {{orderId}} placed", &payload),
            "Order X123 placed"
        );
    }

    #[test]
    fn should_replace_missing_field_with_empty_string() {
        let payload = serde_json::json!({});
        assert_eq!(render("Order {{orderId}} placed", &payload), "Order  placed");
    }

    #[test]
    fn should_render_numbers_and_booleans_in_json_form() {
        let payload = serde_json::json!({"amount": 42.5, "paid": false});
        assert_eq!(render("{{amount}}/{{paid}}", &payload), "42.5/false");
    }

    #[test]
    fn should_resolve_dotted_paths_into_nested_objects() {
        let payload = serde_json::json!({"order": {"customer": {"name": "Ada"}}});
        assert_eq!(render("Hi {{order.customer.name}}", &payload), "Hi Ada");
    }

    #[test]
    fn should_render_null_as_empty_string() {
        let payload = serde_json::json!({"note": null});
        assert_eq!(render("[{{note}}]", &payload), "[]");
    }

    #[test]
    fn should_keep_unterminated_placeholder_literal() {
        let payload = serde_json::json!({"a": 1});
        assert_eq!(render("broken {{a", &payload), "broken {{a");
    }

    #[test]
    fn should_handle_multiple_placeholders() {
        let payload = serde_json::json!({"a": "1", "b": "2"});
        assert_eq!(render("{{a}}-{{b}}-{{a}}", &payload), "1-2-1");
    }

    #[test]
    fn should_trim_whitespace_inside_placeholders() {
        let payload = serde_json::json!({"a": "ok"});
        assert_eq!(render("{{ a }}", &payload), "ok");
    }

    #[test]
    fn should_return_none_when_traversing_non_object() {
        let payload = serde_json::json!({"a": "leaf"});
        assert!(lookup(&payload, "a.b").is_none());
    }
}
