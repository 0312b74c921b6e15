//! Strategy 2: schema.org JSON-LD blocks holding a list of named entities.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::ExtractionOutcome;

static JSONLD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Returns the first JSON-LD block that is, or wraps, a non-empty list of
/// objects that all carry a `name`.
pub(super) fn extract_linked_data_list(html: &str) -> ExtractionOutcome {
    let mut last_parse_error: Option<String> = None;

    for cap in JSONLD_SCRIPT_RE.captures_iter(html) {
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        if raw.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                last_parse_error = Some(e.to_string());
                continue;
            }
        };

        if let Some(entities) = entity_list(value) {
            return ExtractionOutcome::Found(Value::Array(entities));
        }
    }

    last_parse_error.map_or(ExtractionOutcome::NotFound, ExtractionOutcome::ParseError)
}

/// Unwraps a top-level array, an `@graph` container, or an `ItemList`, and
/// keeps the result only when every element is an object with a `name`.
fn entity_list(value: Value) -> Option<Vec<Value>> {
    let candidates = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(Value::Array(graph)) = map.remove("@graph") {
                graph
            } else if let Some(Value::Array(elements)) = map.remove("itemListElement") {
                elements.into_iter().map(unwrap_list_item).collect()
            } else {
                return None;
            }
        }
        _ => return None,
    };

    let qualifies = !candidates.is_empty()
        && candidates
            .iter()
            .all(|c| c.as_object().is_some_and(|o| o.contains_key("name")));

    qualifies.then_some(candidates)
}

/// `ListItem` entries wrap the entity in `item`; plain entities pass through.
fn unwrap_list_item(element: Value) -> Value {
    match element {
        Value::Object(mut map) if map.get("item").is_some_and(Value::is_object) => {
            map.remove("item").unwrap_or(Value::Null)
        }
        other => other,
    }
}
