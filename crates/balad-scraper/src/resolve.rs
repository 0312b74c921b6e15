//! Item path resolver: finds the listing array inside a hydration document.

use serde_json::Value;

/// Key paths tried in order. The first one that ends in a non-empty array wins.
const ITEM_PATHS: &[&[&str]] = &[
    &["props", "pageProps", "data", "items"],
    &["items"],
    &["data", "items"],
    &["result", "items"],
];

/// Walks `path` through nested objects. Stops at the first missing key or
/// non-object value.
fn walk<'a>(document: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, key| current.as_object()?.get(*key))
}

/// Returns the raw listing records of a hydration document.
///
/// An empty result means "no listings or unrecognized page shape", never a
/// transport failure.
#[must_use]
pub fn resolve_items(document: &Value) -> Vec<Value> {
    ITEM_PATHS
        .iter()
        .find_map(|path| {
            walk(document, path)
                .and_then(Value::as_array)
                .filter(|items| !items.is_empty())
        })
        .cloned()
        .unwrap_or_default()
}

/// Reads the upstream `pageCount` that sits beside the winning `items` array.
///
/// Only positive integer counts are returned.
#[must_use]
pub fn page_count_hint(document: &Value) -> Option<u32> {
    ITEM_PATHS.iter().find_map(|path| {
        let parent = &path[..path.len() - 1];
        let items = walk(document, path)?.as_array()?;
        if items.is_empty() {
            return None;
        }
        walk(document, parent)?
            .get("pageCount")?
            .as_u64()
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
    })
}
