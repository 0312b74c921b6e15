//! Normalization from raw upstream records to [`balad_core::CanonicalListing`].
//!
//! Records come in two shapes: hydration items (`telephone`,
//! `geometry.coordinates` as `[lon, lat]`, `rating.{score,count}`) and
//! schema.org entities (`telephone`, `geo.{latitude,longitude}`,
//! `aggregateRating`). Both map onto the same output.

use balad_core::{CanonicalListing, GeoPoint};
use serde_json::{Map, Value};

use crate::error::ScraperError;

/// Normalizes one raw record.
///
/// Returns `Ok(None)` when the record has no usable name; such records are
/// filtered out, not failed.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] when the record is not an object
/// or a field has a type that cannot be read as text.
pub fn normalize_record(record: &Value) -> Result<Option<CanonicalListing>, ScraperError> {
    let Some(obj) = record.as_object() else {
        return Err(malformed("record is not a JSON object"));
    };

    let name = match obj.get("name") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(malformed(format!("name has type {}", type_name(other)))),
    };
    if name.is_empty() {
        return Ok(None);
    }

    let phone = first_non_empty_text(obj, &["telephone", "phone"])?;
    let address = address_text(obj.get("address"))?;
    let location = geometry_location(obj).or_else(|| geo_location(obj));
    let (rating, rating_count) = rating_fields(obj);

    Ok(Some(CanonicalListing {
        name: name.to_string(),
        phone,
        address,
        location,
        rating,
        rating_count,
        website: optional_text(obj.get("website")),
        category: category_text(obj.get("category")),
        token: optional_text(obj.get("token")),
    }))
}

/// Normalizes a page's records, logging and skipping failures so one bad
/// record never drops the batch.
#[must_use]
pub fn normalize_records(records: &[Value]) -> Vec<CanonicalListing> {
    let mut discarded = 0usize;
    let mut failed = 0usize;

    let listings: Vec<CanonicalListing> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(record) {
            Ok(Some(listing)) => Some(listing),
            Ok(None) => {
                discarded += 1;
                None
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping record: normalization failed");
                failed += 1;
                None
            }
        })
        .collect();

    if discarded > 0 || failed > 0 {
        tracing::debug!(
            kept = listings.len(),
            discarded,
            failed,
            "normalized page records"
        );
    }
    listings
}

fn malformed(reason: impl Into<String>) -> ScraperError {
    ScraperError::Normalization {
        reason: reason.into(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads a scalar as trimmed text. `null`/absent read as empty.
fn scalar_text(field: &str, value: Option<&Value>) -> Result<String, ScraperError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(malformed(format!("{field} has type {}", type_name(other)))),
    }
}

fn first_non_empty_text(obj: &Map<String, Value>, keys: &[&str]) -> Result<String, ScraperError> {
    for key in keys {
        let text = scalar_text(key, obj.get(*key))?;
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Ok(String::new())
}

/// Plain string, or a schema.org `PostalAddress` flattened to
/// `street, locality, region`.
fn address_text(value: Option<&Value>) -> Result<String, ScraperError> {
    match value {
        Some(Value::Object(postal)) => Ok(["streetAddress", "addressLocality", "addressRegion"]
            .iter()
            .filter_map(|key| postal.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")),
        other => scalar_text("address", other),
    }
}

/// Number, or a string holding a number. Upstream data has both.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// `geometry.coordinates` is GeoJSON order: `[longitude, latitude]`.
fn geometry_location(obj: &Map<String, Value>) -> Option<GeoPoint> {
    let coords = obj.get("geometry")?.get("coordinates")?.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    let lon = coords[0].as_f64()?;
    let lat = coords[1].as_f64()?;
    GeoPoint::new(lat, lon)
}

/// `geo.latitude` / `geo.longitude`, conventional order.
fn geo_location(obj: &Map<String, Value>) -> Option<GeoPoint> {
    let geo = obj.get("geo")?.as_object()?;
    let lat = coordinate(geo.get("latitude"))?;
    let lon = coordinate(geo.get("longitude"))?;
    GeoPoint::new(lat, lon)
}

fn rating_fields(obj: &Map<String, Value>) -> (Option<f64>, Option<u64>) {
    if let Some(rating) = obj.get("rating") {
        if let Some(score) = rating.as_f64() {
            return (Some(score), None);
        }
        if rating.is_object() {
            return (
                coordinate(rating.get("score")),
                count(rating.get("count")),
            );
        }
    }
    if let Some(aggregate) = obj.get("aggregateRating").filter(|v| v.is_object()) {
        return (
            coordinate(aggregate.get("ratingValue")),
            count(aggregate.get("ratingCount")).or_else(|| count(aggregate.get("reviewCount"))),
        );
    }
    (None, None)
}

fn count(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
}

/// Non-empty text from a string or number; anything else is treated as absent.
fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn category_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(map) => optional_text(map.get("name")),
        other => optional_text(Some(other)),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
