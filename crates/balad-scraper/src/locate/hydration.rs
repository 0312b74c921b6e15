//! Strategy 1: the framework hydration payload (`__NEXT_DATA__`).

use std::sync::LazyLock;

use regex::Regex;

use super::ExtractionOutcome;

static HYDRATION_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\bid\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

pub(super) fn extract_hydration_data(html: &str) -> ExtractionOutcome {
    let Some(body) = HYDRATION_SCRIPT_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    else {
        return ExtractionOutcome::NotFound;
    };

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) if value.is_object() => ExtractionOutcome::Found(value),
        Ok(_) => ExtractionOutcome::ParseError("hydration payload is not a JSON object".to_string()),
        Err(e) => ExtractionOutcome::ParseError(e.to_string()),
    }
}
