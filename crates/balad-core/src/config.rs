use std::path::PathBuf;

use crate::app_config::{AppConfig, PageErrorPolicy};
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub(crate) const DEFAULT_ACCEPT_LANGUAGE: &str = "fa-IR,fa;q=0.9,en-US;q=0.8,en;q=0.7";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = or_default("BALAD_BASE_URL", "https://balad.ir")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "BALAD_BASE_URL",
            format!("'{base_url}' is not an http(s) URL"),
        ));
    }

    let category = or_default("BALAD_CATEGORY", "supermarket").trim().to_string();
    if category.is_empty() {
        return Err(invalid("BALAD_CATEGORY", "must be non-empty".to_string()));
    }

    let request_timeout_secs = parse_u64("BALAD_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BALAD_USER_AGENT", DEFAULT_USER_AGENT);
    let accept_language = or_default("BALAD_ACCEPT_LANGUAGE", DEFAULT_ACCEPT_LANGUAGE);
    let inter_request_delay_ms = parse_u64("BALAD_INTER_REQUEST_DELAY_MS", "1500")?;
    if inter_request_delay_ms == 0 {
        return Err(invalid(
            "BALAD_INTER_REQUEST_DELAY_MS",
            "must be at least 1".to_string(),
        ));
    }

    let max_pages = parse_u32("BALAD_MAX_PAGES", "30")?;
    if max_pages == 0 {
        return Err(invalid("BALAD_MAX_PAGES", "must be at least 1".to_string()));
    }

    let on_page_error = or_default("BALAD_ON_PAGE_ERROR", "halt")
        .parse::<PageErrorPolicy>()
        .map_err(|e| invalid("BALAD_ON_PAGE_ERROR", e.to_string()))?;

    let log_level = or_default("BALAD_LOG_LEVEL", "info");
    let cities_path = lookup("BALAD_CITIES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("BALAD_OUTPUT_DIR", "."));

    Ok(AppConfig {
        base_url,
        category,
        request_timeout_secs,
        user_agent,
        accept_language,
        inter_request_delay_ms,
        max_pages,
        on_page_error,
        log_level,
        cities_path,
        output_dir,
    })
}
