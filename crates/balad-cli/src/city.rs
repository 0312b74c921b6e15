//! Interactive city resolution.

use std::io::{BufRead, Write};

use balad_core::cities::is_valid_slug;
use balad_core::{load_cities, AppConfig, CityLookup, CityTable};

const DEFAULT_CITY: &str = "tehran";

/// Built-in cities plus any entries from `BALAD_CITIES_PATH`.
pub(crate) fn load_city_table(config: &AppConfig) -> anyhow::Result<CityTable> {
    let mut table = CityTable::builtin();
    if let Some(path) = &config.cities_path {
        let extra = load_cities(path)?;
        tracing::debug!(path = %path.display(), entries = extra.len(), "loaded extra cities");
        table.extend(extra);
    }
    Ok(table)
}

/// Turns the operator's city argument into a URL slug, prompting on `input`
/// when the argument is missing or unknown.
///
/// An empty answer to the city prompt selects `tehran`; an empty answer to the
/// slug prompt falls back to the lower-cased city name.
pub(crate) fn resolve_city<R: BufRead, W: Write>(
    table: &CityTable,
    arg: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<String> {
    let name = match arg.map(str::trim).filter(|a| !a.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let answer = prompt(
                input,
                output,
                &format!("City name, English or Persian (default: {DEFAULT_CITY}): "),
            )?;
            if answer.is_empty() {
                DEFAULT_CITY.to_string()
            } else {
                answer
            }
        }
    };

    if let CityLookup::Known(slug) = table.lookup(&name) {
        return Ok(slug);
    }

    let fallback = name.to_lowercase();
    writeln!(output, "City '{name}' is not in the built-in list.")?;
    writeln!(
        output,
        "Available cities: {}",
        table.slugs().collect::<Vec<_>>().join(", ")
    )?;
    let answer = prompt(
        input,
        output,
        &format!("City slug as used in balad.ir URLs (default: {fallback}): "),
    )?;
    let slug = if answer.is_empty() { fallback } else { answer };
    if !is_valid_slug(&slug) {
        tracing::warn!(%slug, "city slug has unusual characters; requests may 404");
    }
    Ok(slug)
}

/// Prints `question` and reads one trimmed line. End of input reads as empty.
pub(crate) fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> anyhow::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
