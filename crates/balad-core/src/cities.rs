//! Static mapping from operator-entered city names to the URL slug the
//! upstream service expects (`/city-{slug}/...`).
//!
//! Lookup is pure: an unknown name yields [`CityLookup::Unknown`] and the
//! caller decides how to obtain a slug.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Built-in cities: slug followed by accepted aliases (English spellings and
/// the Persian name).
const BUILTIN_CITIES: &[(&str, &[&str])] = &[
    ("tehran", &["تهران"]),
    ("esfahan", &["isfahan", "اصفهان"]),
    ("mashhad", &["مشهد"]),
    ("shiraz", &["شیراز"]),
    ("tabriz", &["تبریز"]),
    ("karaj", &["کرج"]),
    ("qom", &["ghom", "قم"]),
    ("ahvaz", &["ahwaz", "اهواز"]),
    ("kermanshah", &["کرمانشاه"]),
    ("rasht", &["رشت"]),
    ("urmia", &["orumiyeh", "ارومیه"]),
    ("yazd", &["یزد"]),
    ("hamedan", &["hamadan", "همدان"]),
    ("bandar-abbas", &["bandar abbas", "بندرعباس", "بندر عباس"]),
    ("arak", &["اراک"]),
    ("zanjan", &["زنجان"]),
    ("qazvin", &["ghazvin", "قزوین"]),
    ("sanandaj", &["سنندج"]),
    ("sari", &["ساری"]),
    ("gorgan", &["گرگان"]),
];

/// Result of resolving an operator-entered city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityLookup {
    Known(String),
    Unknown,
}

/// One city as declared in a cities YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct CityEntry {
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CitiesFile {
    cities: Vec<CityEntry>,
}

#[derive(Debug, Clone)]
pub struct CityTable {
    by_key: HashMap<String, String>,
    slugs: Vec<String>,
}

impl CityTable {
    /// The table of twenty well-known cities.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self {
            by_key: HashMap::new(),
            slugs: Vec::new(),
        };
        for (slug, aliases) in BUILTIN_CITIES {
            table.insert(slug, aliases.iter().copied());
        }
        table
    }

    /// Adds entries on top of the current table. Later aliases win.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = CityEntry>) {
        for entry in entries {
            self.insert(&entry.slug, entry.aliases.iter().map(String::as_str));
        }
    }

    fn insert<'a>(&mut self, slug: &str, aliases: impl Iterator<Item = &'a str>) {
        if !self.slugs.iter().any(|s| s == slug) {
            self.slugs.push(slug.to_string());
        }
        self.by_key.insert(normalize_key(slug), slug.to_string());
        for alias in aliases {
            self.by_key.insert(normalize_key(alias), slug.to_string());
        }
    }

    #[must_use]
    pub fn lookup(&self, input: &str) -> CityLookup {
        let key = normalize_key(input);
        if key.is_empty() {
            return CityLookup::Unknown;
        }
        self.by_key
            .get(&key)
            .map_or(CityLookup::Unknown, |slug| CityLookup::Known(slug.clone()))
    }

    /// Known slugs in insertion order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }
}

/// Case-folds, trims, unifies Arabic/Persian letter variants, and collapses
/// internal whitespace to `-`.
fn normalize_key(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ي' => 'ی',
            'ك' => 'ک',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Returns `true` for slugs made only of ASCII lower-case letters, digits and
/// `-`, with no leading/trailing `-`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Load and validate extra city entries from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_cities(path: &Path) -> Result<Vec<CityEntry>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CitiesFile = serde_yaml::from_str(&content).map_err(ConfigError::CitiesFileParse)?;
    validate_cities(&file.cities)?;
    Ok(file.cities)
}

fn validate_cities(entries: &[CityEntry]) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for entry in entries {
        if !is_valid_slug(&entry.slug) {
            return Err(ConfigError::Validation(format!(
                "invalid city slug '{}'; use lower-case ASCII letters, digits and '-'",
                entry.slug
            )));
        }
        if !seen_slugs.insert(entry.slug.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate city slug: '{}'",
                entry.slug
            )));
        }
        if entry.aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has an empty alias",
                entry.slug
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "cities_test.rs"]
mod tests;
