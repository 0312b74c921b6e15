use std::path::Path;

use super::*;

fn entry(slug: &str, aliases: &[&str]) -> CityEntry {
    CityEntry {
        slug: slug.to_string(),
        aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
    }
}

#[test]
fn builtin_has_twenty_cities() {
    assert_eq!(CityTable::builtin().slugs().count(), 20);
}

#[test]
fn lookup_by_slug() {
    let table = CityTable::builtin();
    assert_eq!(table.lookup("shiraz"), CityLookup::Known("shiraz".to_string()));
}

#[test]
fn lookup_is_case_and_whitespace_insensitive() {
    let table = CityTable::builtin();
    assert_eq!(table.lookup("  Tehran "), CityLookup::Known("tehran".to_string()));
    assert_eq!(
        table.lookup("Bandar   Abbas"),
        CityLookup::Known("bandar-abbas".to_string())
    );
}

#[test]
fn lookup_by_alternative_spelling() {
    let table = CityTable::builtin();
    assert_eq!(table.lookup("Isfahan"), CityLookup::Known("esfahan".to_string()));
}

#[test]
fn lookup_by_persian_name() {
    let table = CityTable::builtin();
    assert_eq!(table.lookup("تهران"), CityLookup::Known("tehran".to_string()));
    assert_eq!(table.lookup("بندر عباس"), CityLookup::Known("bandar-abbas".to_string()));
}

#[test]
fn lookup_unifies_arabic_letter_variants() {
    let table = CityTable::builtin();
    // Arabic yeh in place of Persian yeh.
    assert_eq!(table.lookup("شيراز"), CityLookup::Known("shiraz".to_string()));
    // Arabic kaf in place of Persian kaf.
    assert_eq!(table.lookup("كرج"), CityLookup::Known("karaj".to_string()));
}

#[test]
fn lookup_unknown_city() {
    let table = CityTable::builtin();
    assert_eq!(table.lookup("kish"), CityLookup::Unknown);
    assert_eq!(table.lookup("   "), CityLookup::Unknown);
}

#[test]
fn extend_adds_new_city_and_aliases() {
    let mut table = CityTable::builtin();
    table.extend([entry("kish", &["کیش", "kish island"])]);
    assert_eq!(table.lookup("کیش"), CityLookup::Known("kish".to_string()));
    assert_eq!(table.lookup("Kish Island"), CityLookup::Known("kish".to_string()));
    assert_eq!(table.slugs().count(), 21);
}

#[test]
fn extend_with_existing_slug_does_not_duplicate() {
    let mut table = CityTable::builtin();
    table.extend([entry("tehran", &["tehroon"])]);
    assert_eq!(table.lookup("tehroon"), CityLookup::Known("tehran".to_string()));
    assert_eq!(table.slugs().count(), 20);
}

#[test]
fn slug_validation() {
    assert!(is_valid_slug("bandar-abbas"));
    assert!(is_valid_slug("city2"));
    assert!(!is_valid_slug(""));
    assert!(!is_valid_slug("Tehran"));
    assert!(!is_valid_slug("-qom"));
    assert!(!is_valid_slug("تهران"));
}

#[test]
fn validate_rejects_invalid_slug() {
    let result = validate_cities(&[entry("Bad Slug", &[])]);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("Bad Slug")));
}

#[test]
fn validate_rejects_duplicate_slug() {
    let result = validate_cities(&[entry("kish", &[]), entry("kish", &["x"])]);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")));
}

#[test]
fn validate_rejects_empty_alias() {
    let result = validate_cities(&[entry("kish", &[" "])]);
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("empty alias")));
}

#[test]
fn load_cities_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/cities.yaml");
    assert!(
        path.exists(),
        "cities.yaml missing at {path:?}; required for this test"
    );
    let entries = load_cities(&path).expect("failed to load cities.yaml");
    assert!(!entries.is_empty());

    let mut table = CityTable::builtin();
    table.extend(entries);
    assert_eq!(table.lookup("کیش"), CityLookup::Known("kish".to_string()));
}

#[test]
fn load_cities_missing_file_is_io_error() {
    let result = load_cities(Path::new("/definitely/not/here/cities.yaml"));
    assert!(matches!(result, Err(ConfigError::CitiesFileIo { .. })));
}
