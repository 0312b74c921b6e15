//! JSON and CSV output for collected listings.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use balad_core::CanonicalListing;
use chrono::{DateTime, Local};

const CSV_HEADERS: [&str; 9] = [
    "name",
    "phone",
    "address",
    "latitude",
    "longitude",
    "rating",
    "rating_count",
    "website",
    "category",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `{category}s_{slug}_{YYYYMMDD_HHMMSS}.json`
pub(crate) fn default_file_name(category: &str, slug: &str, at: DateTime<Local>) -> String {
    format!("{category}s_{slug}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Pretty-printed UTF-8 JSON array with non-ASCII text written as-is.
pub(crate) fn write_json<W: Write>(mut writer: W, listings: &[CanonicalListing]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, listings)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// CSV with a UTF-8 BOM so spreadsheet tools detect the encoding.
pub(crate) fn write_csv<W: Write>(mut writer: W, listings: &[CanonicalListing]) -> anyhow::Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;
    for listing in listings {
        csv.write_record(csv_row(listing))?;
    }
    csv.flush()?;
    Ok(())
}

fn csv_row(listing: &CanonicalListing) -> [String; 9] {
    let text = |value: Option<&String>| value.cloned().unwrap_or_default();
    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    [
        listing.name.clone(),
        listing.phone.clone(),
        listing.address.clone(),
        number(listing.location.map(|p| p.lat)),
        number(listing.location.map(|p| p.lon)),
        number(listing.rating),
        listing.rating_count.map(|c| c.to_string()).unwrap_or_default(),
        text(listing.website.as_ref()),
        text(listing.category.as_ref()),
    ]
}

pub(crate) fn save_json(path: &Path, listings: &[CanonicalListing]) -> anyhow::Result<()> {
    write_json(create(path)?, listings)
}

pub(crate) fn save_csv(path: &Path, listings: &[CanonicalListing]) -> anyhow::Result<()> {
    write_csv(create(path)?, listings)
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
