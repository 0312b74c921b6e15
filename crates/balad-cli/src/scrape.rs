//! The default command: collect every page for one city, then save.

use std::io::Write;
use std::path::Path;

use balad_core::{AppConfig, CanonicalListing, CollectionStats};
use balad_scraper::{aggregate, dedup_listings, ListingClient, RunEnd, RunOptions};
use tokio::sync::watch;

use crate::{city, export, ScrapeArgs};

const SAMPLE_SIZE: usize = 5;

pub(crate) async fn run_scrape(mut config: AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    args.apply_to(&mut config);
    let table = city::load_city_table(&config)?;
    let slug = city::resolve_city(
        &table,
        args.city.as_deref(),
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
    )?;

    let client = ListingClient::from_config(&config, &slug)?;
    let (stop, stop_rx) = watch::channel(false);
    spawn_interrupt_listener(stop);

    println!(
        "Collecting {} listings for {slug} (up to {} pages, Ctrl-C to stop)...",
        config.category, config.max_pages
    );
    let report = aggregate(&client, &RunOptions::from_config(&config), stop_rx).await;
    let interrupted = report.was_interrupted();
    println!(
        "Run ended after {} pages: {}",
        report.pages_fetched, report.end
    );
    if !report.failed_pages.is_empty() {
        println!("Failed pages: {:?}", report.failed_pages);
    }

    let listings = if args.no_dedup {
        report.listings
    } else {
        dedup_listings(&report.listings)
    };

    if listings.is_empty() {
        if matches!(report.end, RunEnd::PageFailed { .. }) {
            anyhow::bail!("no listings collected: {}", report.end);
        }
        println!("No listings collected; nothing to save.");
        return Ok(());
    }

    print_summary(&mut std::io::stdout(), &listings)?;

    if interrupted {
        let answer = city::prompt(
            &mut std::io::stdin().lock(),
            &mut std::io::stdout(),
            "Save extracted data? (y/n): ",
        )?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Discarded {} listings.", listings.len());
            return Ok(());
        }
    }

    let json_path = args.output.clone().unwrap_or_else(|| {
        config.output_dir.join(export::default_file_name(
            &config.category,
            &slug,
            chrono::Local::now(),
        ))
    });
    save(&json_path, &listings, args.csv)
}

fn save(json_path: &Path, listings: &[CanonicalListing], with_csv: bool) -> anyhow::Result<()> {
    export::save_json(json_path, listings)?;
    println!("Saved {} listings to {}", listings.len(), json_path.display());
    if with_csv {
        let csv_path = json_path.with_extension("csv");
        export::save_csv(&csv_path, listings)?;
        println!("Saved CSV to {}", csv_path.display());
    }
    Ok(())
}

/// First Ctrl-C stops the run and keeps what was collected; a second one
/// exits immediately.
fn spawn_interrupt_listener(stop: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("interrupt received; stopping the run (Ctrl-C again to quit)");
        stop.send_replace(true);

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt received; exiting without saving");
            std::process::exit(130);
        }
    });
}

fn print_summary<W: Write>(out: &mut W, listings: &[CanonicalListing]) -> std::io::Result<()> {
    let stats = CollectionStats::from_listings(listings);
    let share = |count: usize| count * 100 / stats.total.max(1);

    writeln!(out, "Total listings: {}", stats.total)?;
    writeln!(out, "  with phone:    {} ({}%)", stats.with_phone, share(stats.with_phone))?;
    writeln!(out, "  with location: {} ({}%)", stats.with_location, share(stats.with_location))?;
    writeln!(out, "  with address:  {} ({}%)", stats.with_address, share(stats.with_address))?;

    writeln!(out, "Sample listings:")?;
    for (i, listing) in listings.iter().take(SAMPLE_SIZE).enumerate() {
        writeln!(out, "  {}. {}", i + 1, listing.name)?;
        if !listing.phone.is_empty() {
            writeln!(out, "     phone: {}", listing.phone)?;
        }
        if !listing.address.is_empty() {
            writeln!(out, "     address: {}", listing.address)?;
        }
        if let Some(point) = listing.location {
            writeln!(out, "     location: {}, {}", point.lat, point.lon)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use balad_core::GeoPoint;

    use super::*;

    #[test]
    fn summary_reports_coverage_and_limits_samples() {
        let mut listings: Vec<CanonicalListing> = (0..7)
            .map(|i| CanonicalListing::named(format!("Shop {i}")))
            .collect();
        listings[0].phone = "021".to_string();
        listings[0].location = GeoPoint::new(35.7, 51.4);
        listings[1].address = "Valiasr".to_string();

        let mut out = Vec::new();
        print_summary(&mut out, &listings).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total listings: 7"));
        assert!(text.contains("with phone:    1 (14%)"));
        assert!(text.contains("location: 35.7, 51.4"));
        assert!(text.contains("  5. Shop 4"));
        assert!(!text.contains("Shop 5"));
    }

    #[test]
    fn csv_lands_next_to_json() {
        let dir = std::env::temp_dir().join(format!("balad-scrape-{}", std::process::id()));
        let json_path = dir.join("supermarkets_tehran.json");
        save(&json_path, &[CanonicalListing::named("A")], true).unwrap();
        assert!(json_path.exists());
        assert!(dir.join("supermarkets_tehran.csv").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
