//! Single-page diagnostics: shows what every extraction strategy finds.

use balad_core::AppConfig;
use balad_scraper::locate::diagnose;
use balad_scraper::{parse_listing_page, resolve_items, ExtractionOutcome, ListingClient, Strategy};

use crate::city;

pub(crate) async fn run_inspect(
    config: &AppConfig,
    city_arg: Option<&str>,
    page: u32,
) -> anyhow::Result<()> {
    let table = city::load_city_table(config)?;
    let slug = city::resolve_city(
        &table,
        city_arg,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
    )?;
    let client = ListingClient::from_config(config, &slug)?;
    let url = client.page_url(page)?;
    println!("Fetching {url}");
    let html = client.fetch_html(&url).await?;
    println!("Received {} bytes", html.len());

    for attempt in diagnose(&html) {
        let strategy = attempt.strategy.to_string();
        println!("  {strategy:<10} {}", describe(attempt.strategy, &attempt.outcome));
    }

    match parse_listing_page(&html, page) {
        Ok(result) => {
            println!("Listings on page {page}: {}", result.listings.len());
            match result.total_pages {
                Some(total) => println!("Reported page count: {total}"),
                None => println!("Reported page count: unknown"),
            }
            for listing in result.listings.iter().take(3) {
                println!("  - {} | {} | {}", listing.name, listing.phone, listing.address);
            }
        }
        Err(e) => println!("Page unusable: {e}"),
    }
    Ok(())
}

fn describe(strategy: Strategy, outcome: &ExtractionOutcome) -> String {
    match outcome {
        ExtractionOutcome::Found(document) => {
            let records = match strategy {
                Strategy::Hydration => resolve_items(document).len(),
                Strategy::LinkedData => document.as_array().map_or(0, Vec::len),
            };
            format!("found ({records} records)")
        }
        other => other.to_string(),
    }
}
