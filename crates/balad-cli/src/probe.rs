use balad_core::AppConfig;
use balad_scraper::ListingClient;

/// GETs the configured base URL and prints what came back.
pub(crate) async fn run_probe(config: &AppConfig) -> anyhow::Result<()> {
    let client = ListingClient::from_config(config, "")?;
    let report = client.probe().await?;

    println!("{} -> HTTP {}", report.url, report.status);
    match report.title {
        Some(title) => println!("title: {title}"),
        None => println!("title: (none)"),
    }
    if !(200..300).contains(&report.status) {
        anyhow::bail!("{} answered with HTTP {}", report.url, report.status);
    }
    Ok(())
}
