use clap::Parser;
use sdr_harvest::config::args::ScrapeArgs;
use sdr_harvest::config::toml_config::HarvestConfig;
use sdr_harvest::utils::error::exit_with;
use sdr_harvest::utils::{logger, validation::Validate};
use sdr_harvest::{Fetcher, FirecrawlClient, LocalStorage};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = ScrapeArgs::parse();

    logger::init_cli_logger(args.log.verbose, args.log.log_json);
    tracing::info!("🚀 Starting scraper");

    let file_config =
        HarvestConfig::load_optional(args.config.as_deref()).unwrap_or_else(|e| exit_with(&e));
    let settings = args
        .resolve(&file_config)
        .unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }
    tracing::debug!(
        "Scraping {} URLs into {} via {}",
        settings.urls.len(),
        settings.output_dir,
        settings.base_url
    );

    let client = FirecrawlClient::new(settings.api_key.clone(), settings.timeout)
        .unwrap_or_else(|e| exit_with(&e))
        .with_base_url(&settings.base_url);
    let storage = LocalStorage::new(&settings.output_dir);
    let fetcher = Fetcher::new(storage, client).with_delay(settings.delay);

    let summary = fetcher.run(&settings.urls).await;

    println!("\nScraping Summary:");
    println!(
        "Successfully scraped {}/{} URLs into {}",
        summary.succeeded.len(),
        summary.attempted(),
        settings.output_dir
    );

    if !summary.all_succeeded() {
        println!("\nFailed URLs:");
        for (url, reason) in &summary.failed {
            println!("- {} ({})", url, reason);
        }
    }
}
