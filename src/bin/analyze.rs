use clap::Parser;
use sdr_harvest::config::args::AnalyzeArgs;
use sdr_harvest::config::toml_config::HarvestConfig;
use sdr_harvest::core::AnalysisSummary;
use sdr_harvest::utils::error::exit_with;
use sdr_harvest::utils::{logger, validation::Validate};
use sdr_harvest::{AnalyzeOptions, AnalyzePipeline, EtlEngine, LocalStorage, OpenRouterClient};

const TOP_COMPANIES: usize = 5;
const TITLES_SHOWN: usize = 3;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = AnalyzeArgs::parse();

    logger::init_cli_logger(args.log.verbose, args.log.log_json);
    tracing::info!("🚀 Starting job listing analyzer");

    let file_config =
        HarvestConfig::load_optional(args.config.as_deref()).unwrap_or_else(|e| exit_with(&e));
    // a missing key fails here, before any file is touched
    let settings = args
        .resolve(&file_config)
        .unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    tracing::info!("Reading markdown files from {}", settings.dir);

    let llm = OpenRouterClient::new(settings.api_key.clone(), settings.timeout)
        .unwrap_or_else(|e| exit_with(&e))
        .with_base_url(&settings.base_url)
        .with_model(&settings.model);
    tracing::info!("Using model {}", llm.model());

    let options = AnalyzeOptions {
        limit: settings.limit,
        delay: settings.delay,
        max_content_length: settings.max_content_length,
        untitled: settings.untitled,
        detail_path: settings.output.clone(),
    };
    let pipeline = AnalyzePipeline::new(
        LocalStorage::new(&settings.dir),
        LocalStorage::new(""),
        llm,
        options,
    );
    let engine = EtlEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run().await {
        Ok(summary) => print_summary(&summary),
        Err(e) => exit_with(&e),
    }
}

fn print_summary(summary: &AnalysisSummary) {
    println!("✅ Analysis complete. Results saved to {}", summary.detail_path);
    println!("📁 Aggregated results saved to {}", summary.aggregate_path);
    if summary.files_failed > 0 {
        println!(
            "⚠️  {} of {} files could not be analyzed",
            summary.files_failed,
            summary.files_failed + summary.files_analyzed
        );
    }

    let report = &summary.report;
    println!(
        "Found {} companies with {} job listings",
        report.total_companies, report.total_job_listings
    );

    let ranked = report.ranked();
    if ranked.is_empty() {
        return;
    }
    println!("\nTop Companies:");
    for (i, company) in ranked.iter().take(TOP_COMPANIES).enumerate() {
        println!("{}. {} - {} job(s)", i + 1, company.name, company.job_count);
        let shown: Vec<&str> = company
            .job_titles
            .iter()
            .take(TITLES_SHOWN)
            .map(String::as_str)
            .collect();
        if !shown.is_empty() {
            println!("   Job Titles: {}", shown.join(", "));
        }
        if company.job_titles.len() > TITLES_SHOWN {
            println!("   ... and {} more", company.job_titles.len() - TITLES_SHOWN);
        }
    }
}
