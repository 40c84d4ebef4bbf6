use crate::adapters::firecrawl::DEFAULT_FIRECRAWL_URL;
use crate::adapters::openrouter::{DEFAULT_MODEL, DEFAULT_OPENROUTER_URL};
use crate::config::toml_config::HarvestConfig;
use crate::config::{AnalyzeSettings, FetchSettings};
use crate::core::analyzer::{DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_OUTPUT_FILE, DEFAULT_SCRAPE_DIR};
use crate::core::fetcher::{read_url_list, DEFAULT_OUTPUT_DIR, DEFAULT_URL};
use crate::core::UntitledListings;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{require_secret, validate_file_extension};
use clap::{Args, Parser};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "scrape")]
#[command(about = "Scrape web pages through Firecrawl and save them as markdown")]
pub struct ScrapeArgs {
    /// URLs to scrape; defaults to the built-in SDR job search
    pub urls: Vec<String>,

    /// Read additional URLs from a .txt (one per line) or .csv (`url` column) file
    #[arg(long)]
    pub urls_file: Option<String>,

    /// Directory to save the scraped content
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Firecrawl API key
    #[arg(short = 'k', long, env = "FIRECRAWL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Firecrawl API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pause between URLs, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ScrapeArgs {
    pub fn resolve(&self, file: &HarvestConfig) -> Result<FetchSettings> {
        let section = &file.firecrawl;
        let api_key = self.api_key.clone().or_else(|| section.api_key.clone());
        let api_key = require_secret("FIRECRAWL_API_KEY", &api_key)?.to_string();

        let mut urls = self.urls.clone();
        if let Some(path) = &self.urls_file {
            validate_file_extension("urls_file", path, &["txt", "csv"])?;
            let listed = read_url_list(path)?;
            if listed.is_empty() {
                return Err(HarvestError::NoInputError {
                    message: format!("No URLs found in '{}'", path),
                });
            }
            tracing::info!("Found {} URLs in '{}'", listed.len(), path);
            urls.extend(listed);
        } else if urls.is_empty() {
            urls.push(DEFAULT_URL.to_string());
        }

        Ok(FetchSettings {
            urls,
            api_key,
            base_url: self
                .base_url
                .clone()
                .or_else(|| section.base_url.clone())
                .unwrap_or_else(|| DEFAULT_FIRECRAWL_URL.to_string()),
            output_dir: self
                .output_dir
                .clone()
                .or_else(|| section.output_dir.clone())
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            timeout: Duration::from_secs(
                self.timeout_secs
                    .or(section.timeout_seconds)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            delay: Duration::from_millis(self.delay_ms.or(section.delay_ms).unwrap_or(1000)),
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "analyze")]
#[command(about = "Extract hiring companies from scraped job listings with an LLM")]
pub struct AnalyzeArgs {
    /// Directory containing scraped markdown files
    #[arg(short, long)]
    pub dir: Option<String>,

    /// OpenRouter API key
    #[arg(short = 'k', long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output file for per-file analysis results
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: String,

    /// Limit the number of files to analyze (0 for all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Model identifier on OpenRouter
    #[arg(short, long)]
    pub model: Option<String>,

    /// OpenRouter API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pause between files, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Characters of page content sent to the model
    #[arg(long)]
    pub max_content_length: Option<usize>,

    /// How a company listed without job titles is counted
    #[arg(long, value_enum)]
    pub untitled_listings: Option<UntitledListings>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl AnalyzeArgs {
    pub fn resolve(&self, file: &HarvestConfig) -> Result<AnalyzeSettings> {
        let section = &file.openrouter;
        let api_key = self.api_key.clone().or_else(|| section.api_key.clone());
        let api_key = require_secret("OPENROUTER_API_KEY", &api_key)?.to_string();

        Ok(AnalyzeSettings {
            api_key,
            base_url: self
                .base_url
                .clone()
                .or_else(|| section.base_url.clone())
                .unwrap_or_else(|| DEFAULT_OPENROUTER_URL.to_string()),
            model: self
                .model
                .clone()
                .or_else(|| section.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dir: self
                .dir
                .clone()
                .unwrap_or_else(|| DEFAULT_SCRAPE_DIR.to_string()),
            output: self.output.clone(),
            limit: self.limit,
            timeout: Duration::from_secs(
                self.timeout_secs
                    .or(section.timeout_seconds)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            delay: Duration::from_millis(self.delay_ms.or(section.delay_ms).unwrap_or(2000)),
            max_content_length: self
                .max_content_length
                .or(section.max_content_length)
                .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH),
            untitled: self
                .untitled_listings
                .or(file.aggregate.untitled_listings)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "export_csv")]
#[command(about = "Convert an aggregated company report to CSV")]
pub struct ExportArgs {
    /// Aggregated analysis produced by `analyze`
    #[arg(short, long, default_value = "company_analysis_aggregated.json")]
    pub input: String,

    /// CSV file to write
    #[arg(short, long)]
    pub output: Option<String>,

    /// Keep only Sales/Business Development Representative titles
    #[arg(long)]
    pub sdr_only: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ExportArgs {
    pub fn output_path(&self) -> String {
        match (&self.output, self.sdr_only) {
            (Some(path), _) => path.clone(),
            (None, true) => "sdr_companies.csv".to_string(),
            (None, false) => "company_analysis.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_scrape_defaults_to_builtin_url() {
        let args = ScrapeArgs::parse_from(["scrape", "--api-key", "fc-123"]);
        let settings = args.resolve(&HarvestConfig::default()).unwrap();

        assert_eq!(settings.urls, vec![DEFAULT_URL]);
        assert_eq!(settings.output_dir, "scraped_content");
        assert_eq!(settings.delay, Duration::from_secs(1));
        assert_eq!(settings.base_url, DEFAULT_FIRECRAWL_URL);
    }

    #[test]
    fn test_scrape_merges_urls_file() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "https://b.example\nhttps://c.example").unwrap();

        let args = ScrapeArgs::parse_from([
            "scrape",
            "https://a.example",
            "--urls-file",
            file.path().to_str().unwrap(),
            "-k",
            "fc-123",
        ]);
        let settings = args.resolve(&HarvestConfig::default()).unwrap();
        assert_eq!(
            settings.urls,
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn test_scrape_empty_urls_file_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "# nothing here\n\n").unwrap();

        let args = ScrapeArgs::parse_from([
            "scrape",
            "--urls-file",
            file.path().to_str().unwrap(),
            "-k",
            "fc-123",
        ]);
        let err = args.resolve(&HarvestConfig::default()).unwrap_err();
        assert!(matches!(err, HarvestError::NoInputError { .. }));
        assert!(err.to_string().contains("No URLs found"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unresolved_key_placeholder_is_missing() {
        let file = HarvestConfig::from_toml_str(
            r#"
[openrouter]
api_key = "${SDR_HARVEST_TEST_UNSET_KEY}"

[firecrawl]
api_key = "${SDR_HARVEST_TEST_UNSET_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(
            file.openrouter.api_key.as_deref(),
            Some("${SDR_HARVEST_TEST_UNSET_KEY}")
        );

        let analyze = AnalyzeArgs {
            api_key: None,
            ..AnalyzeArgs::parse_from(["analyze"])
        };
        assert!(matches!(
            analyze.resolve(&file),
            Err(HarvestError::MissingConfigError { .. })
        ));

        let scrape = ScrapeArgs {
            api_key: None,
            ..ScrapeArgs::parse_from(["scrape"])
        };
        assert!(matches!(
            scrape.resolve(&file),
            Err(HarvestError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_analyze_flags_override_file() {
        let file = HarvestConfig::from_toml_str(
            r#"
[openrouter]
api_key = "sk-file"
model = "file/model"
delay_ms = 10

[aggregate]
untitled_listings = "zero"
"#,
        )
        .unwrap();

        let args = AnalyzeArgs::parse_from([
            "analyze",
            "--model",
            "cli/model",
            "--limit",
            "3",
            "--dir",
            "pages",
        ]);
        let settings = args.resolve(&file).unwrap();

        assert_eq!(settings.model, "cli/model");
        assert_eq!(settings.delay, Duration::from_millis(10));
        assert_eq!(settings.limit, 3);
        assert_eq!(settings.dir, "pages");
        assert_eq!(settings.output, "company_analysis.json");
        assert_eq!(settings.untitled, UntitledListings::Zero);
        assert_eq!(settings.max_content_length, DEFAULT_MAX_CONTENT_LENGTH);
    }

    #[test]
    fn test_analyze_untitled_flag() {
        let args = AnalyzeArgs::parse_from([
            "analyze",
            "-k",
            "sk-or",
            "--untitled-listings",
            "zero",
        ]);
        assert_eq!(args.untitled_listings, Some(UntitledListings::Zero));
    }

    #[test]
    fn test_analyze_missing_key() {
        let args = AnalyzeArgs {
            api_key: None,
            ..AnalyzeArgs::parse_from(["analyze"])
        };
        assert!(matches!(
            args.resolve(&HarvestConfig::default()),
            Err(HarvestError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_export_output_defaults() {
        let args = ExportArgs::parse_from(["export_csv", "--sdr-only"]);
        assert_eq!(args.output_path(), "sdr_companies.csv");
        let args = ExportArgs::parse_from(["export_csv"]);
        assert_eq!(args.output_path(), "company_analysis.csv");
    }
}
