use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One company extracted from one scraped file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub source_file: String,
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
    pub raw_model_output: String,
}

impl ExtractionRecord {
    pub fn new(
        source_file: impl Into<String>,
        company_name: Option<String>,
        job_titles: Vec<String>,
        raw_model_output: impl Into<String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            company_name,
            job_titles,
            raw_model_output: raw_model_output.into(),
        }
    }

    /// A record carrying no company, used when the reply could not be read.
    pub fn unattributed(source_file: impl Into<String>, raw_model_output: impl Into<String>) -> Self {
        Self::new(source_file, None, Vec::new(), raw_model_output)
    }

    /// The trimmed company name, or `None` when absent or blank.
    pub fn attributed_company(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Result of interpreting one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Parsed(Vec<ExtractionRecord>),
    Unparsed(String),
}

impl Extraction {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Extraction::Parsed(_))
    }

    pub fn into_records(self, source_file: &str) -> Vec<ExtractionRecord> {
        match self {
            Extraction::Parsed(records) => records,
            Extraction::Unparsed(raw) => vec![ExtractionRecord::unattributed(source_file, raw)],
        }
    }
}

/// How a company record that lists no job titles is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum UntitledListings {
    /// One unnamed listing.
    #[default]
    #[serde(alias = "count_one")]
    One,
    /// No listing at all.
    #[serde(alias = "count_zero")]
    Zero,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntry {
    pub job_count: u64,
    pub job_titles: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub companies: BTreeMap<String, CompanyEntry>,
    pub total_companies: u64,
    pub total_job_listings: u64,
    #[serde(default)]
    pub unattributed_records: u64,
}

/// A company with its name attached, as listed in rankings and CSV exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCompany<'a> {
    pub name: &'a str,
    pub job_count: u64,
    pub job_titles: &'a BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisBatch {
    pub records: Vec<ExtractionRecord>,
    pub files_analyzed: usize,
    pub files_unparsed: usize,
    pub files_failed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub detail_path: String,
    pub aggregate_path: String,
    pub report: AggregateReport,
    pub files_analyzed: usize,
    pub files_failed: usize,
}

/// A successfully scraped page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub markdown: String,
    pub title: Option<String>,
    pub raw_response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub url: String,
    pub markdown_file: String,
    pub raw_file: String,
}

#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub succeeded: Vec<SavedPage>,
    pub failed: Vec<(String, String)>,
}

impl FetchSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
