use crate::core::aggregate::aggregate;
use crate::core::naming::aggregated_path;
use crate::core::parser::parse_model_output;
use crate::core::{
    AnalysisBatch, AnalysisSummary, CompletionClient, ExtractionRecord, MarkdownDocument,
    Pipeline, Storage, UntitledListings,
};
use crate::utils::error::{HarvestError, Result};
use std::time::Duration;

pub const DEFAULT_SCRAPE_DIR: &str = "scraped_content/sdr_scrape";
pub const DEFAULT_OUTPUT_FILE: &str = "company_analysis.json";
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 100_000;
pub const TRUNCATION_MARKER: &str = "...[content truncated due to length]";

pub const EXTRACTION_PROMPT: &str = r#"Analyze the following job listing content and extract a list of all companies mentioned.
For each company, provide:
1. Company name
2. Number of job listings for this company (count how many times it appears)
3. Job titles associated with this company

Format your response as a JSON object with the following structure:
{
    "companies": [
        {
            "name": "Company Name",
            "job_count": 3,
            "job_titles": ["Sales Development Representative", "SDR Team Lead", "etc"]
        }
    ],
    "total_companies": 15,
    "total_jobs": 25
}

Only include companies that are hiring for jobs, not companies mentioned in other contexts.
Here's the content:

"#;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Maximum number of files to analyze; 0 means all.
    pub limit: usize,
    pub delay: Duration,
    pub max_content_length: usize,
    pub untitled: UntitledListings,
    pub detail_path: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            limit: 0,
            delay: Duration::from_secs(2),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            untitled: UntitledListings::default(),
            detail_path: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// Cut `content` to at most `max_chars` characters, marking the cut.
pub fn truncate_content(content: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], TRUNCATION_MARKER).into(),
        None => content.into(),
    }
}

pub fn build_prompt(content: &str, max_chars: usize) -> String {
    format!("{}{}", EXTRACTION_PROMPT, truncate_content(content, max_chars))
}

/// Markdown directory -> model -> per-file records -> aggregate report.
pub struct AnalyzePipeline<S: Storage, L: CompletionClient> {
    source: S,
    sink: S,
    llm: L,
    options: AnalyzeOptions,
}

impl<S: Storage, L: CompletionClient> AnalyzePipeline<S, L> {
    pub fn new(source: S, sink: S, llm: L, options: AnalyzeOptions) -> Self {
        Self {
            source,
            sink,
            llm,
            options,
        }
    }

    pub fn aggregate_path(&self) -> String {
        aggregated_path(&self.options.detail_path)
    }

    async fn write_detail(&self, records: &[ExtractionRecord]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        self.sink.write_file(&self.options.detail_path, &json).await
    }
}

#[async_trait::async_trait]
impl<S: Storage, L: CompletionClient> Pipeline for AnalyzePipeline<S, L> {
    type Item = MarkdownDocument;
    type Batch = AnalysisBatch;
    type Summary = AnalysisSummary;

    async fn extract(&self) -> Result<Vec<MarkdownDocument>> {
        let mut names = self.source.list_files("md").await.map_err(|e| match e {
            HarvestError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                HarvestError::NoInputError {
                    message: "Markdown directory does not exist".to_string(),
                }
            }
            other => other,
        })?;
        if names.is_empty() {
            return Err(HarvestError::NoInputError {
                message: "No markdown files found".to_string(),
            });
        }
        tracing::info!("Found {} markdown files", names.len());

        if self.options.limit > 0 && self.options.limit < names.len() {
            tracing::info!("Limiting analysis to {} files", self.options.limit);
            names.truncate(self.options.limit);
        }

        let mut documents = Vec::with_capacity(names.len());
        for file_name in names {
            let bytes = match self.source.read_file(&file_name).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Error reading file {}: {}", file_name, e);
                    continue;
                }
            };
            let content = String::from_utf8_lossy(&bytes).into_owned();
            if content.trim().is_empty() {
                tracing::warn!("Skipping empty file: {}", file_name);
                continue;
            }
            documents.push(MarkdownDocument { file_name, content });
        }

        Ok(documents)
    }

    async fn transform(&self, documents: Vec<MarkdownDocument>) -> Result<AnalysisBatch> {
        let mut batch = AnalysisBatch::default();
        let total = documents.len();

        for (i, document) in documents.into_iter().enumerate() {
            tracing::info!("Analyzing file {}/{}: {}", i + 1, total, document.file_name);

            let prompt = build_prompt(&document.content, self.options.max_content_length);
            match self.llm.complete(&prompt).await {
                Ok(reply) => {
                    let extraction = parse_model_output(&document.file_name, &reply);
                    if !extraction.is_parsed() {
                        tracing::warn!(
                            "Could not read structured output for {}; keeping raw reply",
                            document.file_name
                        );
                        batch.files_unparsed += 1;
                    }
                    batch
                        .records
                        .extend(extraction.into_records(&document.file_name));
                    batch.files_analyzed += 1;
                }
                Err(e) => {
                    tracing::error!("❌ Analysis of {} failed: {}", document.file_name, e);
                    batch.files_failed.push(document.file_name);
                }
            }

            // checkpoint so an interrupted run keeps what it has
            if let Err(e) = self.write_detail(&batch.records).await {
                tracing::warn!("Could not checkpoint {}: {}", self.options.detail_path, e);
            }

            if i + 1 < total && !self.options.delay.is_zero() {
                tracing::debug!("Waiting {:?} before next analysis", self.options.delay);
                tokio::time::sleep(self.options.delay).await;
            }
        }

        Ok(batch)
    }

    async fn load(&self, batch: AnalysisBatch) -> Result<AnalysisSummary> {
        let report = aggregate(&batch.records, self.options.untitled);

        self.write_detail(&batch.records).await?;
        tracing::info!("Analysis results saved to {}", self.options.detail_path);

        let aggregate_path = self.aggregate_path();
        let json = serde_json::to_vec_pretty(&report)?;
        self.sink.write_file(&aggregate_path, &json).await?;
        tracing::info!("Aggregated results saved to {}", aggregate_path);
        tracing::info!(
            "Found {} companies with {} job listings",
            report.total_companies,
            report.total_job_listings
        );

        Ok(AnalysisSummary {
            detail_path: self.options.detail_path.clone(),
            aggregate_path,
            report,
            files_analyzed: batch.files_analyzed,
            files_failed: batch.files_failed.len(),
        })
    }
}
