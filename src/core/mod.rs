pub mod aggregate;
pub mod analyzer;
pub mod etl;
pub mod export;
pub mod fetcher;
pub mod naming;
pub mod parser;

pub use crate::domain::model::{
    AggregateReport, AnalysisBatch, AnalysisSummary, CompanyEntry, Extraction, ExtractionRecord,
    FetchSummary, MarkdownDocument, SavedPage, ScrapedPage, UntitledListings,
};
pub use crate::domain::ports::{CompletionClient, Pipeline, Scraper, Storage};
pub use crate::utils::error::Result;
