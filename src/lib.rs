pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FirecrawlClient, OpenRouterClient};
pub use config::cli::LocalStorage;
pub use config::{AnalyzeSettings, FetchSettings};
pub use crate::core::{
    aggregate::aggregate,
    analyzer::{AnalyzeOptions, AnalyzePipeline},
    etl::EtlEngine,
    fetcher::Fetcher,
    parser::parse_model_output,
};
pub use utils::error::{HarvestError, Result};
