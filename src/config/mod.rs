#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod toml_config;

use crate::core::UntitledListings;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

/// Resolved settings for one scrape run.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub urls: Vec<String>,
    pub api_key: String,
    pub base_url: String,
    pub output_dir: String,
    pub timeout: Duration,
    pub delay: Duration,
}

/// Resolved settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dir: String,
    pub output: String,
    pub limit: usize,
    pub timeout: Duration,
    pub delay: Duration,
    pub max_content_length: usize,
    pub untitled: UntitledListings,
}

impl Validate for FetchSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        for url in &self.urls {
            validation::validate_url("url", url)?;
        }
        Ok(())
    }
}

impl Validate for AnalyzeSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("dir", &self.dir)?;
        validation::validate_path("output", &self.output)?;
        validation::validate_positive_number(
            "max_content_length",
            self.max_content_length as u64,
            1,
        )?;
        Ok(())
    }
}
