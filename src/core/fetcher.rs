use crate::core::naming::scrape_stem;
use crate::core::{FetchSummary, SavedPage, Scraper, Storage};
use crate::utils::error::{HarvestError, Result};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_URL: &str = "https://builtin.com/jobs/remote/hybrid/office/51-200/201-500?search=Sales+Development+Representative&country=USA&allLocations=true";
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_content";

/// Scrapes URLs one at a time and writes each page as soon as it arrives.
pub struct Fetcher<S: Storage, C: Scraper> {
    storage: S,
    scraper: C,
    delay: Duration,
    used_stems: Mutex<HashSet<String>>,
}

impl<S: Storage, C: Scraper> Fetcher<S, C> {
    pub fn new(storage: S, scraper: C) -> Self {
        Self {
            storage,
            scraper,
            delay: Duration::from_secs(1),
            used_stems: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn fetch_one(&self, url: &str) -> Result<SavedPage> {
        let page = self.scraper.scrape(url).await?;
        if let Some(title) = &page.title {
            tracing::debug!("Scraped \"{}\" ({} bytes)", title, page.markdown.len());
        }

        let stem = self
            .claim_stem(scrape_stem(url, chrono::Local::now()))
            .await;
        let markdown_file = format!("{}.md", stem);
        let raw_file = format!("{}.json", stem);

        self.storage
            .write_file(&markdown_file, page.markdown.as_bytes())
            .await?;
        let raw = serde_json::to_vec_pretty(&page.raw_response)?;
        self.storage.write_file(&raw_file, &raw).await?;

        Ok(SavedPage {
            url: url.to_string(),
            markdown_file,
            raw_file,
        })
    }

    /// Reserve `stem` for this fetcher, appending `_2`, `_3`, ... when an
    /// earlier page in the run already produced the same name.
    async fn claim_stem(&self, stem: String) -> String {
        let mut used = self.used_stems.lock().await;
        let mut candidate = stem.clone();
        let mut n = 1;
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", stem, n);
        }
        used.insert(candidate.clone());
        candidate
    }

    /// Fetch every URL in order. A failing URL is recorded and skipped.
    pub async fn run(&self, urls: &[String]) -> FetchSummary {
        let mut summary = FetchSummary::default();

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("Scraping URL {}/{}: {}", i + 1, urls.len(), url);

            match self.fetch_one(url).await {
                Ok(saved) => {
                    tracing::info!("Saved markdown content to: {}", saved.markdown_file);
                    summary.succeeded.push(saved);
                }
                Err(e) => {
                    tracing::error!("❌ Error scraping {}: {}", url, e);
                    summary.failed.push((url.clone(), e.to_string()));
                }
            }

            if i + 1 < urls.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        summary
    }
}

/// Read target URLs from a `.csv` file with a `url` column or a plain list, one per line.
pub fn read_url_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let urls: Vec<String> = if is_csv {
        let mut reader = csv::Reader::from_path(path)?;
        let column = reader
            .headers()?
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("url"))
            .ok_or_else(|| {
                HarvestError::processing(format!("{} has no `url` column", path.display()))
            })?;

        let mut urls = Vec::new();
        for row in reader.records() {
            if let Some(url) = row?.get(column) {
                urls.push(url.trim().to_string());
            }
        }
        urls
    } else {
        std::fs::read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    Ok(urls.into_iter().filter(|u| !u.is_empty()).collect())
}
