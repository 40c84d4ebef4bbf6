use crate::domain::model::ScrapedPage;
use crate::domain::ports::Scraper;
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_FIRECRAWL_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl `/v1/scrape` client returning markdown.
#[derive(Clone)]
pub struct FirecrawlClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_FIRECRAWL_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull markdown out of a scrape response, tolerating the v0 and v1 layouts.
pub fn markdown_from_response(body: &Value) -> Option<&str> {
    body.pointer("/data/markdown")
        .and_then(Value::as_str)
        .or_else(|| body.get("markdown").and_then(Value::as_str))
        .or_else(|| body.get("data").and_then(Value::as_str))
}

#[async_trait]
impl Scraper for FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let endpoint = format!("{}/v1/scrape", self.base_url);
        tracing::debug!("POST {} for {}", endpoint, url);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "url": url, "formats": ["markdown"] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Firecrawl API error for {}", url);
            return Err(HarvestError::UpstreamError {
                service: "Firecrawl".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("scrape reported failure");
            return Err(HarvestError::processing(format!(
                "Firecrawl could not scrape {}: {}",
                url, reason
            )));
        }

        let markdown = markdown_from_response(&body)
            .filter(|md| !md.trim().is_empty())
            .ok_or_else(|| {
                HarvestError::processing(format!("No markdown content returned for {}", url))
            })?
            .to_string();

        let title = body
            .pointer("/data/metadata/title")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(ScrapedPage {
            url: url.to_string(),
            markdown,
            title,
            raw_response: body,
        })
    }
}
