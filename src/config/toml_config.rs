use crate::core::UntitledListings;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional `harvest.toml`; every value may be overridden on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub firecrawl: FirecrawlSection,
    pub openrouter: OpenRouterSection,
    pub aggregate: AggregateSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirecrawlSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub output_dir: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub delay_ms: Option<u64>,
    pub max_content_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSection {
    pub untitled_listings: Option<UntitledListings>,
}

pub(crate) fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

impl HarvestConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value; unknown variables are left
    /// as-is and rejected later by `require_secret`.
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| {
                    tracing::warn!("Environment variable {} is not set", &caps[1]);
                    caps[0].to_string()
                })
            })
            .into_owned()
    }

    /// Load `path` when given, otherwise start from defaults.
    pub fn load_optional(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let config = Self::from_file(path)?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.firecrawl.base_url {
            validation::validate_url("firecrawl.base_url", url)?;
        }
        if let Some(url) = &self.openrouter.base_url {
            validation::validate_url("openrouter.base_url", url)?;
        }
        if let Some(dir) = &self.firecrawl.output_dir {
            validation::validate_path("firecrawl.output_dir", dir)?;
        }
        if let Some(secs) = self.firecrawl.timeout_seconds {
            validation::validate_positive_number("firecrawl.timeout_seconds", secs, 1)?;
        }
        if let Some(secs) = self.openrouter.timeout_seconds {
            validation::validate_positive_number("openrouter.timeout_seconds", secs, 1)?;
        }
        if let Some(len) = self.openrouter.max_content_length {
            validation::validate_positive_number("openrouter.max_content_length", len as u64, 1)?;
        }
        if let Some(model) = &self.openrouter.model {
            if model.trim().is_empty() {
                return Err(HarvestError::InvalidConfigValueError {
                    field: "openrouter.model".to_string(),
                    value: model.clone(),
                    reason: "Model name cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = HarvestConfig::from_toml_str(
            r#"
[firecrawl]
base_url = "https://api.firecrawl.dev"
output_dir = "scraped_content/sdr_scrape"
delay_ms = 500

[openrouter]
model = "anthropic/claude-3.5-sonnet"
timeout_seconds = 90
max_content_length = 50000

[aggregate]
untitled_listings = "zero"
"#,
        )
        .unwrap();

        assert_eq!(config.firecrawl.delay_ms, Some(500));
        assert_eq!(
            config.openrouter.model.as_deref(),
            Some("anthropic/claude-3.5-sonnet")
        );
        assert_eq!(config.openrouter.max_content_length, Some(50000));
        assert_eq!(
            config.aggregate.untitled_listings,
            Some(UntitledListings::Zero)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = HarvestConfig::from_toml_str("").unwrap();
        assert!(config.openrouter.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SDR_HARVEST_TEST_OR_KEY", "sk-or-test");

        let config = HarvestConfig::from_toml_str(
            r#"
[openrouter]
api_key = "${SDR_HARVEST_TEST_OR_KEY}"

[firecrawl]
api_key = "${SDR_HARVEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(
            config.firecrawl.api_key.as_deref(),
            Some("${SDR_HARVEST_UNSET_VARIABLE}")
        );

        std::env::remove_var("SDR_HARVEST_TEST_OR_KEY");
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let config = HarvestConfig::from_toml_str(
            r#"
[openrouter]
base_url = "openrouter.ai/api/v1"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = HarvestConfig::from_toml_str("[openrouter\nmodel = 1").unwrap_err();
        assert!(matches!(err, HarvestError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[openrouter]\nmodel = \"openai/gpt-4o\"\n")
            .unwrap();

        let config = HarvestConfig::load_optional(temp_file.path().to_str()).unwrap();
        assert_eq!(config.openrouter.model.as_deref(), Some("openai/gpt-4o"));
    }
}
