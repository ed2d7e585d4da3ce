//! Application configuration structures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Published site metadata
    #[serde(default)]
    pub site: SiteConfig,

    /// Search expression sent to the repository API
    #[serde(default)]
    pub search: SearchConfig,

    /// Topic-tag taxonomy rules
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,

    /// HTTP and retry behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Export output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Moved repositories: old full name to current full name
    #[serde(default)]
    pub redirect: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(AppError::validation("site.title is empty"));
        }
        if self.site.url.trim().is_empty() {
            return Err(AppError::validation("site.url is empty"));
        }
        if !self.site.url.ends_with('/') {
            return Err(AppError::validation("site.url must end with '/'"));
        }
        url::Url::parse(&self.site.url)?;
        if self.search.query.trim().is_empty() {
            return Err(AppError::validation("search.query is empty"));
        }
        if self.taxonomy.prefix.trim().is_empty() {
            return Err(AppError::validation("taxonomy.prefix is empty"));
        }
        for value in &self.taxonomy.denylist {
            if value.starts_with(&self.taxonomy.prefix) {
                return Err(AppError::validation(format!(
                    "taxonomy.denylist entry '{value}' must not carry the taxonomy prefix"
                )));
            }
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.crawler.api_base)?;
        Ok(())
    }
}

/// Published site metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    /// Site title, also the top-level feed title
    #[serde(default)]
    pub title: String,

    /// Site description used in feed envelopes
    #[serde(default)]
    pub description: String,

    /// Public base URL of the published site, with trailing slash
    #[serde(default)]
    pub url: String,
}

/// Search request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search expression sent as the `q` parameter
    #[serde(default)]
    pub query: String,

    /// Sort key sent as the `sort` parameter
    #[serde(default = "defaults::sort")]
    pub sort: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort: defaults::sort(),
        }
    }
}

/// Topic-tag taxonomy rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Recognized topic prefix; tags without it are ignored,
    /// tags with it are stripped to form the category
    #[serde(default)]
    pub prefix: String,

    /// Category values reserved for aggregation views, never valid categories
    #[serde(default = "defaults::denylist")]
    pub denylist: Vec<String>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            denylist: defaults::denylist(),
        }
    }
}

/// HTTP client and retry behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the repository API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Environment variable holding the bearer token
    #[serde(default = "defaults::token_env")]
    pub token_env: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Backoff before the single retry when Retry-After is absent, in seconds
    #[serde(default = "defaults::retry_default")]
    pub retry_default_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            user_agent: defaults::user_agent(),
            token_env: defaults::token_env(),
            timeout_secs: defaults::timeout(),
            retry_default_secs: defaults::retry_default(),
        }
    }
}

/// Export output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory the export tree is written under
    #[serde(default = "defaults::output_root")]
    pub root: String,

    /// Timezone used for display timestamps
    #[serde(default = "defaults::timezone")]
    pub timezone: Tz,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: defaults::output_root(),
            timezone: defaults::timezone(),
        }
    }
}

mod defaults {
    use chrono_tz::Tz;

    // Search defaults
    pub fn sort() -> String {
        "updated".into()
    }

    // Taxonomy defaults
    pub fn denylist() -> Vec<String> {
        // "author" is the author-index directory name
        vec!["author".into()]
    }

    // Crawler defaults
    pub fn api_base() -> String {
        "https://api.github.com".into()
    }
    pub fn user_agent() -> String {
        "topicfeed/0.1".into()
    }
    pub fn token_env() -> String {
        "GITHUB_TOKEN".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn retry_default() -> u64 {
        180
    }

    // Output defaults
    pub fn output_root() -> String {
        "docs".into()
    }
    pub fn timezone() -> Tz {
        chrono_tz::Asia::Tokyo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.site.title = "Repo Station".into();
        config.site.url = "https://example.com/station/".into();
        config.search.query = "topic:station".into();
        config.taxonomy.prefix = "station-".into();
        config
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_trailing_slash() {
        let mut config = valid_config();
        config.site.url = "https://example.com/station".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_prefixed_denylist() {
        let mut config = valid_config();
        config.taxonomy.denylist = vec!["station-author".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [site]
            title = "Repo Station"
            description = "Repositories by topic"
            url = "https://example.com/station/"

            [search]
            query = "topic:station"

            [taxonomy]
            prefix = "station-"

            [output]
            timezone = "Asia/Tokyo"

            [redirect]
            "old/name" = "new/name"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.title, "Repo Station");
        assert_eq!(config.search.sort, "updated");
        assert_eq!(config.taxonomy.denylist, vec!["author".to_string()]);
        assert_eq!(config.crawler.retry_default_secs, 180);
        assert_eq!(config.output.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(config.redirect.get("old/name").unwrap(), "new/name");
    }
}
