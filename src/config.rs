//! Pipeline configuration
//!
//! Loaded from YAML with serde defaults for every field, then overridden
//! from the environment:
//!
//! - `MONDAY_API_TOKEN` (or the variable named by `source.token_env`)
//! - `MONDAY_ENDPOINT`
//! - `DATALAKE_STORE_URL`

use crate::curate::CurationConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::layout::{Layer, LayerLocation};
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::source::DEFAULT_ENDPOINT;
use crate::types::{de_id, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `source.endpoint`
pub const ENDPOINT_ENV: &str = "MONDAY_ENDPOINT";

/// Environment variable overriding `store.url`
pub const STORE_URL_ENV: &str = "DATALAKE_STORE_URL";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// monday.com extraction settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Object store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Logical prefixes per layer
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Gold curation settings
    #[serde(default)]
    pub curation: CurationConfig,
}

impl PipelineConfig {
    /// Load from an optional YAML file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!(
                        "Failed to read config file '{}': {e}",
                        path.display()
                    ))
                })?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        config.apply_env_from(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without environment overrides
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(self.source.token_env.as_str()).none_if_empty() {
            self.source.token = Some(token);
        }
        if let Some(endpoint) = lookup(ENDPOINT_ENV).none_if_empty() {
            self.source.endpoint = endpoint;
        }
        if let Some(url) = lookup(STORE_URL_ENV).none_if_empty() {
            self.store.url = url;
        }
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.source.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Endpoint must be http(s): {}",
                self.source.endpoint
            )));
        }

        if self.source.page_limit == 0 {
            return Err(Error::config("source.page_limit must be positive"));
        }

        if self.source.boards.is_empty() {
            return Err(Error::missing_field("source.boards"));
        }
        if self.source.boards.iter().any(|b| b.id.trim().is_empty()) {
            return Err(Error::config("Board id cannot be empty"));
        }
        let mut labels = HashSet::new();
        for board in &self.source.boards {
            let label = board.label();
            if label.trim().is_empty() || label.contains('/') {
                return Err(Error::config(format!(
                    "Board {} has an invalid name '{label}'",
                    board.id
                )));
            }
            if !labels.insert(label) {
                return Err(Error::config(format!(
                    "Board name '{label}' is used by more than one board"
                )));
            }
        }

        if self.store.url.trim().is_empty() {
            return Err(Error::missing_field("store.url"));
        }
        for (field, bucket) in [
            ("store.bronze_bucket", &self.store.bronze_bucket),
            ("store.silver_bucket", &self.store.silver_bucket),
            ("store.gold_bucket", &self.store.gold_bucket),
        ] {
            if bucket.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        Ok(())
    }

    /// API token, required for extraction only
    pub fn api_token(&self) -> Result<&str> {
        self.source
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_field(self.source.token_env.clone()))
    }

    /// Transport settings for the GraphQL client
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let token = self.api_token()?;
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.source.timeout_secs))
            .max_retries(self.source.max_retries)
            .header("Authorization", token);

        builder = match self.source.requests_per_second {
            0 => builder.no_rate_limit(),
            rps => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
        };

        Ok(builder.build())
    }

    /// Bronze bucket and prefix
    pub fn bronze_location(&self) -> LayerLocation {
        LayerLocation::new(
            Layer::Bronze,
            &self.store.bronze_bucket,
            &self.layout.bronze_prefix,
        )
    }

    /// Silver bucket and prefix
    pub fn silver_location(&self) -> LayerLocation {
        LayerLocation::new(
            Layer::Silver,
            &self.store.silver_bucket,
            &self.layout.silver_prefix,
        )
    }

    /// Gold bucket and prefix
    pub fn gold_location(&self) -> LayerLocation {
        LayerLocation::new(Layer::Gold, &self.store.gold_bucket, &self.layout.gold_prefix)
    }
}

// ============================================================================
// Source
// ============================================================================

/// monday.com extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// GraphQL endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// API token; normally supplied through `token_env`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Items requested per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport retries (0 = fail on first error)
    #[serde(default)]
    pub max_retries: u32,

    /// Request rate limit (0 = unlimited)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Budget for extracting one board
    #[serde(default)]
    pub extract_timeout_secs: Option<u64>,

    /// Boards to extract
    #[serde(default = "default_boards")]
    pub boards: Vec<BoardConfig>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            token: None,
            page_limit: default_page_limit(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            requests_per_second: default_requests_per_second(),
            extract_timeout_secs: None,
            boards: default_boards(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_token_env() -> String {
    "MONDAY_API_TOKEN".to_string()
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_requests_per_second() -> u32 {
    2
}

fn default_boards() -> Vec<BoardConfig> {
    vec![BoardConfig {
        id: "9718729717".to_string(),
        name: Some("funil_originacao".to_string()),
    }]
}

/// One board to extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board id (string or number in YAML)
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Label used for `board_origem` when several boards are merged
    #[serde(default)]
    pub name: Option<String>,
}

impl BoardConfig {
    /// Name if set, else id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// ============================================================================
// Store
// ============================================================================

/// Object store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `s3://`, `file://<dir>`, a plain directory or `memory://`
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Raw snapshots
    #[serde(default = "default_bronze_bucket")]
    pub bronze_bucket: String,

    /// Flattened batches
    #[serde(default = "default_silver_bucket")]
    pub silver_bucket: String,

    /// Curated datasets
    #[serde(default = "default_gold_bucket")]
    pub gold_bucket: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            bronze_bucket: default_bronze_bucket(),
            silver_bucket: default_silver_bucket(),
            gold_bucket: default_gold_bucket(),
        }
    }
}

fn default_store_url() -> String {
    "s3://".to_string()
}

fn default_bronze_bucket() -> String {
    "umane-datalake-bronze".to_string()
}

fn default_silver_bucket() -> String {
    "umane-datalake-prata".to_string()
}

fn default_gold_bucket() -> String {
    "umane-datalake-ouro".to_string()
}

// ============================================================================
// Layout
// ============================================================================

/// Logical prefix of each layer inside its bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Bronze prefix
    #[serde(default = "default_prefix")]
    pub bronze_prefix: String,

    /// Silver prefix
    #[serde(default = "default_prefix")]
    pub silver_prefix: String,

    /// Gold prefix
    #[serde(default = "default_prefix")]
    pub gold_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bronze_prefix: default_prefix(),
            silver_prefix: default_prefix(),
            gold_prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "monday/funil_originacao".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.source.endpoint, "https://api.monday.com/v2");
        assert_eq!(config.source.page_limit, 500);
        assert_eq!(config.source.max_retries, 0);
        assert_eq!(config.source.boards[0].id, "9718729717");
        assert_eq!(config.store.bronze_bucket, "umane-datalake-bronze");
        assert_eq!(config.store.silver_bucket, "umane-datalake-prata");
        assert_eq!(config.store.gold_bucket, "umane-datalake-ouro");
        assert_eq!(config.layout.gold_prefix, "monday/funil_originacao");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
source:
  page_limit: 100
  extract_timeout_secs: 300
  boards:
    - id: 123
      name: funil
    - id: "456"
store:
  url: "memory://"
layout:
  bronze_prefix: raw/monday
curation:
  monetary_columns: [custo]
"#;

        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source.page_limit, 100);
        assert_eq!(config.source.extract_timeout_secs, Some(300));
        assert_eq!(config.source.boards[0].id, "123");
        assert_eq!(config.source.boards[0].label(), "funil");
        assert_eq!(config.source.boards[1].label(), "456");
        assert_eq!(config.store.url, "memory://");
        assert_eq!(config.store.gold_bucket, "umane-datalake-ouro");
        assert_eq!(config.layout.bronze_prefix, "raw/monday");
        assert_eq!(config.layout.silver_prefix, "monday/funil_originacao");
        assert_eq!(config.curation.monetary_columns, vec!["custo"]);
        assert_eq!(config.curation.project_code_columns.len(), 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PipelineConfig::default();
        config.apply_env_from(env(&[
            ("MONDAY_API_TOKEN", "secret"),
            ("MONDAY_ENDPOINT", "http://localhost:9999/v2"),
            ("DATALAKE_STORE_URL", "memory://"),
        ]));

        assert_eq!(config.api_token().unwrap(), "secret");
        assert_eq!(config.source.endpoint, "http://localhost:9999/v2");
        assert_eq!(config.store.url, "memory://");
    }

    #[test]
    fn test_custom_token_env() {
        let mut config = PipelineConfig::from_yaml("source:\n  token_env: OTHER_TOKEN\n").unwrap();
        config.apply_env_from(env(&[("MONDAY_API_TOKEN", "ignored"), ("OTHER_TOKEN", "t")]));
        assert_eq!(config.api_token().unwrap(), "t");
    }

    #[test]
    fn test_missing_token() {
        let mut config = PipelineConfig::default();
        config.apply_env_from(env(&[("MONDAY_API_TOKEN", "")]));
        let err = config.api_token().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
        assert!(err.to_string().contains("MONDAY_API_TOKEN"));
        assert!(config.http_config().is_err());
    }

    #[test]
    fn test_http_config() {
        let mut config = PipelineConfig::default();
        config.source.token = Some("tok".to_string());
        config.source.requests_per_second = 0;

        let http = config.http_config().unwrap();
        assert_eq!(http.default_headers.get("Authorization").unwrap(), "tok");
        assert_eq!(http.max_retries, 0);
        assert!(http.rate_limit.is_none());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = PipelineConfig::default();
        config.source.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        let mut config = PipelineConfig::default();
        config.source.endpoint = "ftp://api.monday.com".to_string();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.source.page_limit = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.source.boards.clear();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));

        let mut config = PipelineConfig::default();
        config.store.silver_bucket = String::new();
        assert!(config.validate().is_err());
    }

    fn board(id: &str, name: Option<&str>) -> BoardConfig {
        BoardConfig {
            id: id.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_rejects_colliding_board_names() {
        let mut config = PipelineConfig::default();
        config.source.boards = vec![board("100", Some("x")), board("200", Some("x"))];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'x'"));

        // a name may not shadow another board's id
        config.source.boards = vec![board("100", None), board("200", Some("100"))];
        assert!(config.validate().is_err());

        config.source.boards = vec![board("100", Some("x")), board("200", Some("y"))];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_board_names() {
        let mut config = PipelineConfig::default();
        config.source.boards = vec![board("100", Some(""))];
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        config.source.boards = vec![board("100", Some("funil/2025"))];
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_locations() {
        let config = PipelineConfig::default();
        assert_eq!(config.bronze_location().bucket, "umane-datalake-bronze");
        assert_eq!(config.silver_location().layer, Layer::Silver);
        assert_eq!(config.gold_location().prefix, "monday/funil_originacao");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "source:\n  page_limit: 50\n").unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.source.page_limit, 50);

        let missing = PipelineConfig::load(Some(&dir.path().join("nope.yaml")));
        assert!(matches!(missing, Err(Error::Config { .. })));
    }
}
