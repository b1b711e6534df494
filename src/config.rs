//! Configuration management for companyenrich
//!
//! All configuration is loaded from `./config/companyenrich.toml`.
//! Heuristic data (delay range, denylists, keyword vocabularies, employee
//! patterns and bounds) is configuration, not code - the only defaults in
//! the source tree are in the embedded config template.

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/companyenrich.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/companyenrich.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid regex pattern '{pattern_name}': {error}\n  Pattern: {pattern}")]
    InvalidRegex {
        pattern_name: String,
        pattern: String,
        error: String,
    },

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub politeness: PolitenessConfig,
    pub validation: ValidationConfig,
    pub description: DescriptionConfig,
    pub mining: MiningConfig,
    pub registry: RegistryConfig,
    pub search: SearchConfig,
    pub batch: BatchConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub probe_timeout_secs: u64,
    pub content_timeout_secs: u64,
    pub document_timeout_secs: u64,
}

impl HttpConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }

    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout_secs)
    }
}

/// Inter-request delay configuration - the sole outbound throttle
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
}

/// Website acceptance heuristics
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    pub accepted_suffixes: Vec<String>,
    pub denied_hosts: Vec<String>,
    pub legal_suffixes: Vec<String>,
    pub business_keywords: Vec<String>,
    pub business_keyword_min: usize,
    pub name_token_min: usize,
    pub search_confidence_min: u32,
}

/// Description extraction thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionConfig {
    pub max_len: usize,
    pub greeting_prefixes: Vec<String>,
    pub sic_overlap_max: usize,
}

/// Filing mining bounds and patterns
#[derive(Debug, Clone, Deserialize)]
pub struct MiningConfig {
    pub employee_min: u32,
    pub employee_max: u32,
    pub trailing_year_window: usize,
    pub max_filings: usize,
    pub max_pdf_pages: usize,
    pub employee_patterns: Vec<String>,
}

impl MiningConfig {
    /// Compile the configured employee patterns, case-insensitive.
    pub fn compiled_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.employee_patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("(?i){}", p)).map_err(|e| ConfigError::InvalidRegex {
                    pattern_name: "mining.employee_patterns".to_string(),
                    pattern: p.clone(),
                    error: e.to_string(),
                })
            })
            .collect()
    }
}

/// Public companies-registry endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub base_url: String,
}

impl RegistryConfig {
    pub fn company_url(&self, registry_number: &str) -> String {
        format!("{}/company/{}", self.base_url, registry_number)
    }

    pub fn filing_history_url(&self, registry_number: &str) -> String {
        format!("{}/company/{}/filing-history", self.base_url, registry_number)
    }

    /// Resolve a document link from a filing listing, which may be relative
    pub fn document_url(&self, link: &str) -> String {
        if link.starts_with("http") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }
}

/// Text-search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    pub query_suffix: String,
}

/// Batch processing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub checkpoint_interval: usize,
    pub skip_name_prefixes: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate the embedded default configuration
    pub fn default_config() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.probe_timeout_secs == 0 || self.http.content_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http timeouts".to_string(),
            });
        }

        if self.politeness.min_delay_secs < 0.0
            || self.politeness.max_delay_secs < self.politeness.min_delay_secs
        {
            return Err(ConfigError::InvalidValue {
                field: "politeness".to_string(),
                reason: "expected 0 <= min_delay_secs <= max_delay_secs".to_string(),
            });
        }

        if self.validation.accepted_suffixes.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "validation.accepted_suffixes".to_string(),
            });
        }

        for (field, url) in [
            ("registry.base_url", &self.registry.base_url),
            ("search.base_url", &self.search.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl {
                    field: field.to_string(),
                    url: url.clone(),
                });
            }
        }

        if self.mining.employee_min == 0 || self.mining.employee_max < self.mining.employee_min {
            return Err(ConfigError::InvalidValue {
                field: "mining employee bounds".to_string(),
                reason: "expected 1 <= employee_min <= employee_max".to_string(),
            });
        }
        if self.mining.trailing_year_window == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "mining.trailing_year_window".to_string(),
            });
        }
        if self.mining.employee_patterns.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "mining.employee_patterns".to_string(),
            });
        }
        self.mining.compiled_patterns()?;

        if self.batch.checkpoint_interval == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "batch.checkpoint_interval".to_string(),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        atty::is(atty::Stream::Stdin)
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("Configuration file not found. Create default config? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}
