use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::ConfigError;
use crate::language_utils::LocaleTable;

/// Application configuration module
/// This module handles loading, validating and saving the settings the
/// submission pipeline needs: vendor credentials, site layout, store location.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Vendor API settings
    #[serde(default)]
    pub vendor: VendorConfig,

    /// Public documentation site, used to build visual-context URLs
    #[serde(default = "default_docs_site_url")]
    pub docs_site_url: String,

    /// Prefix stripped from a slug when building its public URL
    #[serde(default = "default_content_root")]
    pub content_root: String,

    /// Extension stripped from a slug when building its public URL
    #[serde(default = "default_content_extension")]
    pub content_extension: String,

    /// Directory that queued slugs are resolved against
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// SQLite file backing the translation queue (default: user data dir)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Rate-limit retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Internal locale code to vendor locale code
    #[serde(default)]
    pub locale_ids: LocaleTable,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Vendor API connection settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct VendorConfig {
    /// Base URL of the vendor API
    #[serde(default)]
    pub api_url: String,

    /// Account identifier for authentication
    #[serde(default)]
    pub user_identifier: String,

    /// Account secret for authentication
    #[serde(default)]
    pub user_secret: String,

    /// Vendor project that receives jobs
    #[serde(default)]
    pub project_id: String,
}

/// Retry settings for rate-limited (HTTP 429) responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff in milliseconds, doubled after each attempt
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_docs_site_url() -> String {
    "https://docs.newrelic.com".to_string()
}

fn default_content_root() -> String {
    "src/content/".to_string()
}

fn default_content_extension() -> String {
    ".mdx".to_string()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000 // doubled on each retry
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor: VendorConfig::default(),
            docs_site_url: default_docs_site_url(),
            content_root: default_content_root(),
            content_extension: default_content_extension(),
            source_dir: default_source_dir(),
            database_path: None,
            retry: RetryConfig::default(),
            request_timeout_secs: default_timeout_secs(),
            locale_ids: LocaleTable::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Check everything the pipeline needs before any request is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("vendor.api_url", &self.vendor.api_url),
            ("vendor.user_identifier", &self.vendor.user_identifier),
            ("vendor.user_secret", &self.vendor.user_secret),
            ("vendor.project_id", &self.vendor.project_id),
            ("docs_site_url", &self.docs_site_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingConfig(name.to_string()));
            }
        }

        Url::parse(&self.vendor.api_url)
            .map_err(|e| ConfigError::Invalid(format!("vendor.api_url: {}", e)))?;
        Url::parse(&self.docs_site_url)
            .map_err(|e| ConfigError::Invalid(format!("docs_site_url: {}", e)))?;

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.locale_ids.is_empty() {
            return Err(ConfigError::MissingConfig("locale_ids".to_string()));
        }

        Ok(())
    }

    /// Database location, resolved against the user data directory when unset
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => crate::database::DatabaseConnection::default_database_path(),
        }
    }
}
