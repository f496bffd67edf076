//! Application configuration.
//!
//! Settings come from an optional YAML file, then `.env`, then the
//! environment. Only the database URL and the log level are read from the
//! environment directly; API keys are looked up through the variable names
//! the file configures.

use crate::feed::services::WatcherSettings;
use crate::planner::{
    adapters::openai::OpenAiSettings,
    domain::QuantityBounds,
    services::{ContextLimits, PlannerSettings},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable overriding `log-level`.
pub const LOG_LEVEL_ENV: &str = "CONTENTPLAN_LOG_LEVEL";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML for [`AppConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed.
        path: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Default log filter.
    pub log_level: String,
    /// Upper bound on one job's total runtime.
    pub job_timeout_ms: u64,
    /// Data store settings.
    pub database: DatabaseConfig,
    /// Feed watcher settings.
    pub feed_watcher: FeedWatcherConfig,
    /// Downstream content generation endpoint.
    pub generation: GenerationConfig,
    /// Language model endpoint.
    pub llm: LlmConfig,
    /// Planning request limits.
    pub planner: PlannerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            job_timeout_ms: 120_000,
            database: DatabaseConfig::default(),
            feed_watcher: FeedWatcherConfig::default(),
            generation: GenerationConfig::default(),
            llm: LlmConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

/// Data store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 4,
        }
    }
}

/// Feed watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeedWatcherConfig {
    /// Per-feed fetch timeout.
    pub request_timeout_ms: u64,
    /// `User-Agent` sent with feed requests.
    pub user_agent: String,
    /// Subscriptions processed at once.
    pub max_concurrent_subscriptions: usize,
    /// How long a run waits for outstanding dispatches.
    pub dispatch_grace_period_ms: u64,
}

impl Default for FeedWatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 15_000,
            user_agent: concat!("contentplan/", env!("CARGO_PKG_VERSION")).to_owned(),
            max_concurrent_subscriptions: 1,
            dispatch_grace_period_ms: 5_000,
        }
    }
}

impl FeedWatcherConfig {
    /// Returns the fetch timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Converts into watcher run settings.
    #[must_use]
    pub const fn watcher_settings(&self) -> WatcherSettings {
        WatcherSettings {
            max_concurrent_subscriptions: self.max_concurrent_subscriptions,
            dispatch_grace_period: Duration::from_millis(self.dispatch_grace_period_ms),
        }
    }
}

/// Downstream content generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerationConfig {
    /// Endpoint receiving generation requests; unset disables dispatch.
    pub endpoint: Option<String>,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// Dispatch timeout.
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "CONTENTPLAN_GENERATION_KEY".to_owned(),
            timeout_ms: 10_000,
        }
    }
}

impl GenerationConfig {
    /// Returns the dispatch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reads the bearer token from the configured variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        non_blank_env(&self.api_key_env)
    }
}

/// Language model endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout.
    pub timeout_ms: u64,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per answer.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            api_key_env: "OPENAI_API_KEY".to_owned(),
            timeout_ms: 60_000,
            temperature: 0.8,
            max_tokens: 4_096,
        }
    }
}

impl LlmConfig {
    /// Builds client settings, reading the key from the environment.
    #[must_use]
    pub fn openai_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: non_blank_env(&self.api_key_env).unwrap_or_default(),
            timeout: Duration::from_millis(self.timeout_ms),
            max_tokens: self.max_tokens,
        }
    }
}

/// Planning request limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlannerConfig {
    /// Characters of the identity guide kept in the context.
    pub identity_guide_budget: usize,
    /// Performance records listed in the context.
    pub top_performers: usize,
    /// Content-library titles listed in the context.
    pub library_sample: usize,
    /// Reference-library titles listed in the context.
    pub reference_sample: usize,
    /// Largest accepted quantity.
    pub max_quantity: usize,
    /// Quantity used when a request has none.
    pub default_quantity: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let limits = ContextLimits::default();
        let bounds = QuantityBounds::default();
        Self {
            identity_guide_budget: limits.identity_guide_budget,
            top_performers: limits.top_performers,
            library_sample: limits.library_sample,
            reference_sample: limits.reference_sample,
            max_quantity: bounds.max,
            default_quantity: bounds.default,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path` when given, else defaults, then
    /// applies `.env` and environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the
    /// file cannot be used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            debug!(error = %err, "no .env file loaded");
        }
        let mut config = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.apply_overrides(
            non_blank_env(DATABASE_URL_ENV),
            non_blank_env(LOG_LEVEL_ENV),
        );
        Ok(config)
    }

    /// Parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Parses YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Replaces values with environment-provided ones when present.
    pub fn apply_overrides(&mut self, database_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = database_url {
            self.database.url = Some(url);
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
    }

    /// Rejects values the jobs cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_checks = [
            ("job-timeout-ms", self.job_timeout_ms),
            ("database.pool-size", u64::from(self.database.pool_size)),
            ("feed-watcher.request-timeout-ms", self.feed_watcher.request_timeout_ms),
            ("generation.timeout-ms", self.generation.timeout_ms),
            ("llm.timeout-ms", self.llm.timeout_ms),
            ("llm.max-tokens", u64::from(self.llm.max_tokens)),
        ];
        if let Some((key, _)) = zero_checks.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be greater than zero")));
        }
        if self.feed_watcher.max_concurrent_subscriptions == 0 {
            return Err(ConfigError::Invalid(
                "feed-watcher.max-concurrent-subscriptions must be greater than zero".to_owned(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        let planner = &self.planner;
        if planner.max_quantity == 0 || !(1..=planner.max_quantity).contains(&planner.default_quantity)
        {
            return Err(ConfigError::Invalid(format!(
                "planner.default-quantity must be within 1..={}",
                planner.max_quantity
            )));
        }
        Ok(())
    }

    /// Returns the limit applied to a whole job run.
    #[must_use]
    pub const fn job_timeout(&self) -> Duration {
        Duration::from_millis(self.job_timeout_ms)
    }

    /// Returns the planner settings described by this configuration.
    #[must_use]
    pub const fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            quantity: QuantityBounds {
                default: self.planner.default_quantity,
                max: self.planner.max_quantity,
            },
            temperature: self.llm.temperature,
            context: ContextLimits {
                identity_guide_budget: self.planner.identity_guide_budget,
                top_performers: self.planner.top_performers,
                library_sample: self.planner.library_sample,
                reference_sample: self.planner.reference_sample,
            },
        }
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
