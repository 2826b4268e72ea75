// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{LookupError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub unanswered: UnansweredConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub site: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub result_limit: usize,
    pub max_concurrent_fetches: usize,
    pub request_timeout_secs: u64,
    pub total_timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnansweredConfig {
    pub page_size: u32,
    pub batch_size: u32,
    pub top_n: usize,
    pub lookback_days: i64,
    /// Stack Exchange filter limiting fields to
    /// answer_count, link, view_count, creation_date, question_id (and the total).
    pub question_filter: String,
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Layers built-in defaults, an optional TOML file and `STACKRANK__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| LookupError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("STACKRANK")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| LookupError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| LookupError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.stackexchange.com/2.3".to_string(),
                site: "stackoverflow".to_string(),
                key: None,
            },
            search: SearchConfig {
                result_limit: 10,
                max_concurrent_fetches: 6,
                request_timeout_secs: 5,
                total_timeout_secs: 20,
                max_attempts: 3,
                initial_backoff_ms: 500,
            },
            cache: CacheConfig {
                enabled: true,
                ttl_secs: 15 * 60,
                capacity: 100,
            },
            unanswered: UnansweredConfig {
                page_size: 100,
                batch_size: 10,
                top_n: 5,
                lookback_days: 7,
                question_filter: "!m9aF_UAbWOtMBiDgLzfN4Q".to_string(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.api.base_url)
            .map_err(|e| LookupError::Config(e.to_string()))?;

        if self.api.site.trim().is_empty() {
            return Err(LookupError::Config("api.site must not be empty".to_string()));
        }

        Validator::validate_limit(self.search.result_limit)
            .map_err(|e| LookupError::Config(e.to_string()))?;

        if self.search.max_concurrent_fetches == 0 {
            return Err(LookupError::Config(
                "max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }

        if self.search.max_attempts == 0 {
            return Err(LookupError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.search.request_timeout_secs == 0 || self.search.total_timeout_secs == 0 {
            return Err(LookupError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(LookupError::Config(
                "cache.capacity must be greater than 0 when the cache is enabled".to_string(),
            ));
        }

        if self.unanswered.page_size == 0 || self.unanswered.page_size > 100 {
            return Err(LookupError::Config(
                "unanswered.page_size must be between 1 and 100".to_string(),
            ));
        }

        if self.unanswered.batch_size == 0 {
            return Err(LookupError::Config(
                "unanswered.batch_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
