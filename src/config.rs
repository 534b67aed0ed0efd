use crate::lifecycle::PollingPolicy;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Base URL used when `DOCPROC_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.docproc.dev/v1";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document-processing client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token attached to every request.
    pub api_key: String,
    /// Base URL of the API, including any version prefix.
    pub base_url: String,
    /// Optional per-request HTTP timeout.
    pub request_timeout: Option<Duration>,
    /// Polling policy applied to uploads that wait for completion.
    pub polling: PollingPolicy,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = PollingPolicy::default();
        Ok(Self {
            api_key: load_env("DOCPROC_API_KEY")?,
            base_url: load_env_optional("DOCPROC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: parse_optional::<u64>("DOCPROC_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            polling: PollingPolicy {
                poll_interval: parse_optional::<u64>("DOCPROC_POLL_INTERVAL_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.poll_interval),
                max_poll_attempts: parse_optional("DOCPROC_MAX_POLL_ATTEMPTS")?
                    .unwrap_or(defaults.max_poll_attempts),
                poll_timeout: parse_optional::<u64>("DOCPROC_POLL_TIMEOUT_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.poll_timeout),
            },
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, if [`init_config`] has run.
pub fn get_config() -> Option<&'static Config> {
    CONFIG.get()
}

/// Load configuration from the environment (and `.env`) and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::from_env()?;
    tracing::debug!(
        base_url = %config.base_url,
        timeout = ?config.request_timeout,
        poll_interval_ms = config.polling.poll_interval.as_millis() as u64,
        max_poll_attempts = config.polling.max_poll_attempts,
        poll_timeout_ms = config.polling.poll_timeout.as_millis() as u64,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
