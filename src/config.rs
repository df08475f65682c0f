//! Run configuration for Oxide-Steps
//!
//! One `Config` is built per test-run process and handed to the executor at
//! construction.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Default wait budget for readiness predicates, in milliseconds
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;

/// Upper bound for the explicit `I wait for <n> ms` step, in milliseconds
pub const MAX_EXPLICIT_WAIT_MS: u64 = 300_100;

/// Run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the default wait budget for the whole run
    pub custom_timeout_ms: Option<u64>,

    /// Wait Gate polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Delay applied by the deferred click step in milliseconds
    pub deferred_click_delay_ms: u64,

    /// DevTools HTTP endpoint
    pub cdp_endpoint: String,

    /// Page-object table file (JSON or TOML)
    pub page_objects_path: Option<String>,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            custom_timeout_ms: None,
            poll_interval_ms: 100,
            deferred_click_delay_ms: 300,
            cdp_endpoint: "http://localhost:9222".to_string(),
            page_objects_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(timeout) = env::var("OXIDE_STEPS_CUSTOM_TIMEOUT") {
            config.custom_timeout_ms = Some(
                timeout
                    .parse()
                    .map_err(|_| Error::configuration("Invalid OXIDE_STEPS_CUSTOM_TIMEOUT"))?,
            );
        }

        if let Ok(interval) = env::var("OXIDE_STEPS_POLL_INTERVAL") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid OXIDE_STEPS_POLL_INTERVAL"))?;
        }

        if let Ok(delay) = env::var("OXIDE_STEPS_CLICK_DELAY") {
            config.deferred_click_delay_ms = delay
                .parse()
                .map_err(|_| Error::configuration("Invalid OXIDE_STEPS_CLICK_DELAY"))?;
        }

        if let Ok(endpoint) = env::var("OXIDE_STEPS_CDP_ENDPOINT") {
            config.cdp_endpoint = endpoint;
        }

        if let Ok(path) = env::var("OXIDE_STEPS_PAGE_OBJECTS") {
            config.page_objects_path = Some(path);
        }

        if let Ok(log_level) = env::var("OXIDE_STEPS_LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Set the run-level wait budget override
    pub fn with_custom_timeout(mut self, timeout_ms: u64) -> Self {
        self.custom_timeout_ms = Some(timeout_ms);
        self
    }

    /// Wait budget for a step: step override, then run override, then default
    pub fn wait_timeout(&self, step_override_ms: Option<u64>) -> Duration {
        let ms = step_override_ms
            .or(self.custom_timeout_ms)
            .unwrap_or(DEFAULT_WAIT_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    /// Wait Gate polling interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Deferred click delay
    pub fn deferred_click_delay(&self) -> Duration {
        Duration::from_millis(self.deferred_click_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::configuration("poll_interval_ms must be greater than zero"));
        }
        Ok(())
    }
}
