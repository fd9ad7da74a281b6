// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use crate::constants::{endpoints, env_config, tuning};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: String,
    /// Upstream API configuration
    pub upstream: UpstreamConfig,
    /// Forecast engine configuration
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// NASA POWER API base URL
    pub power_base_url: String,
    /// Nominatim geocoder base URL
    pub nominatim_base_url: String,
    /// Request timeout for upstream calls, seconds
    pub request_timeout_secs: u64,
    /// User-Agent sent to upstream APIs
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Trailing days of history fetched before predicting
    pub history_days: i64,
    /// Horizon used when a request does not specify one
    pub default_horizon_days: usize,
    /// Largest horizon a request may ask for
    pub max_horizon_days: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            power_base_url: endpoints::POWER_BASE_URL.to_string(),
            nominatim_base_url: endpoints::NOMINATIM_BASE_URL.to_string(),
            request_timeout_secs: 15,
            user_agent: env_config::user_agent(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            history_days: tuning::HISTORY_DAYS,
            default_horizon_days: tuning::DEFAULT_HORIZON_DAYS,
            max_horizon_days: tuning::MAX_HORIZON_DAYS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenv::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = ServerConfig {
            http_port: env_var_or("HTTP_PORT", "8080")?
                .parse()
                .context("Invalid HTTP_PORT value")?,
            log_level: env_config::log_level(),

            upstream: UpstreamConfig {
                power_base_url: env_config::power_base_url(),
                nominatim_base_url: env_config::nominatim_base_url(),
                request_timeout_secs: env_var_or("REQUEST_TIMEOUT_SECS", "15")?
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                user_agent: env_config::user_agent(),
            },

            forecast: ForecastConfig {
                history_days: env_var_or("HISTORY_DAYS", "1095")?
                    .parse()
                    .context("Invalid HISTORY_DAYS value")?,
                default_horizon_days: env_var_or("DEFAULT_HORIZON_DAYS", "7")?
                    .parse()
                    .context("Invalid DEFAULT_HORIZON_DAYS value")?,
                max_horizon_days: env_var_or("MAX_HORIZON_DAYS", "365")?
                    .parse()
                    .context("Invalid MAX_HORIZON_DAYS value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.upstream.power_base_url.is_empty() {
            return Err(anyhow::anyhow!("POWER_BASE_URL cannot be empty"));
        }

        if self.upstream.nominatim_base_url.is_empty() {
            return Err(anyhow::anyhow!("NOMINATIM_BASE_URL cannot be empty"));
        }

        if self.upstream.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be positive"));
        }

        if self.forecast.history_days < 30 {
            return Err(anyhow::anyhow!(
                "HISTORY_DAYS must cover at least 30 days, got {}",
                self.forecast.history_days
            ));
        }

        if self.forecast.default_horizon_days == 0
            || self.forecast.default_horizon_days > self.forecast.max_horizon_days
        {
            return Err(anyhow::anyhow!(
                "DEFAULT_HORIZON_DAYS must be within 1..={}",
                self.forecast.max_horizon_days
            ));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Skycast Configuration:\n\
             - HTTP Port: {}\n\
             - Log Level: {}\n\
             - POWER API: {}\n\
             - Geocoder: {}\n\
             - Upstream Timeout: {}s\n\
             - History Window: {} days\n\
             - Horizon: default {} / max {} days",
            self.http_port,
            self.log_level,
            self.upstream.power_base_url,
            self.upstream.nominatim_base_url,
            self.upstream.request_timeout_secs,
            self.forecast.history_days,
            self.forecast.default_horizon_days,
            self.forecast.max_horizon_days,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            log_level: "info".to_string(),
            upstream: UpstreamConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_string()))
}
