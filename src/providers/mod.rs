// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::config::UpstreamConfig;
use crate::models::DailyRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub mod nasa_power;
pub mod synthetic;

/// Errors from a historical weather provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Upstream request failed with status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Upstream response contained no usable records")]
    EmptyResponse,

    #[error("Invalid date range: {start} to {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A source of historical daily weather for a point location.
///
/// Implementations must return records in ascending date order. The NASA
/// POWER implementation degrades to synthetic data rather than failing, so
/// callers can treat an `Ok` as always non-empty for a non-empty range.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn daily_history(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError>;

    fn provider_name(&self) -> &'static str;
}

pub fn create_provider(
    provider_type: &str,
    config: &UpstreamConfig,
) -> Result<Arc<dyn HistoryProvider>> {
    match provider_type.to_lowercase().as_str() {
        "nasa-power" => Ok(Arc::new(nasa_power::NasaPowerProvider::new(config))),
        "synthetic" => Ok(Arc::new(synthetic::SyntheticProvider::new())),
        _ => Err(anyhow::anyhow!(
            "Unknown provider: {}. Currently supported: nasa-power, synthetic",
            provider_type
        )),
    }
}
