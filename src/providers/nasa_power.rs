// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! NASA POWER daily point-data client.
//!
//! POWER deployments disagree on parameter names (PRECTOTCORR vs PRECTOT)
//! and on which sets a community may request, so the fetch walks a fixed
//! list of parameter variants until one yields records. When every variant
//! fails the client degrades to the synthetic generator instead of erroring.

use crate::config::UpstreamConfig;
use crate::constants::endpoints::{
    POWER_COMMUNITY, POWER_DAILY_POINT_PATH, POWER_FILL_VALUE, POWER_PARAMETER_VARIANTS,
};
use crate::logging::AppLogger;
use crate::models::DailyRecord;
use crate::providers::synthetic::synthetic_series;
use crate::providers::{HistoryProvider, ProviderError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// POWER daily point response, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// parameter name -> (YYYYMMDD -> value)
    #[serde(default)]
    parameter: HashMap<String, HashMap<String, Option<f64>>>,
}

pub struct NasaPowerProvider {
    client: Client,
    base_url: String,
}

impl NasaPowerProvider {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.power_base_url.clone(),
        }
    }

    fn daily_point_url(
        &self,
        parameters: &str,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, POWER_DAILY_POINT_PATH))?;
        url.query_pairs_mut()
            .append_pair("parameters", parameters)
            .append_pair("start", &start.format("%Y%m%d").to_string())
            .append_pair("end", &end.format("%Y%m%d").to_string())
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("community", POWER_COMMUNITY)
            .append_pair("format", "JSON");
        Ok(url)
    }

    /// Fetch one parameter variant; errors on transport failure, non-2xx,
    /// or a response that parses to zero records
    async fn fetch_variant(
        &self,
        parameters: &str,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError> {
        let url = self.daily_point_url(parameters, latitude, longitude, start, end)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus(response.status()));
        }

        let body: PowerResponse = response.json().await?;
        let records = parse_power_response(&body);
        if records.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(records)
    }
}

#[async_trait]
impl HistoryProvider for NasaPowerProvider {
    async fn daily_history(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, ProviderError> {
        if start > end {
            return Err(ProviderError::InvalidRange { start, end });
        }

        for parameters in POWER_PARAMETER_VARIANTS {
            debug!("Trying POWER parameters: {}", parameters);
            let started = Instant::now();

            match self
                .fetch_variant(parameters, latitude, longitude, start, end)
                .await
            {
                Ok(records) => {
                    AppLogger::log_upstream_fetch(
                        self.provider_name(),
                        parameters,
                        true,
                        started.elapsed().as_millis() as u64,
                    );
                    info!(
                        "Fetched {} daily records with parameters: {}",
                        records.len(),
                        parameters
                    );
                    return Ok(records);
                }
                Err(e) => {
                    AppLogger::log_upstream_fetch(
                        self.provider_name(),
                        parameters,
                        false,
                        started.elapsed().as_millis() as u64,
                    );
                    warn!("POWER fetch failed with parameters {}: {}", parameters, e);
                }
            }
        }

        AppLogger::log_upstream_degraded(
            self.provider_name(),
            "all parameter variants failed",
        );
        Ok(synthetic_series(latitude, longitude, start, end))
    }

    fn provider_name(&self) -> &'static str {
        "nasa-power"
    }
}

/// An observed value, with the POWER fill value treated as missing
fn observation(value: Option<f64>) -> Option<f64> {
    value.filter(|v| (v - POWER_FILL_VALUE).abs() > 1e-6)
}

fn lookup(
    parameters: &HashMap<String, HashMap<String, Option<f64>>>,
    name: &str,
    date_key: &str,
) -> Option<f64> {
    observation(parameters.get(name)?.get(date_key).copied().flatten())
}

/// Flatten the per-parameter date maps into daily records.
///
/// Temperature is the anchor: dates come from the T2M map and a record
/// without a usable temperature is dropped, matching how downstream
/// consumers key everything off the mean temperature.
fn parse_power_response(response: &PowerResponse) -> Vec<DailyRecord> {
    let parameters = &response.properties.parameter;
    let temperatures = match parameters.get("T2M") {
        Some(map) => map,
        None => {
            debug!("POWER response has no T2M parameter");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (date_key, value) in temperatures {
        let date = match NaiveDate::parse_from_str(date_key, "%Y%m%d") {
            Ok(date) => date,
            Err(e) => {
                debug!("Skipping unparseable POWER date {}: {}", date_key, e);
                continue;
            }
        };

        let temperature = match observation(*value) {
            Some(t) => t,
            None => continue,
        };

        records.push(DailyRecord {
            date,
            temperature: Some(temperature),
            max_temperature: lookup(parameters, "T2M_MAX", date_key),
            min_temperature: lookup(parameters, "T2M_MIN", date_key),
            precipitation: lookup(parameters, "PRECTOTCORR", date_key)
                .or_else(|| lookup(parameters, "PRECTOT", date_key)),
            wind_speed: lookup(parameters, "WS2M", date_key),
            humidity: lookup(parameters, "RH2M", date_key),
        });
    }

    records.sort_by_key(|r| r.date);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_from(value: serde_json::Value) -> PowerResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_maps_all_parameters() {
        let response = response_from(json!({
            "properties": {
                "parameter": {
                    "T2M": {"20240102": 4.1, "20240101": 3.5},
                    "T2M_MAX": {"20240101": 7.0, "20240102": 8.2},
                    "T2M_MIN": {"20240101": 0.4, "20240102": 1.1},
                    "PRECTOTCORR": {"20240101": 0.0, "20240102": 5.3},
                    "WS2M": {"20240101": 2.4, "20240102": 3.8},
                    "RH2M": {"20240101": 81.0, "20240102": 74.5}
                }
            }
        }));

        let records = parse_power_response(&response);
        assert_eq!(records.len(), 2);
        // Sorted ascending regardless of map ordering
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(records[0].temperature, Some(3.5));
        assert_eq!(records[0].max_temperature, Some(7.0));
        assert_eq!(records[1].precipitation, Some(5.3));
        assert_eq!(records[1].humidity, Some(74.5));
    }

    #[test]
    fn test_parse_falls_back_to_prectot() {
        let response = response_from(json!({
            "properties": {
                "parameter": {
                    "T2M": {"20240101": 3.5},
                    "PRECTOT": {"20240101": 2.2}
                }
            }
        }));

        let records = parse_power_response(&response);
        assert_eq!(records[0].precipitation, Some(2.2));
        assert_eq!(records[0].humidity, None);
    }

    #[test]
    fn test_parse_drops_fill_values() {
        let response = response_from(json!({
            "properties": {
                "parameter": {
                    "T2M": {"20240101": -999.0, "20240102": 4.1},
                    "RH2M": {"20240102": -999.0}
                }
            }
        }));

        let records = parse_power_response(&response);
        // The fill-value temperature drops the whole day
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        // A fill-value observation elsewhere just leaves the field empty
        assert_eq!(records[0].humidity, None);
    }

    #[test]
    fn test_parse_without_temperature_is_empty() {
        let response = response_from(json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20240101": 1.0}
                }
            }
        }));
        assert!(parse_power_response(&response).is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_dates() {
        let response = response_from(json!({
            "properties": {
                "parameter": {
                    "T2M": {"2024-01-01": 3.5, "20240102": 4.1}
                }
            }
        }));
        let records = parse_power_response(&response);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_daily_point_url_shape() {
        let config = UpstreamConfig::default();
        let provider = NasaPowerProvider::new(&config);
        let url = provider
            .daily_point_url(
                "T2M,PRECTOT,WS2M",
                -1.2921,
                36.8219,
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            )
            .unwrap();
        let url = url.to_string();
        assert!(url.starts_with("https://power.larc.nasa.gov/api/temporal/daily/point?"));
        assert!(url.contains("parameters=T2M%2CPRECTOT%2CWS2M"));
        assert!(url.contains("start=20230101"));
        assert!(url.contains("end=20231231"));
        assert!(url.contains("community=AG"));
        assert!(url.contains("format=JSON"));
    }
}
