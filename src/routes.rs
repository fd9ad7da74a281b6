// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP request handlers for the forecast API

use crate::config::ForecastConfig;
use crate::geocode::GeocodingService;
use crate::intelligence::{seasonal_summaries, AdvisoryEngine, WeatherPredictor};
use crate::models::{Advisory, DayOutlook, GeocodedLocation, Persona, Prediction, SeasonalSummary};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    /// Free-text place name, e.g. "Nairobi, Kenya"
    pub location: String,
    /// Prediction horizon in days; clamped to the configured maximum
    pub days: Option<usize>,
    /// Persona the advisory rules are written for
    pub persona: Option<String>,
    /// ISO date (YYYY-MM-DD) to resolve a specific-day outlook for
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub location: GeocodedLocation,
    pub predictions: Vec<Prediction>,
    pub seasonal_summaries: Vec<SeasonalSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_outlook: Option<DayOutlook>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub struct ForecastRoutes {
    geocoder: Arc<GeocodingService>,
    predictor: Arc<WeatherPredictor>,
    advisor: AdvisoryEngine,
    config: ForecastConfig,
}

impl ForecastRoutes {
    pub fn new(
        geocoder: Arc<GeocodingService>,
        predictor: Arc<WeatherPredictor>,
        config: ForecastConfig,
    ) -> Self {
        Self {
            geocoder,
            predictor,
            advisor: AdvisoryEngine::new(),
            config,
        }
    }

    /// Handle a forecast request end to end: geocode, predict, summarize,
    /// advise
    pub async fn forecast(&self, request: ForecastRequest) -> Result<ForecastResponse> {
        if request.location.trim().is_empty() {
            return Err(anyhow::anyhow!("Location must not be empty"));
        }

        let persona = request
            .persona
            .as_deref()
            .map(|p| p.parse::<Persona>().map_err(|e| anyhow::anyhow!(e)))
            .transpose()?;

        let specific_date = request
            .date
            .as_deref()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", d))
            })
            .transpose()?;

        let horizon_days = self.clamp_horizon(request.days);

        info!(
            "Forecast request for '{}' ({} days)",
            request.location, horizon_days
        );

        let location = self
            .geocoder
            .geocode(&request.location)
            .await
            .with_context(|| format!("Could not geocode location '{}'", request.location))?;

        let predictions = self
            .predictor
            .predict(location.latitude, location.longitude, horizon_days)
            .await
            .context("Prediction run failed")?;

        let seasonal = seasonal_summaries(&predictions);

        let day_outlook = match specific_date {
            Some(date) => self
                .predictor
                .day_outlook(location.latitude, location.longitude, date)
                .await
                .context("Specific-day lookup failed")?,
            None => None,
        };

        let advisory = persona.map(|persona| {
            self.advisor
                .advise(persona, &predictions, &seasonal, day_outlook.as_ref())
        });

        Ok(ForecastResponse {
            location,
            predictions,
            seasonal_summaries: seasonal,
            advisory,
            day_outlook,
        })
    }

    /// Geocode passthrough, a debugging aid
    pub async fn geocode(&self, query: &str) -> Result<GeocodedLocation> {
        if query.trim().is_empty() {
            return Err(anyhow::anyhow!("Query must not be empty"));
        }
        self.geocoder
            .geocode(query)
            .await
            .with_context(|| format!("Could not geocode location '{}'", query))
    }

    fn clamp_horizon(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.default_horizon_days)
            .clamp(1, self.config.max_horizon_days)
    }
}
