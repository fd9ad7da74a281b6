// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures shared across the Skycast service: daily weather
//! records (observed or synthetic), forward-looking predictions, geocoding
//! results, and the advisory/summary types returned by the HTTP API.
//!
//! ## Design Principles
//!
//! - **Source Agnostic**: a [`DailyRecord`] looks the same whether it came
//!   from NASA POWER or the synthetic generator
//! - **Sparse Observations**: observed fields are optional; upstream responses
//!   routinely omit parameters or carry fill values
//! - **Dense Predictions**: a [`Prediction`] always carries every field,
//!   rounded to one decimal
//! - **Serializable**: everything crosses the HTTP boundary as JSON

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single day of weather for a point location.
///
/// Produced either by parsing a NASA POWER response or by the synthetic
/// generator. Records are immutable once created and held in date order.
/// Fields are `None` when the upstream omitted the parameter or reported
/// its fill value.
///
/// # Examples
///
/// ```rust
/// use skycast::models::DailyRecord;
/// use chrono::NaiveDate;
///
/// let record = DailyRecord {
///     date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
///     temperature: Some(21.4),
///     max_temperature: Some(26.0),
///     min_temperature: Some(16.8),
///     precipitation: Some(0.0),
///     wind_speed: Some(3.2),
///     humidity: Some(58.0),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Mean temperature at 2 m, degrees Celsius
    pub temperature: Option<f64>,
    /// Daily maximum temperature, degrees Celsius
    pub max_temperature: Option<f64>,
    /// Daily minimum temperature, degrees Celsius
    pub min_temperature: Option<f64>,
    /// Total precipitation, millimetres
    pub precipitation: Option<f64>,
    /// Mean wind speed at 2 m, metres per second
    pub wind_speed: Option<f64>,
    /// Mean relative humidity, percent
    pub humidity: Option<f64>,
}

/// A predicted day of weather, produced only by the prediction engine.
///
/// Unlike [`DailyRecord`], every field is present; the engine applies
/// defaults and clamps before constructing one. Values are rounded to one
/// decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Calendar date the prediction is for
    pub date: NaiveDate,
    /// Predicted mean temperature, degrees Celsius
    pub temperature: f64,
    /// Predicted total precipitation, millimetres (never negative)
    pub precipitation: f64,
    /// Predicted mean wind speed, metres per second
    pub wind_speed: f64,
    /// Predicted daily maximum temperature, degrees Celsius
    pub max_temperature: f64,
    /// Predicted daily minimum temperature, degrees Celsius
    pub min_temperature: f64,
    /// Predicted relative humidity, percent
    pub humidity: f64,
}

/// Result of forward-geocoding a place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Full display name reported by the geocoder
    pub display_name: String,
}

/// User persona the advisory rules are written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Farmer,
    Driver,
    EventOrganizer,
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "driver" => Ok(Self::Driver),
            "event_organizer" | "event-organizer" => Ok(Self::EventOrganizer),
            other => Err(format!(
                "Unknown persona: {}. Supported: farmer, driver, event_organizer",
                other
            )),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Farmer => "farmer",
            Self::Driver => "driver",
            Self::EventOrganizer => "event_organizer",
        };
        write!(f, "{}", name)
    }
}

/// Meteorological season, by calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// All seasons in display order
    pub const ALL: [Season; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// Map a calendar month (1-12) to its season
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3 | 4 | 5 => Self::Spring,
            6 | 7 | 8 => Self::Summer,
            _ => Self::Fall,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated prediction statistics for one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSummary {
    pub season: Season,
    /// Mean of predicted temperatures, degrees Celsius
    pub avg_temperature: f64,
    /// Sum of predicted precipitation, millimetres
    pub total_precipitation: f64,
    /// Days with predicted precipitation above 0.1 mm
    pub rainy_days: usize,
    /// Highest predicted daily maximum, degrees Celsius
    pub max_temperature: f64,
    /// Lowest predicted daily minimum, degrees Celsius
    pub min_temperature: f64,
    /// Number of predictions contributing to this season
    pub prediction_count: usize,
}

/// Weather for one requested day, tagged with where it came from.
///
/// Past dates resolve to a historical record; future dates resolve to a
/// prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum DayOutlook {
    Historical { record: DailyRecord },
    Predicted { prediction: Prediction },
}

impl DayOutlook {
    pub fn is_prediction(&self) -> bool {
        matches!(self, Self::Predicted { .. })
    }

    /// Provenance label used in advisory sentences
    pub fn provenance(&self) -> &'static str {
        match self {
            Self::Historical { .. } => "historical",
            Self::Predicted { .. } => "predicted",
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            Self::Historical { record } => record.temperature.unwrap_or(0.0),
            Self::Predicted { prediction } => prediction.temperature,
        }
    }

    pub fn precipitation(&self) -> f64 {
        match self {
            Self::Historical { record } => record.precipitation.unwrap_or(0.0),
            Self::Predicted { prediction } => prediction.precipitation,
        }
    }

    pub fn wind_speed(&self) -> f64 {
        match self {
            Self::Historical { record } => record.wind_speed.unwrap_or(0.0),
            Self::Predicted { prediction } => prediction.wind_speed,
        }
    }
}

/// Advisory sentences for one persona
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    /// Guidance for the next seven days
    pub immediate: Vec<String>,
    /// Guidance derived from the seasonal rollups
    pub seasonal: Vec<String>,
    /// Guidance for the specifically requested day, if any
    pub specific_day: Vec<String>,
}

/// Round to one decimal place, the precision every API response uses
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
