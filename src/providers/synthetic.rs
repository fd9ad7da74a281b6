// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Synthetic daily weather generation.
//!
//! Stands in for the NASA POWER API when it is unreachable. The series is a
//! latitude-driven seasonal sinusoid with noise, deterministic per coordinate
//! pair so repeated requests for the same location agree with each other.

use crate::models::{round1, DailyRecord};
use crate::providers::{HistoryProvider, ProviderError};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use sha2::{Digest, Sha256};
use std::f64::consts::TAU;
use tracing::debug;

use crate::constants::tuning::YEAR_DAYS;

/// History provider backed entirely by the synthetic generator
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryProvider for SyntheticProvider {
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
        Ok(synthetic_series(latitude, longitude, start, end))
    }

    fn provider_name(&self) -> &'static str {
        "synthetic"
    }
}

/// Seed derived from the coordinate pair, so the series is stable per location
fn coordinate_seed(latitude: f64, longitude: f64) -> u64 {
    let digest = Sha256::digest(format!("{}_{}", latitude, longitude).as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Latitude-driven base temperature shared with the prediction fallback
pub(crate) fn base_temperature(latitude: f64) -> f64 {
    25.0 - (latitude.abs() - 30.0) * 0.7
}

/// Seasonal temperature swing for a day of year. The phase anchor flips
/// between hemispheres: day 80 peaks northern summer, day 265 southern.
pub(crate) fn seasonal_swing(latitude: f64, day_of_year: u32) -> f64 {
    let anchor = if latitude < 0.0 { 265.0 } else { 80.0 };
    10.0 * (TAU * (day_of_year as f64 - anchor) / YEAR_DAYS).sin()
}

/// Generate a daily series for `[start, end]`, deterministic per `(lat, lon)`
pub fn synthetic_series(
    latitude: f64,
    longitude: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyRecord> {
    let mut rng = StdRng::seed_from_u64(coordinate_seed(latitude, longitude));

    let temp_noise = Normal::new(0.0, 4.0).expect("valid distribution parameters");
    let rain_amount = Normal::new(2.0_f64, 3.0).expect("valid distribution parameters");
    let wind_speed = Normal::new(3.0 + latitude.abs() * 0.1, 2.0)
        .expect("valid distribution parameters");
    let humidity = Normal::new(60.0 + (30.0 - latitude.abs()) * 0.5, 15.0)
        .expect("valid distribution parameters");

    let mut records = Vec::new();
    let mut current = start;

    while current <= end {
        let day_of_year = current.ordinal();

        let noise = temp_noise.sample(&mut rng);
        let core = base_temperature(latitude) + seasonal_swing(latitude, day_of_year) + noise;
        let max_temp = core + 6.0;
        let min_temp = core - 6.0;
        let mean_temp = (max_temp + min_temp) / 2.0;

        // Wet-day probability follows its own seasonal phase per latitude band
        let precip_prob = if latitude.abs() < 30.0 {
            0.4 + 0.2 * (TAU * (day_of_year as f64 - 200.0) / YEAR_DAYS).sin()
        } else {
            0.3 + 0.3 * (TAU * (day_of_year as f64 - 170.0) / YEAR_DAYS).sin()
        };
        let precipitation = if rng.gen::<f64>() < precip_prob {
            rain_amount.sample(&mut rng).max(0.0)
        } else {
            0.0
        };

        let wind = wind_speed.sample(&mut rng).max(0.0);
        let relative_humidity = humidity.sample(&mut rng).clamp(30.0, 95.0);

        records.push(DailyRecord {
            date: current,
            temperature: Some(round1(mean_temp)),
            max_temperature: Some(round1(max_temp)),
            min_temperature: Some(round1(min_temp)),
            precipitation: Some(round1(precipitation)),
            wind_speed: Some(round1(wind)),
            humidity: Some(round1(relative_humidity)),
        });

        current += Duration::days(1);
    }

    debug!(
        "Generated {} days of synthetic data for ({:.4}, {:.4})",
        records.len(),
        latitude,
        longitude
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_covers_full_range() {
        let records = synthetic_series(51.5, -0.1, date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(records.len(), 31);
        assert_eq!(records[0].date, date(2024, 1, 1));
        assert_eq!(records[30].date, date(2024, 1, 31));
    }

    #[test]
    fn test_series_is_deterministic_per_location() {
        let first = synthetic_series(-1.2921, 36.8219, date(2023, 6, 1), date(2023, 8, 31));
        let second = synthetic_series(-1.2921, 36.8219, date(2023, 6, 1), date(2023, 8, 31));
        assert_eq!(first, second);
    }

    #[test]
    fn test_series_differs_between_locations() {
        let nairobi = synthetic_series(-1.2921, 36.8219, date(2023, 6, 1), date(2023, 6, 30));
        let london = synthetic_series(51.5074, -0.1278, date(2023, 6, 1), date(2023, 6, 30));
        assert_ne!(nairobi, london);
    }

    #[test]
    fn test_values_respect_clamps() {
        let records = synthetic_series(10.0, 100.0, date(2023, 1, 1), date(2023, 12, 31));
        for record in &records {
            assert!(record.precipitation.unwrap() >= 0.0);
            assert!(record.wind_speed.unwrap() >= 0.0);
            let humidity = record.humidity.unwrap();
            assert!((30.0..=95.0).contains(&humidity));
            let spread = record.max_temperature.unwrap() - record.min_temperature.unwrap();
            assert!((spread - 12.0).abs() < 0.11); // fixed +/-6 spread up to rounding
        }
    }

    #[test]
    fn test_hemisphere_phase_flip() {
        // Mid-July is warm in the north, cool in the south
        assert!(seasonal_swing(45.0, 196) > 5.0);
        assert!(seasonal_swing(-45.0, 196) < -5.0);
    }

    #[tokio::test]
    async fn test_provider_rejects_inverted_range() {
        let provider = SyntheticProvider::new();
        let result = provider
            .daily_history(0.0, 0.0, date(2024, 2, 1), date(2024, 1, 1))
            .await;
        assert!(matches!(result, Err(ProviderError::InvalidRange { .. })));
    }
}
