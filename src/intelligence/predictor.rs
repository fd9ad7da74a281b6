// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Similar-day weather prediction.
//!
//! For each future day, historical records whose day-of-year falls within a
//! circular window are blended with distance-based weights. Days with too few
//! candidates fall back to a closed-form seasonal climate draw. The history
//! itself comes from a [`HistoryProvider`], which never fails fatally, so a
//! prediction run always yields exactly the requested horizon.

use crate::constants::tuning::{
    HISTORY_DAYS, MAX_HORIZON_DAYS, MIN_SIMILAR_DAYS, SIMILAR_DAY_WINDOW, YEAR_DAYS,
};
use crate::logging::AppLogger;
use crate::models::{round1, DailyRecord, DayOutlook, Prediction};
use crate::providers::{HistoryProvider, ProviderError};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal, Weibull};
use std::sync::Arc;
use tracing::debug;

/// One raw climate draw before rounding: (temperature, precipitation,
/// wind speed, humidity)
type ClimateDraw = (f64, f64, f64, f64);

pub struct WeatherPredictor {
    history: Arc<dyn HistoryProvider>,
    history_days: i64,
    rng_seed: Option<u64>,
}

impl WeatherPredictor {
    pub fn new(history: Arc<dyn HistoryProvider>) -> Self {
        Self {
            history,
            history_days: HISTORY_DAYS,
            rng_seed: None,
        }
    }

    /// Override the trailing history window
    pub fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days;
        self
    }

    /// Fix the jitter RNG, for reproducible runs
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Predict daily weather for `horizon_days` days following the last
    /// historical observation (or following today, when no history exists)
    pub async fn predict(
        &self,
        latitude: f64,
        longitude: f64,
        horizon_days: usize,
    ) -> Result<Vec<Prediction>, ProviderError> {
        let today = Utc::now().date_naive();
        let start = today - Duration::days(self.history_days);

        let history = self
            .history
            .daily_history(latitude, longitude, start, today)
            .await?;

        let mut rng = self.rng();
        let (predictions, fallback_days) = if history.is_empty() {
            debug!("No historical records, predicting from climate alone");
            (
                basic_predictions(latitude, today, horizon_days, &mut rng),
                horizon_days,
            )
        } else {
            predict_from_history(latitude, &history, horizon_days, &mut rng)
        };

        AppLogger::log_prediction_run(
            latitude,
            longitude,
            horizon_days,
            history.len(),
            fallback_days,
        );
        Ok(predictions)
    }

    /// Weather for one specific day: history for past dates, a prediction
    /// for future ones. `None` when the date is beyond the horizon.
    pub async fn day_outlook(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Option<DayOutlook>, ProviderError> {
        let today = Utc::now().date_naive();

        if date <= today {
            let records = self
                .history
                .daily_history(latitude, longitude, date, date)
                .await?;
            Ok(records
                .into_iter()
                .next()
                .map(|record| DayOutlook::Historical { record }))
        } else {
            let predictions = self.predict(latitude, longitude, MAX_HORIZON_DAYS).await?;
            Ok(predictions
                .into_iter()
                .find(|p| p.date == date)
                .map(|prediction| DayOutlook::Predicted { prediction }))
        }
    }
}

/// Circular distance between two days of year, wrapping across new year.
/// Symmetric, and never larger than half the year (182).
pub fn circular_day_distance(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b);
    diff.min(YEAR_DAYS as u32 - diff)
}

/// Historical records within the similarity window of a target day of year,
/// paired with their circular distance
fn similar_candidates(history: &[DailyRecord], target: u32) -> Vec<(&DailyRecord, u32)> {
    history
        .iter()
        .filter_map(|record| {
            let distance = circular_day_distance(record.date.ordinal(), target);
            (distance <= SIMILAR_DAY_WINDOW).then_some((record, distance))
        })
        .collect()
}

/// Distance-weighted mean of one field across candidate records.
///
/// Weight is `1/(1+distance)`. An empty candidate set yields 0 rather than
/// dividing by zero; a missing observation contributes 0 at full weight.
fn weighted_mean<F>(candidates: &[(&DailyRecord, u32)], field: F) -> f64
where
    F: Fn(&DailyRecord) -> Option<f64>,
{
    if candidates.is_empty() {
        return 0.0;
    }

    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    for (record, distance) in candidates {
        let weight = 1.0 / (1.0 + *distance as f64);
        total_weight += weight;
        weighted_sum += field(record).unwrap_or(0.0) * weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// Closed-form climate draw for a day of year at a latitude
fn climate_fallback(latitude: f64, day_of_year: u32, rng: &mut StdRng) -> ClimateDraw {
    use crate::providers::synthetic::{base_temperature, seasonal_swing};

    let temp_noise = Normal::new(0.0, 3.0).expect("valid distribution parameters");
    let temperature =
        base_temperature(latitude) + seasonal_swing(latitude, day_of_year) + temp_noise.sample(rng);

    let precip_prob = if latitude.abs() < 30.0 { 0.4 } else { 0.3 };
    let precipitation = if rng.gen::<f64>() < precip_prob {
        Exp::new(2.0)
            .expect("valid distribution parameters")
            .sample(rng)
    } else {
        0.0
    };

    let wind_speed = Weibull::new(3.0, 1.8)
        .expect("valid distribution parameters")
        .sample(rng);
    let humidity = rng.gen_range(40.0..80.0);

    (temperature, precipitation, wind_speed, humidity)
}

/// Per-day prediction loop over a non-empty history
fn predict_from_history(
    latitude: f64,
    history: &[DailyRecord],
    horizon_days: usize,
    rng: &mut StdRng,
) -> (Vec<Prediction>, usize) {
    let temp_jitter = Normal::new(0.0, 1.5).expect("valid distribution parameters");
    let precip_jitter = Normal::new(0.0, 0.8).expect("valid distribution parameters");
    let wind_jitter = Normal::new(0.0, 0.5).expect("valid distribution parameters");
    let humidity_jitter = Normal::new(0.0, 5.0).expect("valid distribution parameters");

    // History arrives date-ordered; the horizon starts after its last day
    let last_date = history[history.len() - 1].date;
    let mut predictions = Vec::with_capacity(horizon_days);
    let mut fallback_days = 0;

    for offset in 1..=horizon_days {
        let date = last_date + Duration::days(offset as i64);
        let day_of_year = date.ordinal();

        let candidates = similar_candidates(history, day_of_year);

        let (temperature, precipitation, wind_speed, humidity) =
            if candidates.len() >= MIN_SIMILAR_DAYS {
                let temperature =
                    weighted_mean(&candidates, |r| r.temperature) + temp_jitter.sample(rng);
                let precipitation = (weighted_mean(&candidates, |r| r.precipitation)
                    + precip_jitter.sample(rng))
                .max(0.0);
                let wind_speed =
                    (weighted_mean(&candidates, |r| r.wind_speed) + wind_jitter.sample(rng))
                        .max(0.1);
                let humidity = (weighted_mean(&candidates, |r| r.humidity)
                    + humidity_jitter.sample(rng))
                .clamp(20.0, 95.0);
                (temperature, precipitation, wind_speed, humidity)
            } else {
                fallback_days += 1;
                climate_fallback(latitude, day_of_year, rng)
            };

        let spread_up = rng.gen_range(2.0..6.0);
        let spread_down = rng.gen_range(2.0..6.0);

        predictions.push(Prediction {
            date,
            temperature: round1(temperature),
            precipitation: round1(precipitation.max(0.0)),
            wind_speed: round1(wind_speed.max(0.1)),
            max_temperature: round1(temperature + spread_up),
            min_temperature: round1(temperature - spread_down),
            humidity: round1(humidity),
        });
    }

    (predictions, fallback_days)
}

/// Climate-only predictions for the days following `today`, used when no
/// history at all is available
fn basic_predictions(
    latitude: f64,
    today: NaiveDate,
    horizon_days: usize,
    rng: &mut StdRng,
) -> Vec<Prediction> {
    let mut predictions = Vec::with_capacity(horizon_days);

    for offset in 1..=horizon_days {
        let date = today + Duration::days(offset as i64);
        let (temperature, precipitation, wind_speed, humidity) =
            climate_fallback(latitude, date.ordinal(), rng);

        predictions.push(Prediction {
            date,
            temperature: round1(temperature),
            precipitation: round1(precipitation),
            wind_speed: round1(wind_speed),
            max_temperature: round1(temperature + 4.0),
            min_temperature: round1(temperature - 4.0),
            humidity: round1(humidity),
        });
    }

    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate, temperature: f64) -> DailyRecord {
        DailyRecord {
            date,
            temperature: Some(temperature),
            max_temperature: None,
            min_temperature: None,
            precipitation: Some(0.0),
            wind_speed: Some(3.0),
            humidity: Some(60.0),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_circular_distance_wraps_across_new_year() {
        // Dec 27 (361) and Jan 5 (5) are nine days apart, not 356
        assert_eq!(circular_day_distance(361, 5), 9);
        assert_eq!(circular_day_distance(5, 361), 9);
    }

    #[test]
    fn test_circular_distance_is_symmetric_and_bounded() {
        for a in (1..=366).step_by(7) {
            for b in (1..=366).step_by(11) {
                let forward = circular_day_distance(a, b);
                let backward = circular_day_distance(b, a);
                assert_eq!(forward, backward);
                assert!(forward <= 182, "distance {} for ({}, {})", forward, a, b);
            }
        }
    }

    #[test]
    fn test_circular_distance_zero_for_same_day() {
        assert_eq!(circular_day_distance(100, 100), 0);
    }

    #[test]
    fn test_weighted_mean_empty_is_zero() {
        let candidates: Vec<(&DailyRecord, u32)> = Vec::new();
        assert_eq!(weighted_mean(&candidates, |r| r.temperature), 0.0);
    }

    #[test]
    fn test_weighted_mean_favors_closer_days() {
        let near = record(date(2023, 6, 15), 10.0);
        let far = record(date(2023, 6, 25), 0.0);
        let candidates = vec![(&near, 0u32), (&far, 10u32)];

        let mean = weighted_mean(&candidates, |r| r.temperature);
        // weights 1 and 1/11: mean = 10 / (1 + 1/11) ~= 9.17
        assert!((mean - 9.17).abs() < 0.01);
    }

    #[test]
    fn test_weighted_mean_missing_field_counts_as_zero() {
        let with_humidity = record(date(2023, 6, 15), 10.0);
        let mut without_humidity = record(date(2023, 6, 16), 10.0);
        without_humidity.humidity = None;
        let candidates = vec![(&with_humidity, 0u32), (&without_humidity, 0u32)];

        let mean = weighted_mean(&candidates, |r| r.humidity);
        assert!((mean - 30.0).abs() < 1e-9); // (60 + 0) / 2
    }

    #[test]
    fn test_similar_candidates_window() {
        let history = vec![
            record(date(2023, 6, 10), 18.0), // doy 161
            record(date(2023, 6, 20), 20.0), // doy 171
            record(date(2023, 7, 5), 24.0),  // doy 186
        ];
        // Target June 15 (doy 166): July 5 is 20 days out, beyond the window
        let candidates = similar_candidates(&history, 166);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|(_, d)| *d <= SIMILAR_DAY_WINDOW));
    }

    #[test]
    fn test_climate_fallback_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for doy in [1, 91, 182, 274, 365] {
            let (temperature, precipitation, wind_speed, humidity) =
                climate_fallback(48.8, doy, &mut rng);
            assert!(precipitation >= 0.0);
            assert!(wind_speed >= 0.0);
            assert!((40.0..80.0).contains(&humidity));
            // base 11.84 +/- 10 seasonal +/- noise
            assert!((-15.0..40.0).contains(&temperature));
        }
    }

    #[test]
    fn test_predict_from_history_counts_fallback_days() {
        // Five same-season records: below the similar-day minimum everywhere
        let history: Vec<DailyRecord> = (10..15)
            .map(|d| record(date(2023, 6, d), 20.0))
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        let (predictions, fallback_days) = predict_from_history(45.0, &history, 10, &mut rng);
        assert_eq!(predictions.len(), 10);
        assert_eq!(fallback_days, 10);
    }

    #[test]
    fn test_predict_from_history_uses_similar_days_when_dense() {
        // Three years of the same week gives plenty of candidates
        let mut history = Vec::new();
        for year in [2021, 2022, 2023] {
            for day in 10..=20 {
                history.push(record(date(year, 6, day), 20.0));
            }
        }
        history.sort_by_key(|r| r.date);

        let mut rng = StdRng::seed_from_u64(1);
        let (predictions, fallback_days) = predict_from_history(45.0, &history, 3, &mut rng);
        assert_eq!(predictions.len(), 3);
        assert_eq!(fallback_days, 0);
        // Blended around 20 C with sigma-1.5 jitter
        for p in &predictions {
            assert!((p.temperature - 20.0).abs() < 8.0);
            assert!(p.max_temperature > p.temperature);
            assert!(p.min_temperature < p.temperature);
        }
    }
}
