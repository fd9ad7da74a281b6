// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Seasonal rollups of a prediction run

use crate::constants::tuning::RAINY_DAY_THRESHOLD_MM;
use crate::models::{round1, Prediction, Season, SeasonalSummary};
use chrono::Datelike;

/// Aggregate predictions into one summary per season that has any.
///
/// Seasons come back in calendar order (winter, spring, summer, fall);
/// seasons with no contributing predictions are omitted.
pub fn seasonal_summaries(predictions: &[Prediction]) -> Vec<SeasonalSummary> {
    Season::ALL
        .iter()
        .filter_map(|&season| summarize_season(season, predictions))
        .collect()
}

fn summarize_season(season: Season, predictions: &[Prediction]) -> Option<SeasonalSummary> {
    let in_season: Vec<&Prediction> = predictions
        .iter()
        .filter(|p| Season::from_month(p.date.month()) == season)
        .collect();

    if in_season.is_empty() {
        return None;
    }

    let count = in_season.len();
    let avg_temperature = in_season.iter().map(|p| p.temperature).sum::<f64>() / count as f64;
    let total_precipitation = in_season.iter().map(|p| p.precipitation).sum::<f64>();
    let rainy_days = in_season
        .iter()
        .filter(|p| p.precipitation > RAINY_DAY_THRESHOLD_MM)
        .count();
    let max_temperature = in_season
        .iter()
        .map(|p| p.max_temperature)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_temperature = in_season
        .iter()
        .map(|p| p.min_temperature)
        .fold(f64::INFINITY, f64::min);

    Some(SeasonalSummary {
        season,
        avg_temperature: round1(avg_temperature),
        total_precipitation: round1(total_precipitation),
        rainy_days,
        max_temperature: round1(max_temperature),
        min_temperature: round1(min_temperature),
        prediction_count: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prediction(y: i32, m: u32, d: u32, temperature: f64, precipitation: f64) -> Prediction {
        Prediction {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            temperature,
            precipitation,
            wind_speed: 3.0,
            max_temperature: temperature + 4.0,
            min_temperature: temperature - 4.0,
            humidity: 60.0,
        }
    }

    #[test]
    fn test_summaries_group_by_season() {
        let predictions = vec![
            prediction(2026, 1, 10, 2.0, 0.0),
            prediction(2026, 1, 11, 4.0, 3.0),
            prediction(2026, 4, 1, 12.0, 1.0),
        ];

        let summaries = seasonal_summaries(&predictions);
        assert_eq!(summaries.len(), 2);

        let winter = &summaries[0];
        assert_eq!(winter.season, Season::Winter);
        assert_eq!(winter.prediction_count, 2);
        assert_eq!(winter.avg_temperature, 3.0);
        assert_eq!(winter.total_precipitation, 3.0);
        assert_eq!(winter.rainy_days, 1);
        assert_eq!(winter.max_temperature, 8.0);
        assert_eq!(winter.min_temperature, -2.0);

        assert_eq!(summaries[1].season, Season::Spring);
    }

    #[test]
    fn test_december_counts_as_winter() {
        let predictions = vec![prediction(2026, 12, 25, -1.0, 0.0)];
        let summaries = seasonal_summaries(&predictions);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].season, Season::Winter);
    }

    #[test]
    fn test_no_predictions_no_summaries() {
        assert!(seasonal_summaries(&[]).is_empty());
    }

    #[test]
    fn test_trace_rain_is_not_a_rainy_day() {
        let predictions = vec![prediction(2026, 7, 1, 25.0, 0.1)];
        let summaries = seasonal_summaries(&predictions);
        assert_eq!(summaries[0].rainy_days, 0);
    }
}
