// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-based advisory text per user persona.
//!
//! Plain threshold branches over the next week of predictions, the seasonal
//! rollups, and an optional specifically requested day. No state, no scoring;
//! the sentences are the product.

use crate::models::{Advisory, DayOutlook, Persona, Prediction, SeasonalSummary};

/// Aggregates over the advisory week window
struct WeekStats {
    avg_temperature: f64,
    total_precipitation: f64,
    rainy_days: usize,
    max_temperature: f64,
    min_temperature: f64,
}

impl WeekStats {
    fn from_predictions(week: &[Prediction]) -> Self {
        let count = week.len() as f64;
        Self {
            avg_temperature: week.iter().map(|p| p.temperature).sum::<f64>() / count,
            total_precipitation: week.iter().map(|p| p.precipitation).sum::<f64>(),
            rainy_days: week.iter().filter(|p| p.precipitation > 1.0).count(),
            max_temperature: week
                .iter()
                .map(|p| p.temperature)
                .fold(f64::NEG_INFINITY, f64::max),
            min_temperature: week
                .iter()
                .map(|p| p.temperature)
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Generates persona advisories from predictions and rollups
pub struct AdvisoryEngine;

impl AdvisoryEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn advise(
        &self,
        persona: Persona,
        predictions: &[Prediction],
        seasons: &[SeasonalSummary],
        specific_day: Option<&DayOutlook>,
    ) -> Advisory {
        if predictions.is_empty() {
            return Advisory {
                immediate: vec!["No prediction data available".to_string()],
                ..Advisory::default()
            };
        }

        let week = &predictions[..predictions.len().min(7)];
        let stats = WeekStats::from_predictions(week);

        Advisory {
            immediate: immediate_advice(persona, week, &stats),
            seasonal: seasonal_advice(persona, seasons),
            specific_day: specific_day
                .map(|outlook| specific_day_advice(persona, outlook))
                .unwrap_or_default(),
        }
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn immediate_advice(persona: Persona, week: &[Prediction], stats: &WeekStats) -> Vec<String> {
    let mut advice = Vec::new();

    match persona {
        Persona::Farmer => {
            if stats.avg_temperature > 15.0 && stats.total_precipitation > 10.0 {
                advice.push("Good planting conditions this week".to_string());
            } else if stats.avg_temperature < 10.0 {
                advice.push("Wait for warmer weather before planting".to_string());
            }

            if stats.total_precipitation < 5.0 {
                advice.push("Consider irrigation due to low rainfall".to_string());
            } else if stats.rainy_days > 3 {
                advice.push("Good natural irrigation this week".to_string());
            }

            if stats.max_temperature > 35.0 {
                advice.push("Extreme heat warning - protect crops".to_string());
            }
            if stats.min_temperature < 5.0 {
                advice.push("Frost risk - protect sensitive plants".to_string());
            }
        }
        Persona::Driver => {
            if stats.rainy_days > 2 {
                advice.push("Expect wet roads - drive carefully".to_string());
            }
            if stats.max_temperature > 35.0 {
                advice.push("Extreme heat expected - check vehicle cooling system".to_string());
            }
            if stats.min_temperature < 5.0 {
                advice.push("Risk of frost on roads and bridges".to_string());
            }
            if week.iter().any(|p| p.wind_speed > 10.0) {
                advice.push("Windy conditions expected - be cautious".to_string());
            }
        }
        Persona::EventOrganizer => {
            let dry_days = week.iter().filter(|p| p.precipitation < 1.0).count();
            let comfortable_days = week
                .iter()
                .filter(|p| (15.0..=30.0).contains(&p.temperature))
                .count();

            if dry_days >= 5 {
                advice.push("Good week for outdoor events".to_string());
            } else {
                advice.push("Consider rain contingency plans".to_string());
            }

            if comfortable_days >= 4 {
                advice.push("Most days have comfortable temperatures".to_string());
            }
        }
    }

    advice
}

fn seasonal_advice(persona: Persona, seasons: &[SeasonalSummary]) -> Vec<String> {
    let mut advice = Vec::new();
    if seasons.is_empty() {
        return advice;
    }

    let wettest = seasons
        .iter()
        .max_by(|a, b| a.total_precipitation.total_cmp(&b.total_precipitation));
    let hottest = seasons
        .iter()
        .max_by(|a, b| a.avg_temperature.total_cmp(&b.avg_temperature));
    let driest = seasons
        .iter()
        .min_by(|a, b| a.total_precipitation.total_cmp(&b.total_precipitation));

    match persona {
        Persona::Farmer => {
            if let Some(season) = wettest {
                advice.push(format!(
                    "Heaviest rainfall expected in {} ({:.1} mm) - plan drainage and sowing around it",
                    season.season, season.total_precipitation
                ));
            }
            if let Some(season) = hottest {
                if season.max_temperature > 30.0 {
                    advice.push(format!(
                        "Highest heat load in {} - plan irrigation capacity",
                        season.season
                    ));
                }
            }
        }
        Persona::Driver => {
            if let Some(season) = wettest {
                if season.rainy_days > 0 {
                    advice.push(format!(
                        "Expect the most wet-road days in {} ({} rainy days)",
                        season.season, season.rainy_days
                    ));
                }
            }
        }
        Persona::EventOrganizer => {
            if let Some(season) = driest {
                advice.push(format!(
                    "{} has the least rain in the outlook - best bet for outdoor bookings",
                    season.season
                ));
            }
        }
    }

    advice
}

fn specific_day_advice(persona: Persona, outlook: &DayOutlook) -> Vec<String> {
    let mut advice = Vec::new();
    let provenance = outlook.provenance();
    let temperature = outlook.temperature();
    let precipitation = outlook.precipitation();
    let wind_speed = outlook.wind_speed();

    match persona {
        Persona::Farmer => {
            if temperature > 15.0 && precipitation > 5.0 {
                advice.push(format!(
                    "Based on {} data: Good day for field work",
                    provenance
                ));
            } else if precipitation > 10.0 {
                advice.push(format!(
                    "Based on {} data: Heavy rain expected - postpone outdoor work",
                    provenance
                ));
            } else if temperature > 35.0 {
                advice.push(format!(
                    "Based on {} data: Extreme heat - protect crops and workers",
                    provenance
                ));
            }
        }
        Persona::Driver => {
            if precipitation > 5.0 {
                advice.push(format!(
                    "Based on {} data: Wet road conditions expected",
                    provenance
                ));
            }
            if temperature > 35.0 {
                advice.push(format!(
                    "Based on {} data: Extreme heat - check vehicle fluids",
                    provenance
                ));
            }
            if wind_speed > 15.0 {
                advice.push(format!(
                    "Based on {} data: Strong winds - be cautious on open roads",
                    provenance
                ));
            }
        }
        Persona::EventOrganizer => {
            if precipitation < 1.0 && (15.0..=30.0).contains(&temperature) {
                advice.push(format!(
                    "Based on {} data: Perfect weather for outdoor events",
                    provenance
                ));
            } else if precipitation > 5.0 {
                advice.push(format!(
                    "Based on {} data: Rain expected - consider indoor venue",
                    provenance
                ));
            } else if temperature > 32.0 {
                advice.push(format!(
                    "Based on {} data: Hot weather - provide shade and water",
                    provenance
                ));
            }
        }
    }

    advice
}
