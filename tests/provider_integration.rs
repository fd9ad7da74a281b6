// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the NASA POWER history provider
//!
//! These tests verify parameter-variant retries, response parsing, and the
//! synthetic fallback using mocked HTTP responses.

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;
use skycast::config::UpstreamConfig;
use skycast::constants::endpoints::{POWER_DAILY_POINT_PATH, POWER_PARAMETER_VARIANTS};
use skycast::providers::nasa_power::NasaPowerProvider;
use skycast::providers::synthetic::synthetic_series;
use skycast::providers::{HistoryProvider, ProviderError};

fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        power_base_url: base_url.to_string(),
        nominatim_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        user_agent: "skycast-tests/0.1".to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A POWER response covering 2024-01-01..03 with the full parameter set
fn full_power_body() -> String {
    json!({
        "properties": {
            "parameter": {
                "T2M": {"20240101": 3.5, "20240102": 4.1, "20240103": 2.8},
                "T2M_MAX": {"20240101": 7.0, "20240102": 8.2, "20240103": 6.1},
                "T2M_MIN": {"20240101": 0.4, "20240102": 1.1, "20240103": -0.6},
                "PRECTOTCORR": {"20240101": 0.0, "20240102": 5.3, "20240103": 1.2},
                "WS2M": {"20240101": 2.4, "20240102": 3.8, "20240103": 4.0},
                "RH2M": {"20240101": 81.0, "20240102": 74.5, "20240103": 79.2}
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_first_variant_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::UrlEncoded(
            "parameters".into(),
            POWER_PARAMETER_VARIANTS[0].into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(full_power_body())
        .create_async()
        .await;

    let provider = NasaPowerProvider::new(&upstream_config(&server.url()));
    let records = provider
        .daily_history(51.5, -0.1, date(2024, 1, 1), date(2024, 1, 3))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, date(2024, 1, 1));
    assert_eq!(records[2].date, date(2024, 1, 3));
    assert_eq!(records[1].temperature, Some(4.1));
    assert_eq!(records[1].precipitation, Some(5.3));
    assert_eq!(records[1].humidity, Some(74.5));
}

#[tokio::test]
async fn test_retries_next_parameter_variant() {
    let mut server = Server::new_async().await;

    // First variant is rejected the way older POWER deployments do
    let rejected = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::UrlEncoded(
            "parameters".into(),
            POWER_PARAMETER_VARIANTS[0].into(),
        ))
        .with_status(422)
        .with_body(r#"{"message": "unknown parameter PRECTOTCORR"}"#)
        .create_async()
        .await;

    // Second variant serves data under the PRECTOT name
    let accepted = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::UrlEncoded(
            "parameters".into(),
            POWER_PARAMETER_VARIANTS[1].into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "properties": {
                    "parameter": {
                        "T2M": {"20240101": 3.5},
                        "PRECTOT": {"20240101": 2.2}
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = NasaPowerProvider::new(&upstream_config(&server.url()));
    let records = provider
        .daily_history(51.5, -0.1, date(2024, 1, 1), date(2024, 1, 1))
        .await
        .unwrap();

    rejected.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].precipitation, Some(2.2));
}

#[tokio::test]
async fn test_empty_parameter_map_tries_next_variant() {
    let mut server = Server::new_async().await;

    // A 200 with no usable records must not end the variant walk
    let empty = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::UrlEncoded(
            "parameters".into(),
            POWER_PARAMETER_VARIANTS[0].into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"properties": {"parameter": {}}}"#)
        .create_async()
        .await;

    let populated = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::UrlEncoded(
            "parameters".into(),
            POWER_PARAMETER_VARIANTS[1].into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "properties": {
                    "parameter": {
                        "T2M": {"20240101": 3.5}
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = NasaPowerProvider::new(&upstream_config(&server.url()));
    let records = provider
        .daily_history(51.5, -0.1, date(2024, 1, 1), date(2024, 1, 1))
        .await
        .unwrap();

    empty.assert_async().await;
    populated.assert_async().await;
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_all_variants_fail_falls_back_to_synthetic() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", POWER_DAILY_POINT_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream broken")
        .expect(POWER_PARAMETER_VARIANTS.len())
        .create_async()
        .await;

    let provider = NasaPowerProvider::new(&upstream_config(&server.url()));
    let records = provider
        .daily_history(-1.2921, 36.8219, date(2024, 1, 1), date(2024, 1, 31))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 31);
    // The fallback is the deterministic synthetic series for this location
    let expected = synthetic_series(-1.2921, 36.8219, date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(records, expected);
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let server = Server::new_async().await;
    let provider = NasaPowerProvider::new(&upstream_config(&server.url()));
    let result = provider
        .daily_history(51.5, -0.1, date(2024, 2, 1), date(2024, 1, 1))
        .await;
    assert!(matches!(result, Err(ProviderError::InvalidRange { .. })));
}
