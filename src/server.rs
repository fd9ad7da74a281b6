// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! warp-based HTTP server for the forecast API

use crate::geocode::GeocodeError;
use crate::health::HealthChecker;
use crate::providers::ProviderError;
use crate::routes::{ForecastRequest, ForecastRoutes};
use anyhow::Result;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::Filter;

/// Custom rejection carrying a status and JSON body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl warp::reject::Reject for ApiError {}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    q: String,
}

pub struct HttpServer {
    routes: Arc<ForecastRoutes>,
    health: Arc<HealthChecker>,
}

impl HttpServer {
    pub fn new(routes: ForecastRoutes, health: HealthChecker) -> Self {
        Self {
            routes: Arc::new(routes),
            health: Arc::new(health),
        }
    }

    /// Run the HTTP server until shutdown
    pub async fn run(self, port: u16) -> Result<()> {
        info!("HTTP server starting on port {}", port);

        // CORS configuration
        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST", "OPTIONS"]);

        // Forecast endpoint
        let forecast = warp::path("forecast")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and_then({
                let routes = self.routes.clone();
                move |request: ForecastRequest| {
                    let routes = routes.clone();
                    async move {
                        match routes.forecast(request).await {
                            Ok(response) => Ok(warp::reply::json(&response)),
                            Err(e) => Err(warp::reject::custom(api_error(&e))),
                        }
                    }
                }
            });

        // Geocode passthrough endpoint
        let geocode = warp::path("geocode")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<GeocodeQuery>())
            .and_then({
                let routes = self.routes.clone();
                move |query: GeocodeQuery| {
                    let routes = routes.clone();
                    async move {
                        match routes.geocode(&query.q).await {
                            Ok(location) => Ok(warp::reply::json(&location)),
                            Err(e) => Err(warp::reject::custom(api_error(&e))),
                        }
                    }
                }
            });

        // Health check endpoints
        let basic_health = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and_then({
                let health = self.health.clone();
                move || {
                    let health = health.clone();
                    async move {
                        Ok::<_, warp::Rejection>(warp::reply::json(&health.basic_health().await))
                    }
                }
            });

        let detailed_health = warp::path!("health" / "detailed")
            .and(warp::get())
            .and_then({
                let health = self.health.clone();
                move || {
                    let health = health.clone();
                    async move {
                        Ok::<_, warp::Rejection>(warp::reply::json(
                            &health.comprehensive_health().await,
                        ))
                    }
                }
            });

        let routes = forecast
            .or(geocode)
            .or(detailed_health)
            .or(basic_health)
            .with(cors)
            .recover(handle_rejection);

        info!("HTTP server ready on port {}", port);
        warp::serve(routes).run(([127, 0, 0, 1], port)).await;

        Ok(())
    }
}

/// Map a handler error onto an HTTP status: upstream transport problems are
/// 502, everything else is the caller's fault
fn api_error(err: &anyhow::Error) -> ApiError {
    let status = match err.root_cause() {
        cause if cause.downcast_ref::<ProviderError>().is_some() => StatusCode::BAD_GATEWAY,
        cause => match cause.downcast_ref::<GeocodeError>() {
            Some(GeocodeError::Network(_)) | Some(GeocodeError::UpstreamStatus(_)) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::BAD_REQUEST,
        },
    };

    ApiError {
        status,
        body: serde_json::json!({
            "error": err.root_cause().to_string(),
            "message": err.to_string(),
        }),
    }
}

async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(api_error) = err.find::<ApiError>() {
        let json = warp::reply::json(&api_error.body);
        Ok(warp::reply::with_status(json, api_error.status))
    } else if err.is_not_found() {
        let json = warp::reply::json(&serde_json::json!({
            "error": "not_found",
            "message": "Endpoint not found",
        }));
        Ok(warp::reply::with_status(json, StatusCode::NOT_FOUND))
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        let json = warp::reply::json(&serde_json::json!({
            "error": "bad_request",
            "message": "Invalid request body",
        }));
        Ok(warp::reply::with_status(json, StatusCode::BAD_REQUEST))
    } else {
        let json = warp::reply::json(&serde_json::json!({
            "error": "internal",
            "message": "Internal server error",
        }));
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_geocode_miss_to_bad_request() {
        let err = anyhow::Error::from(GeocodeError::NotFound("Atlantis".to_string()))
            .context("Could not geocode location 'Atlantis'");
        let api_error = api_error(&err);
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert!(api_error.body["error"].as_str().unwrap().contains("Atlantis"));
    }

    #[test]
    fn test_api_error_maps_upstream_status_to_bad_gateway() {
        let err = anyhow::Error::from(GeocodeError::UpstreamStatus(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ));
        assert_eq!(api_error(&err).status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_api_error_maps_provider_error_to_bad_gateway() {
        let err = anyhow::Error::from(ProviderError::EmptyResponse).context("Prediction run failed");
        assert_eq!(api_error(&err).status, StatusCode::BAD_GATEWAY);
    }
}
