// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Skycast
//!
//! A small weather glue service: geocode a place name, pull historical daily
//! observations for that point from the NASA POWER API, and produce naive
//! forward-looking daily predictions plus rule-based advisory text for a few
//! user personas (farmer, driver, event organizer).
//!
//! ## Features
//!
//! - **Forward geocoding**: free-text place names resolved via Nominatim/OSM
//! - **Historical observations**: NASA POWER daily point data, retried across
//!   a fixed list of parameter-name variants
//! - **Synthetic fallback**: a deterministic seasonal climate generator used
//!   when the upstream API is unavailable
//! - **Similar-day predictions**: distance-weighted blending over a circular
//!   day-of-year window, with a closed-form climate fallback
//! - **Persona advisories**: threshold-based guidance for farmers, drivers,
//!   and event organizers
//!
//! ## Quick Start
//!
//! 1. Start the HTTP server with the `skycast-server` binary
//! 2. `POST /forecast` with a location, horizon, and optional persona
//! 3. Probe upstream connectivity with the `diagnose-power-api` binary
//!
//! ## Architecture
//!
//! The service follows a modular architecture:
//! - **Providers**: historical daily weather sources (NASA POWER, synthetic)
//! - **Geocode**: place-name resolution against Nominatim
//! - **Intelligence**: prediction engine, seasonal rollups, advisory rules
//! - **Routes**: HTTP request handling and response shaping
//! - **Config**: environment-based configuration management
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use skycast::config::ServerConfig;
//! use skycast::intelligence::WeatherPredictor;
//! use skycast::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     // Create a history provider and a predictor on top of it
//!     let provider = create_provider("nasa-power", &config.upstream)?;
//!     let predictor = WeatherPredictor::new(provider);
//!
//!     // Predict a week of weather for Nairobi
//!     let predictions = predictor.predict(-1.2921, 36.8219, 7).await?;
//!     for prediction in &predictions {
//!         println!("{}: {:.1} C", prediction.date, prediction.temperature);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Historical daily weather providers (NASA POWER, synthetic fallback)
pub mod providers;

/// Common data models for daily records, predictions, and advisories
pub mod models;

/// Application constants and environment-based configuration values
pub mod constants;

/// Forward geocoding against Nominatim
pub mod geocode;

/// Prediction engine, seasonal rollups, and persona advisories
pub mod intelligence;

/// Environment-based configuration management
pub mod config;

/// HTTP request handlers for the forecast API
pub mod routes;

/// warp-based HTTP server wiring
pub mod server;

/// Production logging and structured output
pub mod logging;

/// Health checks and monitoring
pub mod health;
