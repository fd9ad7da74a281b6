// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! This module provides both hardcoded constants and environment variable configuration.

/// Upstream API endpoints and request shapes
pub mod endpoints {
    /// NASA POWER API
    pub const POWER_BASE_URL: &str = "https://power.larc.nasa.gov";
    pub const POWER_DAILY_POINT_PATH: &str = "/api/temporal/daily/point";

    /// POWER community the point data is requested for
    pub const POWER_COMMUNITY: &str = "AG";

    /// POWER fill value marking a missing observation
    pub const POWER_FILL_VALUE: f64 = -999.0;

    /// Parameter-name variants tried in order until one yields data.
    /// Older POWER deployments expose PRECTOT instead of PRECTOTCORR, and
    /// some reject the full six-parameter set outright.
    pub const POWER_PARAMETER_VARIANTS: [&str; 4] = [
        "T2M,T2M_MAX,T2M_MIN,PRECTOTCORR,WS2M,RH2M",
        "T2M,T2M_MAX,T2M_MIN,PRECTOT,WS2M,RH2M",
        "T2M,PRECTOTCORR,WS2M",
        "T2M,PRECTOT,WS2M",
    ];

    /// Nominatim (OpenStreetMap) geocoder
    pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    pub const NOMINATIM_SEARCH_PATH: &str = "/search";
}

/// Forecast tunables
pub mod tuning {
    /// Trailing window of history fetched before predicting (~3 years)
    pub const HISTORY_DAYS: i64 = 1095;

    /// Half-width of the circular day-of-year window, in days
    pub const SIMILAR_DAY_WINDOW: u32 = 10;

    /// Minimum candidate count before the climate fallback kicks in
    pub const MIN_SIMILAR_DAYS: usize = 6;

    /// Day count used for circular day-of-year arithmetic
    pub const YEAR_DAYS: f64 = 365.0;

    /// Prediction horizon bounds
    pub const DEFAULT_HORIZON_DAYS: usize = 7;
    pub const MAX_HORIZON_DAYS: usize = 365;

    /// Precipitation above this counts as a rainy day in seasonal rollups
    pub const RAINY_DAY_THRESHOLD_MM: f64 = 0.1;
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Get HTTP server port from environment or default
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// Get POWER API base URL from environment or default
    pub fn power_base_url() -> String {
        env::var("POWER_BASE_URL")
            .unwrap_or_else(|_| super::endpoints::POWER_BASE_URL.to_string())
    }

    /// Get Nominatim base URL from environment or default
    pub fn nominatim_base_url() -> String {
        env::var("NOMINATIM_BASE_URL")
            .unwrap_or_else(|_| super::endpoints::NOMINATIM_BASE_URL.to_string())
    }

    /// Get upstream request timeout in seconds from environment or default
    pub fn request_timeout_secs() -> u64 {
        env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15)
    }

    /// Get the User-Agent sent to upstream APIs from environment or default.
    /// Nominatim's usage policy requires an identifying agent.
    pub fn user_agent() -> String {
        env::var("UPSTREAM_USER_AGENT").unwrap_or_else(|_| {
            format!("skycast/{} (https://github.com/skycast/skycast)", env!("CARGO_PKG_VERSION"))
        })
    }

    /// Get history window override from environment or default
    pub fn history_days() -> i64 {
        env::var("HISTORY_DAYS")
            .unwrap_or_else(|_| super::tuning::HISTORY_DAYS.to_string())
            .parse()
            .unwrap_or(super::tuning::HISTORY_DAYS)
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}

/// Service identity
pub mod service {
    /// Service name used in logs and health payloads
    pub const SERVICE_NAME: &str = "skycast";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
