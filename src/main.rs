// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Skycast Server Binary
//!
//! Starts the forecast HTTP API: geocoding, NASA POWER history, similar-day
//! predictions, and persona advisories.

use anyhow::Result;
use clap::Parser;
use skycast::{
    config::ServerConfig,
    geocode::GeocodingService,
    health::HealthChecker,
    intelligence::WeatherPredictor,
    logging,
    providers::create_provider,
    routes::ForecastRoutes,
    server::HttpServer,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "skycast-server")]
#[command(about = "Skycast weather forecast and advisory API server")]
struct Args {
    /// Port to listen on (overrides HTTP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// History provider to use
    #[arg(long, default_value = "nasa-power")]
    provider: String,

    /// Trailing days of history fetched before predicting (overrides HISTORY_DAYS)
    #[arg(long)]
    history_days: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(history_days) = args.history_days {
        config.forecast.history_days = history_days;
    }
    config.validate()?;

    info!("{}", config.summary());

    let provider = create_provider(&args.provider, &config.upstream)?;
    info!("History provider: {}", provider.provider_name());

    let predictor = Arc::new(
        WeatherPredictor::new(provider).with_history_days(config.forecast.history_days),
    );
    let geocoder = Arc::new(GeocodingService::new(&config.upstream));
    let health = HealthChecker::new(&config.upstream);

    let routes = ForecastRoutes::new(geocoder, predictor, config.forecast.clone());
    let server = HttpServer::new(routes, health);

    info!("Skycast server starting on port {}", config.http_port);

    if let Err(e) = server.run(config.http_port).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
