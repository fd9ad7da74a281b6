// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Health check endpoints and monitoring utilities

use crate::config::UpstreamConfig;
use crate::constants::service;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::info;

/// Overall health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// Response timestamp
    pub timestamp: u64,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health checker for the Skycast service
pub struct HealthChecker {
    /// Service start time
    start_time: Instant,
    /// Client for upstream reachability probes
    client: Client,
    /// NASA POWER base URL
    power_base_url: String,
    /// Nominatim base URL
    nominatim_base_url: String,
    /// Cached health status
    cached_status: RwLock<Option<(HealthResponse, Instant)>>,
    /// Cache TTL
    cache_ttl: Duration,
}

impl HealthChecker {
    /// Create a new health checker
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            start_time: Instant::now(),
            client: Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
            power_base_url: config.power_base_url.clone(),
            nominatim_base_url: config.nominatim_base_url.clone(),
            cached_status: RwLock::new(None),
            cache_ttl: Duration::from_secs(30),
        }
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: service::SERVICE_NAME.to_string(),
            version: service::SERVICE_VERSION.to_string(),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Perform a basic health check (fast, suitable for load balancer probes)
    pub async fn basic_health(&self) -> HealthResponse {
        let start = Instant::now();

        let checks = vec![ComponentHealth {
            name: "service".to_string(),
            status: HealthStatus::Healthy,
            message: "Service is running".to_string(),
            duration_ms: 0,
        }];

        HealthResponse {
            status: HealthStatus::Healthy,
            service: self.service_info(),
            checks,
            timestamp: unix_timestamp(),
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Perform a comprehensive health check probing the upstream APIs
    pub async fn comprehensive_health(&self) -> HealthResponse {
        let start = Instant::now();

        // Check cache first
        {
            let cached = self.cached_status.read().await;
            if let Some((response, cached_at)) = cached.as_ref() {
                if cached_at.elapsed() < self.cache_ttl {
                    return response.clone();
                }
            }
        }

        info!("Performing comprehensive health check");

        let checks = vec![
            self.check_upstream("nasa_power", &self.power_base_url).await,
            self.check_upstream("nominatim", &self.nominatim_base_url)
                .await,
        ];

        let status = overall_status(&checks);

        let response = HealthResponse {
            status,
            service: self.service_info(),
            checks,
            timestamp: unix_timestamp(),
            response_time_ms: start.elapsed().as_millis() as u64,
        };

        {
            let mut cached = self.cached_status.write().await;
            *cached = Some((response.clone(), Instant::now()));
        }

        response
    }

    /// Probe one upstream base URL for reachability. Any HTTP response counts
    /// as reachable; only transport failures mark the component unhealthy.
    async fn check_upstream(&self, name: &str, base_url: &str) -> ComponentHealth {
        let start = Instant::now();

        match self.client.get(base_url).send().await {
            Ok(response) => ComponentHealth {
                name: name.to_string(),
                status: HealthStatus::Healthy,
                message: format!("Reachable (status {})", response.status()),
                duration_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => ComponentHealth {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: format!("Unreachable: {}", e),
                duration_ms: start.elapsed().as_millis() as u64,
            },
        }
    }
}

/// Overall status from component checks. An unreachable upstream degrades
/// the service rather than failing it: the synthetic fallback keeps the
/// forecast endpoints functional.
fn overall_status(checks: &[ComponentHealth]) -> HealthStatus {
    if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
