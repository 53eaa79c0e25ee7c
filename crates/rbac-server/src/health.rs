//! Health checks
//!
//! `/health` answers as long as the process runs. `/health/ready` also asks
//! the user store for its row count.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rbac_db::UserStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub struct HealthChecker {
    store: Arc<dyn UserStore>,
    /// "postgres" or "memory"
    backend: &'static str,
    start_time: Instant,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn UserStore>, backend: &'static str) -> Self {
        Self {
            store,
            backend,
            start_time: Instant::now(),
        }
    }

    fn report(&self, status: HealthStatus, components: Vec<ComponentHealth>) -> HealthReport {
        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn live(&self) -> HealthReport {
        self.report(HealthStatus::Healthy, vec![])
    }

    pub async fn ready(&self) -> HealthReport {
        let store = self.check_store().await;
        self.report(store.status, vec![store])
    }

    async fn check_store(&self) -> ComponentHealth {
        let start = Instant::now();

        let (status, message) = match self.store.count().await {
            Ok(count) => (
                HealthStatus::Healthy,
                format!("{} store with {} users", self.backend, count),
            ),
            Err(e) => {
                tracing::error!(error = %e, backend = self.backend, "User store health check failed");
                (HealthStatus::Unhealthy, e.to_string())
            }
        };

        ComponentHealth {
            name: "user_store".to_string(),
            status,
            message: Some(message),
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Liveness
pub async fn liveness(State(health): State<Arc<HealthChecker>>) -> Json<HealthReport> {
    Json(health.live())
}

/// Readiness
pub async fn readiness(
    State(health): State<Arc<HealthChecker>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = health.ready().await;
    (report.http_status(), Json(report))
}
