/// Health endpoints - liveness and readiness probes
use crate::store::ResourceStore;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    store: Arc<dyn ResourceStore>,
}

impl HealthState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    backend: &'static str,
    status: ComponentStatus,
    message: String,
    latency_ms: u64,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    store: ComponentCheck,
    timestamp: String,
}

pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "story-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::error!(
                error = %e,
                backend = state.store.backend(),
                "Health check store ping failed"
            );
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": "Resource store unreachable",
                "service": "story-service"
            }))
        }
    }
}

pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.store.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match result {
        Ok(()) => (ComponentStatus::Healthy, "store ping successful".to_string()),
        Err(e) => {
            tracing::error!(
                error = %e,
                backend = state.store.backend(),
                "Readiness store ping failed"
            );
            (ComponentStatus::Unhealthy, "store ping failed".to_string())
        }
    };
    let ready = status == ComponentStatus::Healthy;

    let response = ReadinessResponse {
        ready,
        status,
        store: ComponentCheck {
            backend: state.store.backend(),
            status,
            message,
            latency_ms,
        },
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
