//! # Health Check Handler
//!
//! برای بررسی سلامت سرویس

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{models::HealthResponse, services::AppState};

// =====================================
// Health Check
// =====================================
/// بررسی سلامت سرویس
///
/// # مفاهیم:
/// - Health check برای Kubernetes/Docker
/// - یک query واقعی روی دیتابیس اجرا میشه
///
/// # Endpoint
/// `GET /health`
///
/// # Response
/// - 200: `{"status": "healthy", "version": "0.1.0", "database": true}`
/// - 503: `{"status": "degraded", ..., "database": false}`
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match state.db.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(HealthResponse::from_probe(db_ok)))
}
