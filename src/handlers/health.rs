use crate::models::HealthStatus;
use axum::Json;
use chrono::Utc;

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "SoundPay Soundness Layer API is running".to_string(),
        timestamp: Utc::now(),
    })
}
