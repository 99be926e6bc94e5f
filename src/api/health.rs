use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::dashboard::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    active_sessions: u64,
    predictor_url: String,
}

/// GET /healthz - liveness of the dashboard itself.
///
/// The prediction service is only contacted on submit, never from here.
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        active_sessions: state.sessions.active_count().await,
        predictor_url: state.cfg.predictor.url.clone(),
    };
    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now(),
            active_sessions: 2,
            predictor_url: "http://localhost/model/predict".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"active_sessions\":2"));
    }
}
