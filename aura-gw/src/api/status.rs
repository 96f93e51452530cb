//! System status endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use aura_common::time::epoch_millis;

use crate::AppState;

/// Feature flags advertised to the client
const FEATURES: [&str; 6] = [
    "voice_interaction",
    "focus_sessions",
    "ai_clone",
    "safe_mode",
    "document_scan",
    "mode_switching",
];

#[derive(Debug, Serialize)]
pub struct SystemStatusResponse {
    #[serde(rename = "currentActiveAPI")]
    pub current_active_api: String,
    #[serde(rename = "availableAPIs")]
    pub available_apis: Vec<String>,
    #[serde(rename = "systemStatus")]
    pub system_status: String,
    pub features: Vec<String>,
    pub timestamp: i64,
}

/// GET /api/status
///
/// Report which provider is currently preferred, which are credentialed,
/// and what the client can enable.
pub async fn system_status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    Json(SystemStatusResponse {
        current_active_api: state.orchestrator.preferred().await.id().to_string(),
        available_apis: state
            .orchestrator
            .available()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        system_status: "operational".to_string(),
        features: FEATURES.iter().map(|s| s.to_string()).collect(),
        timestamp: epoch_millis(),
    })
}
