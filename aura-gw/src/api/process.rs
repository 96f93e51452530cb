//! Command processing endpoints
//!
//! Text arrives already recognized: the browser performs speech-to-text,
//! so the voice endpoint receives a transcript plus an `audioData` blob it
//! accepts for interface compatibility and ignores.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use aura_common::api::RouteReply;
use aura_common::time::epoch_millis;

use super::invalid_input;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub command: String,
    /// Client-side interaction mode, informational only
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub response: RouteReply,
    pub api_used: String,
    #[serde(rename = "commandType")]
    pub command_type: String,
    pub timestamp: i64,
}

/// POST /api/aura/process
///
/// Route one typed or transcribed command and return the reply envelope
/// the client renders into transcript and widget state.
pub async fn process_command(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Response {
    if req.command.trim().is_empty() {
        return invalid_input("Empty command");
    }

    tracing::debug!(
        mode = req.mode.as_deref().unwrap_or("assistant"),
        chars = req.command.len(),
        "processing command"
    );

    let routed = state.router.route(&req.command, req.user_id.as_deref()).await;

    Json(ProcessResponse {
        success: true,
        response: routed.reply,
        api_used: routed.api_used,
        command_type: routed.command_type.to_string(),
        timestamp: epoch_millis(),
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRequest {
    pub command: String,
    /// Raw capture blob; unused (recognition happens in the browser)
    #[serde(default)]
    pub audio_data: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub success: bool,
    pub response: RouteReply,
    #[serde(rename = "inputType")]
    pub input_type: &'static str,
    pub timestamp: i64,
}

/// POST /api/voice/process
///
/// Same routing as `/api/aura/process`, tagged as voice input so the
/// client prefers the spoken reply path.
pub async fn process_voice(
    State(state): State<AppState>,
    Json(req): Json<VoiceRequest>,
) -> Response {
    if req.command.trim().is_empty() {
        return invalid_input("Empty voice transcript");
    }

    let routed = state.router.route(&req.command, req.user_id.as_deref()).await;

    Json(VoiceResponse {
        success: true,
        response: routed.reply,
        input_type: "voice",
        timestamp: epoch_millis(),
    })
    .into_response()
}
