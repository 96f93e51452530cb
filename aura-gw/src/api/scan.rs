//! Document scan endpoints
//!
//! Two capture paths land here: a base64 camera snapshot and a multipart
//! file upload. Both feed the scan stub; the upload is additionally parked
//! on disk briefly and removed by a background task, mirroring the capture
//! flow's short-lived temp-file contract.

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use aura_common::api::ScanResult;
use aura_common::time::epoch_millis;

use super::invalid_input;
use crate::AppState;

const UPLOAD_APOLOGY: &str =
    "Sorry, I couldn't read that image. Please try the capture again.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanImageRequest {
    /// Base64 payload, with or without a `data:image/...;base64,` prefix
    pub image_data: String,
    #[serde(default)]
    pub image_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    pub scan: ScanResult,
    pub message: String,
    #[serde(rename = "voiceMessage")]
    pub voice_message: String,
    pub timestamp: i64,
}

fn scan_envelope(result: ScanResult) -> ScanResponse {
    let message = format!(
        "Scanned: {} ({}% confidence). {}",
        result.document_type, result.confidence_percent, result.body_text
    );
    let voice_message = format!(
        "I scanned it. It looks like {} and I'm about {} percent confident.",
        result.document_type, result.confidence_percent
    );
    ScanResponse {
        success: true,
        scan: result,
        message,
        voice_message,
        timestamp: epoch_millis(),
    }
}

/// POST /api/scan/image
///
/// Decode a camera snapshot and run it through the scanner.
pub async fn scan_image(
    State(state): State<AppState>,
    Json(req): Json<ScanImageRequest>,
) -> Response {
    let encoded = match req.image_data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => req.image_data.as_str(),
    };

    let bytes = match BASE64.decode(encoded.trim()) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return invalid_input(UPLOAD_APOLOGY),
    };

    tracing::debug!(
        bytes = bytes.len(),
        image_type = req.image_type.as_deref().unwrap_or("unknown"),
        "snapshot received for scan"
    );

    let result = state.scanner.scan(&bytes);
    Json(scan_envelope(result)).into_response()
}

/// POST /api/scan/document
///
/// Accept a multipart file upload, scan it, and schedule deletion of the
/// on-disk copy after the configured retention delay.
pub async fn scan_document(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file_bytes: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let is_file =
                    field.file_name().is_some() || matches!(field.name(), Some("document" | "file"));
                if !is_file {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) if !bytes.is_empty() => {
                        file_bytes = Some(bytes.to_vec());
                        break;
                    }
                    _ => return invalid_input(UPLOAD_APOLOGY),
                }
            }
            Ok(None) => break,
            Err(_) => return invalid_input(UPLOAD_APOLOGY),
        }
    }

    let Some(bytes) = file_bytes else {
        return invalid_input(UPLOAD_APOLOGY);
    };

    let path = std::env::temp_dir().join(format!("aura-upload-{}", Uuid::new_v4()));
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => {
            let retention = Duration::from_secs(state.config.upload_retention_secs);
            let cleanup_path = path.clone();
            tokio::spawn(async move {
                tokio::time::sleep(retention).await;
                if let Err(e) = tokio::fs::remove_file(&cleanup_path).await {
                    tracing::debug!(path = %cleanup_path.display(), error = %e, "upload already removed");
                }
            });
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "upload parked for scan");
        }
        Err(e) => {
            // Scanning proceeds from memory either way
            tracing::warn!(error = %e, "could not persist upload");
        }
    }

    let result = state.scanner.scan(&bytes);
    Json(scan_envelope(result)).into_response()
}
