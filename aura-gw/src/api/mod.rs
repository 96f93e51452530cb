//! HTTP API handlers for the AURA gateway

pub mod health;
pub mod process;
pub mod scan;
pub mod status;
pub mod ui;

pub use health::health_routes;
pub use process::{process_command, process_voice};
pub use scan::{scan_document, scan_image};
pub use status::system_status;
pub use ui::serve_index;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use aura_common::time::epoch_millis;

/// Client-error response: HTTP 400 with the standard failure envelope.
///
/// Domain failures stay HTTP 200 with `success: false` semantics handled
/// by each endpoint; 400 is reserved for requests the gateway cannot even
/// interpret (empty command, undecodable payload, missing upload).
pub(crate) fn invalid_input(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "message": message,
            "timestamp": epoch_millis(),
        })),
    )
        .into_response()
}
