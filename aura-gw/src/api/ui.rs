//! UI serving route
//!
//! Serves the embedded minimal client page. The full browser client
//! (speech capture, camera flow, widget rendering) talks to the JSON
//! surface and is deployed separately; this page is a functional fallback
//! for poking at the gateway by hand.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// GET /
///
/// Serves the main UI page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
