//! aura-gw library - AURA gateway service
//!
//! Thin HTTP relay between the browser client and hosted chat-completion
//! providers, plus the built-in command handlers (focus timer, safe mode,
//! clone feed, document scan stub) the client's widgets are driven by.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use aura_common::{GatewayConfig, Result};

pub mod api;
pub mod command;
pub mod orchestrator;
pub mod providers;
pub mod scan;
pub mod session;

use command::CommandRouter;
use orchestrator::ResponseOrchestrator;
use providers::client::HttpCompletions;
use providers::ProviderConfig;
use scan::DocumentScanStub;
use session::SessionTimerRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub orchestrator: Arc<ResponseOrchestrator>,
    pub router: Arc<CommandRouter>,
    pub timers: Arc<SessionTimerRegistry>,
    pub scanner: Arc<DocumentScanStub>,
}

impl AppState {
    /// Wire up the orchestration core from config plus a provider list.
    pub fn new(config: GatewayConfig, providers: Vec<ProviderConfig>) -> Result<Self> {
        let transport = HttpCompletions::new(Duration::from_secs(config.request_timeout_secs))?;
        let orchestrator = Arc::new(ResponseOrchestrator::new(providers, transport));
        let timers = Arc::new(SessionTimerRegistry::new(config.session_restart_policy));
        let router = Arc::new(CommandRouter::new(
            Arc::clone(&orchestrator),
            Arc::clone(&timers),
        ));

        Ok(Self {
            config: Arc::new(config),
            orchestrator,
            router,
            timers,
            scanner: Arc::new(DocumentScanStub),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/api/aura/process", post(api::process_command))
        .route("/api/voice/process", post(api::process_voice))
        .route("/api/scan/image", post(api::scan_image))
        .route("/api/scan/document", post(api::scan_document))
        .route("/api/status", get(api::system_status))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
