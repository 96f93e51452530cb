//! Gateway configuration loading
//!
//! Configuration is resolved in priority order:
//! 1. Path given on the command line (highest priority)
//! 2. `AURA_CONFIG` environment variable
//! 3. Platform config file (`~/.config/aura/config.toml` or OS equivalent)
//! 4. Compiled defaults (fallback)
//!
//! Provider credentials are never stored in the config file; they are read
//! from the environment at startup (see [`env_credential`]).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Policy for a "start session" command arriving while a session is
/// already active for the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRestartPolicy {
    /// Refuse the second start; the running countdown is untouched.
    #[default]
    Reject,
    /// Replace the running session with a fresh countdown.
    Restart,
}

/// Gateway configuration, loadable from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Timeout for a single outbound provider call, in seconds
    pub request_timeout_secs: u64,
    /// How long an uploaded document is kept on disk before deletion, in seconds
    pub upload_retention_secs: u64,
    /// Behavior when a session start arrives while one is running
    pub session_restart_policy: SessionRestartPolicy,
    /// Model requested from the OpenAI chat completions endpoint
    pub openai_model: String,
    /// Model requested from the Anthropic messages endpoint
    pub anthropic_model: String,
    /// Model requested from the Gemini generateContent endpoint
    pub gemini_model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5850,
            request_timeout_secs: 30,
            upload_retention_secs: 30,
            session_restart_policy: SessionRestartPolicy::Reject,
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }
}

/// Resolve and load the gateway configuration.
///
/// A path supplied on the command line must exist; the lower-priority
/// sources are optional and fall through to compiled defaults.
pub fn load_config(cli_path: Option<&Path>) -> Result<GatewayConfig> {
    // Priority 1: command-line argument
    if let Some(path) = cli_path {
        tracing::info!(path = %path.display(), "loading config from command-line path");
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        return GatewayConfig::from_toml(&text);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var("AURA_CONFIG") {
        let path = PathBuf::from(path);
        tracing::info!(path = %path.display(), "loading config from AURA_CONFIG");
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        return GatewayConfig::from_toml(&text);
    }

    // Priority 3: platform config file, if present
    if let Some(path) = default_config_path() {
        if path.exists() {
            tracing::info!(path = %path.display(), "loading config from platform path");
            let text = std::fs::read_to_string(&path)?;
            return GatewayConfig::from_toml(&text);
        }
    }

    // Priority 4: compiled defaults
    tracing::debug!("no config file found, using compiled defaults");
    Ok(GatewayConfig::default())
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aura").join("config.toml"))
}

/// Read a credential from the environment, trying each variable name in
/// order and returning the first non-empty value.
pub fn env_credential(vars: &[&str]) -> Option<String> {
    for var in vars {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
    }
    None
}
