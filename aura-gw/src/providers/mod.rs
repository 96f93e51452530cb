//! Hosted chat-completion providers
//!
//! The gateway relays conversational messages to one of several hosted
//! providers. The declared order here is the fallback order; a provider
//! with no credential in the environment is never attempted.

pub mod client;

use aura_common::config::{env_credential, GatewayConfig};

/// Identifier of a hosted chat-completion provider.
///
/// Variant order is the fixed fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// All providers, in declared fallback order
    pub const DECLARED_ORDER: [ProviderKind; 3] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
    ];

    /// Stable identifier used in API responses and logs
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Environment variables consulted for this provider's credential,
    /// in priority order
    pub fn credential_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["AURA_OPENAI_API_KEY", "OPENAI_API_KEY"],
            ProviderKind::Anthropic => &["AURA_ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY"],
            ProviderKind::Gemini => &["AURA_GEMINI_API_KEY", "GEMINI_API_KEY"],
        }
    }
}

/// Per-provider runtime configuration: model name plus the (possibly
/// absent) credential. Presence of `api_key` is the only gate; the key is
/// never validated for well-formedness.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Build the provider list in declared order from gateway config plus
/// environment credentials.
pub fn providers_from_env(config: &GatewayConfig) -> Vec<ProviderConfig> {
    ProviderKind::DECLARED_ORDER
        .iter()
        .map(|kind| {
            let model = match kind {
                ProviderKind::OpenAi => config.openai_model.clone(),
                ProviderKind::Anthropic => config.anthropic_model.clone(),
                ProviderKind::Gemini => config.gemini_model.clone(),
            };
            let api_key = env_credential(kind.credential_vars());
            if api_key.is_none() {
                tracing::debug!(provider = kind.id(), "no credential present, provider disabled");
            }
            ProviderConfig {
                kind: *kind,
                model,
                api_key,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_order_is_fixed() {
        let ids: Vec<&str> = ProviderKind::DECLARED_ORDER.iter().map(|k| k.id()).collect();
        assert_eq!(ids, vec!["openai", "anthropic", "gemini"]);
    }

    #[test]
    fn credential_presence_gates_provider() {
        let with_key = ProviderConfig {
            kind: ProviderKind::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_key: Some("sk-test".to_string()),
        };
        let without_key = ProviderConfig {
            kind: ProviderKind::Gemini,
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
        };

        assert!(with_key.has_credential());
        assert!(!without_key.has_credential());
    }
}
