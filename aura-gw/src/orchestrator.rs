//! Provider response orchestration with sticky fallback
//!
//! The orchestrator tries the currently preferred provider first, walks the
//! remaining providers in declared order on failure, and promotes the first
//! fallback that answers to preferred so later calls start there. When every
//! provider is missing a credential or fails, a local keyword responder
//! guarantees the caller still gets text.

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::providers::client::{Completions, HttpCompletions};
use crate::providers::{ProviderConfig, ProviderKind};

/// Identifier reported when the local responder produced the reply
pub const LOCAL_FALLBACK_API: &str = "local_fallback";

/// Ordered keyword table for the local responder. First matching entry
/// wins; matching is substring over the lower-cased message.
const LOCAL_REPLIES: &[(&[&str], &str)] = &[
    (
        &["hello", "hey", "good morning", "good evening"],
        "Hello! I'm AURA. I can run focus sessions, help you through a stressful moment, or scan a document for you.",
    ),
    (
        &["help", "what can you do"],
        "I can start a 40-minute focus session, tell you how much time is left, switch modes, activate my clone for background tasks, or scan a document.",
    ),
    (&["thank"], "You're welcome. I'm here whenever you need me."),
    (&["how are you"], "Running smoothly and ready to help."),
    (
        &["timer", "session", "focus"],
        "Say \"start work session\" and I'll run a 40-minute focus countdown for you.",
    ),
    (
        &["scan", "document"],
        "Say \"scan document\" and I'll open the capture flow.",
    ),
    (&["bye", "goodbye", "good night"], "Goodbye! Come back when you need me."),
];

const DEFAULT_REPLY: &str =
    "Got it. Tell me more, or ask for help to hear what I can do.";

/// Deterministic local reply for when no provider is reachable
pub(crate) fn local_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    for &(keywords, reply) in LOCAL_REPLIES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return reply;
        }
    }
    DEFAULT_REPLY
}

/// Reply text plus which backend produced it
#[derive(Debug, Clone)]
pub struct OrchestratorReply {
    pub text: String,
    pub api_used: String,
}

/// Multi-provider response orchestrator.
///
/// Owns the provider list and the mutable "preferred" pointer; one instance
/// is shared by the whole gateway.
pub struct ResponseOrchestrator<T: Completions = HttpCompletions> {
    /// Configured providers, in declared fallback order
    providers: Vec<ProviderConfig>,
    /// Provider tried first on the next call. Always a member of
    /// `providers`. Concurrent fallback promotions may interleave; the
    /// consequence is one extra retry on a later call, never wrong output.
    preferred: RwLock<ProviderKind>,
    transport: T,
}

impl<T: Completions> ResponseOrchestrator<T> {
    pub fn new(providers: Vec<ProviderConfig>, transport: T) -> Self {
        // Start from the first provider that could actually answer
        let initial = providers
            .iter()
            .find(|p| p.has_credential())
            .or_else(|| providers.first())
            .map(|p| p.kind)
            .unwrap_or(ProviderKind::OpenAi);

        Self {
            providers,
            preferred: RwLock::new(initial),
            transport,
        }
    }

    /// Provider that will be tried first on the next call
    pub async fn preferred(&self) -> ProviderKind {
        *self.preferred.read().await
    }

    /// Identifiers of providers with a credential present
    pub fn available(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .filter(|p| p.has_credential())
            .map(|p| p.kind.id())
            .collect()
    }

    /// Produce a reply for `message`. Never fails; the local responder is
    /// the last resort and is indistinguishable from a provider reply to
    /// the caller.
    pub async fn respond(&self, message: &str) -> OrchestratorReply {
        let preferred = *self.preferred.read().await;

        // Preferred provider first; success leaves the pointer unchanged.
        if let Some(provider) = self.providers.iter().find(|p| p.kind == preferred) {
            if let Some(key) = provider.api_key.as_deref() {
                match self.transport.complete(provider, key, message).await {
                    Ok(text) => {
                        return OrchestratorReply {
                            text,
                            api_used: provider.kind.id().to_string(),
                        }
                    }
                    Err(e) => {
                        warn!(provider = provider.kind.id(), error = %e, "preferred provider failed");
                    }
                }
            }
        }

        // Remaining providers in declared order; first success becomes the
        // new preferred so future calls start there.
        for provider in &self.providers {
            if provider.kind == preferred {
                continue;
            }
            let Some(key) = provider.api_key.as_deref() else {
                continue;
            };
            match self.transport.complete(provider, key, message).await {
                Ok(text) => {
                    *self.preferred.write().await = provider.kind;
                    info!(provider = provider.kind.id(), "promoted fallback provider to preferred");
                    return OrchestratorReply {
                        text,
                        api_used: provider.kind.id().to_string(),
                    };
                }
                Err(e) => {
                    warn!(provider = provider.kind.id(), error = %e, "fallback provider failed");
                }
            }
        }

        debug!("all providers exhausted, using local responder");
        OrchestratorReply {
            text: local_reply(message).to_string(),
            api_used: LOCAL_FALLBACK_API.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::client::ProviderError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted transport: kinds present in `ok` answer with their text,
    /// everything else fails with HTTP 500. Records call order.
    struct FakeCompletions {
        ok: HashMap<ProviderKind, String>,
        calls: Mutex<Vec<ProviderKind>>,
    }

    impl FakeCompletions {
        fn new(ok: &[(ProviderKind, &str)]) -> Self {
            Self {
                ok: ok.iter().map(|(k, t)| (*k, t.to_string())).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completions for FakeCompletions {
        async fn complete(
            &self,
            provider: &ProviderConfig,
            _api_key: &str,
            _message: &str,
        ) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(provider.kind);
            match self.ok.get(&provider.kind) {
                Some(text) => Ok(text.clone()),
                None => Err(ProviderError::Api(500)),
            }
        }
    }

    fn provider(kind: ProviderKind, key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            kind,
            model: "test-model".to_string(),
            api_key: key.map(str::to_string),
        }
    }

    fn all_credentialed() -> Vec<ProviderConfig> {
        ProviderKind::DECLARED_ORDER
            .iter()
            .map(|k| provider(*k, Some("key")))
            .collect()
    }

    #[tokio::test]
    async fn preferred_success_keeps_pointer() {
        let transport = FakeCompletions::new(&[(ProviderKind::OpenAi, "from openai")]);
        let orch = ResponseOrchestrator::new(all_credentialed(), transport);

        let reply = orch.respond("hi").await;

        assert_eq!(reply.text, "from openai");
        assert_eq!(reply.api_used, "openai");
        assert_eq!(orch.preferred().await, ProviderKind::OpenAi);
        assert_eq!(*orch.transport.calls.lock().unwrap(), vec![ProviderKind::OpenAi]);
    }

    #[tokio::test]
    async fn failed_preferred_promotes_first_working_fallback() {
        let transport = FakeCompletions::new(&[(ProviderKind::Anthropic, "from anthropic")]);
        let orch = ResponseOrchestrator::new(all_credentialed(), transport);

        let reply = orch.respond("hi").await;
        assert_eq!(reply.api_used, "anthropic");
        assert_eq!(orch.preferred().await, ProviderKind::Anthropic);

        // Sticky: the next call starts at the promoted provider.
        let reply = orch.respond("hi again").await;
        assert_eq!(reply.api_used, "anthropic");
        assert_eq!(
            *orch.transport.calls.lock().unwrap(),
            vec![
                ProviderKind::OpenAi,
                ProviderKind::Anthropic,
                ProviderKind::Anthropic
            ]
        );
    }

    #[tokio::test]
    async fn credentialless_providers_are_never_attempted() {
        let providers = vec![
            provider(ProviderKind::OpenAi, Some("key")),
            provider(ProviderKind::Anthropic, None),
            provider(ProviderKind::Gemini, Some("key")),
        ];
        let transport = FakeCompletions::new(&[(ProviderKind::Gemini, "from gemini")]);
        let orch = ResponseOrchestrator::new(providers, transport);

        let reply = orch.respond("hi").await;

        assert_eq!(reply.api_used, "gemini");
        assert_eq!(orch.preferred().await, ProviderKind::Gemini);
        assert_eq!(
            *orch.transport.calls.lock().unwrap(),
            vec![ProviderKind::OpenAi, ProviderKind::Gemini]
        );
    }

    #[tokio::test]
    async fn all_failing_falls_back_to_keyword_table() {
        let transport = FakeCompletions::new(&[]);
        let orch = ResponseOrchestrator::new(all_credentialed(), transport);

        let reply = orch.respond("Hello there").await;

        assert_eq!(reply.api_used, LOCAL_FALLBACK_API);
        assert_eq!(reply.text, local_reply("hello there"));
        // Every credentialed provider was attempted exactly once.
        assert_eq!(orch.transport.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn no_credentials_means_no_calls_and_default_reply() {
        let providers = ProviderKind::DECLARED_ORDER
            .iter()
            .map(|k| provider(*k, None))
            .collect();
        let transport = FakeCompletions::new(&[]);
        let orch = ResponseOrchestrator::new(providers, transport);

        let reply = orch.respond("xyzzy plugh").await;

        assert_eq!(reply.text, DEFAULT_REPLY);
        assert_eq!(reply.api_used, LOCAL_FALLBACK_API);
        assert!(orch.transport.calls.lock().unwrap().is_empty());
        assert!(orch.available().is_empty());
    }

    #[tokio::test]
    async fn respond_always_returns_text() {
        let transport = FakeCompletions::new(&[]);
        let orch = ResponseOrchestrator::new(all_credentialed(), transport);

        for message in ["", "hello", "what is the weather", "???"] {
            let reply = orch.respond(message).await;
            assert!(!reply.text.is_empty());
        }
    }

    #[test]
    fn local_reply_first_match_wins() {
        // "hello" appears before "help" in the table
        assert_eq!(
            local_reply("hello, can you help me"),
            LOCAL_REPLIES[0].1
        );
        assert_eq!(local_reply("HELP please"), LOCAL_REPLIES[1].1);
        assert_eq!(local_reply("no keywords in here"), DEFAULT_REPLY);
    }
}
