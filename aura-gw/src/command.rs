//! Free-text command routing
//!
//! Inbound text is tested against ordered trigger tables; the first match
//! wins and dispatches to a built-in handler. Anything unmatched is relayed
//! to the response orchestrator as ordinary conversation. Built-in branches
//! never consult the orchestrator.

use std::sync::Arc;

use aura_common::api::{RouteReply, RouteStatus};
use aura_common::time::format_countdown;

use crate::orchestrator::ResponseOrchestrator;
use crate::providers::client::{Completions, HttpCompletions};
use crate::session::{PollOutcome, SessionTimerRegistry, StartOutcome, DEFAULT_USER};

/// Backend identifier reported for built-in replies
const INTERNAL_API: &str = "internal";

/// Simulated clone activity feed, in display order
const CLONE_ACTIVITIES: [&str; 5] = [
    "Reviewing your unread inbox",
    "Drafting replies to routine messages",
    "Organizing today's meeting notes",
    "Tracking open deadlines",
    "Preparing tomorrow's agenda",
];

/// Interaction modes the client can switch between
const MODES: [&str; 4] = ["work", "study", "creative", "relax"];

const SESSION_START_TRIGGERS: &[&str] = &[
    "start session",
    "start work",
    "begin session",
    "begin work",
    "start a session",
    "start my session",
    "start focus",
    "focus session",
    "start timer",
    "start the timer",
];

const TIMER_STATUS_TRIGGERS: &[&str] = &[
    "time left",
    "timer status",
    "how much time",
    "remaining time",
    "check timer",
    "check the timer",
    "session status",
    "how long left",
];

const SAFE_MODE_TRIGGERS: &[&str] = &[
    "stressed",
    "overwhelmed",
    "anxious",
    "panic",
    "safe mode",
    "need a break",
    "calm me",
    "can't cope",
];

const CLONE_TRIGGERS: &[&str] = &[
    "clone",
    "work for me",
    "background task",
    "take over",
    "handle my tasks",
];

const SCAN_TRIGGERS: &[&str] = &[
    "scan",
    "photograph",
    "take a picture",
    "read this document",
    "analyze this document",
    "camera",
];

/// A classified built-in command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Builtin {
    StartSession,
    TimerStatus,
    SafeMode,
    CloneTasks,
    ScanIntent,
    ModeSwitch(String),
}

fn contains_any(text: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| text.contains(t))
}

/// Match lower-cased text against the trigger tables in fixed precedence
/// order; the first hit wins.
fn classify(lower: &str) -> Option<Builtin> {
    if contains_any(lower, SESSION_START_TRIGGERS) {
        return Some(Builtin::StartSession);
    }
    if contains_any(lower, TIMER_STATUS_TRIGGERS) {
        return Some(Builtin::TimerStatus);
    }
    if contains_any(lower, SAFE_MODE_TRIGGERS) {
        return Some(Builtin::SafeMode);
    }
    if contains_any(lower, CLONE_TRIGGERS) {
        return Some(Builtin::CloneTasks);
    }
    if contains_any(lower, SCAN_TRIGGERS) {
        return Some(Builtin::ScanIntent);
    }
    if lower.contains("mode") {
        if let Some(mode) = MODES.iter().find(|m| lower.contains(*m)) {
            return Some(Builtin::ModeSwitch(mode.to_string()));
        }
    }
    None
}

/// A routed command: the reply plus envelope metadata
#[derive(Debug, Clone)]
pub struct Routed {
    pub reply: RouteReply,
    pub command_type: &'static str,
    pub api_used: String,
}

impl Routed {
    fn builtin(reply: RouteReply, command_type: &'static str) -> Self {
        Self {
            reply,
            command_type,
            api_used: INTERNAL_API.to_string(),
        }
    }
}

/// Routes free text to built-in handlers or the orchestrator
pub struct CommandRouter<T: Completions = HttpCompletions> {
    orchestrator: Arc<ResponseOrchestrator<T>>,
    timers: Arc<SessionTimerRegistry>,
}

impl<T: Completions> CommandRouter<T> {
    pub fn new(
        orchestrator: Arc<ResponseOrchestrator<T>>,
        timers: Arc<SessionTimerRegistry>,
    ) -> Self {
        Self {
            orchestrator,
            timers,
        }
    }

    pub async fn route(&self, command: &str, user_id: Option<&str>) -> Routed {
        let user = user_id
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER);
        let lower = command.to_lowercase();

        match classify(&lower) {
            Some(Builtin::StartSession) => {
                Routed::builtin(self.start_session(user).await, "session_start")
            }
            Some(Builtin::TimerStatus) => {
                Routed::builtin(self.timer_status(user).await, "timer_status")
            }
            Some(Builtin::SafeMode) => Routed::builtin(safe_mode_reply(), "safe_mode"),
            Some(Builtin::CloneTasks) => Routed::builtin(
                clone_reply("Clone activated. I'll keep routine work moving in the background."),
                "clone",
            ),
            Some(Builtin::ScanIntent) => Routed::builtin(scan_reply(), "scan_intent"),
            Some(Builtin::ModeSwitch(mode)) => {
                Routed::builtin(mode_reply(&mode), "mode_switch")
            }
            None => {
                let out = self.orchestrator.respond(command).await;
                Routed {
                    reply: RouteReply::conversation(out.text),
                    command_type: "conversation",
                    api_used: out.api_used,
                }
            }
        }
    }

    async fn start_session(&self, user: &str) -> RouteReply {
        match self.timers.start(user).await {
            StartOutcome::Started { session_number } => {
                let mut reply = RouteReply::new(
                    RouteStatus::TimerStarted,
                    format!(
                        "Focus session started: 40 minutes on the clock, cycle {} of 2.",
                        session_number
                    ),
                )
                .with_voice("Session started. Forty minutes. You've got this.");
                reply.session_number = Some(session_number);
                reply.time_left = Some(format_countdown(2400));
                reply
            }
            StartOutcome::AlreadyRunning { remaining_secs } => {
                let mut reply = RouteReply::new(
                    RouteStatus::TimerAlreadyRunning,
                    format!(
                        "A focus session is already running with {} left. Say \"time left\" to check progress.",
                        format_countdown(remaining_secs)
                    ),
                )
                .with_voice("You already have a session running. Stay with it.");
                reply.time_left = Some(format_countdown(remaining_secs));
                reply
            }
        }
    }

    async fn timer_status(&self, user: &str) -> RouteReply {
        match self.timers.poll(user).await {
            PollOutcome::NoSession => RouteReply::conversation(
                "No focus session is running. Say \"start work session\" to begin one.",
            )
            .with_voice("No session running. Want me to start one?"),
            PollOutcome::Running {
                session_number,
                remaining_secs,
                progress_percent,
                encouragement,
            } => {
                let countdown = format_countdown(remaining_secs);
                let mut reply = RouteReply::new(
                    RouteStatus::Active,
                    format!(
                        "{} left in cycle {} of 2. {}",
                        countdown, session_number, encouragement
                    ),
                )
                .with_voice(format!(
                    "About {} minutes left. {}",
                    remaining_secs / 60,
                    encouragement
                ));
                reply.session_number = Some(session_number);
                reply.time_left = Some(countdown);
                reply.progress_percent = Some(progress_percent);
                reply
            }
            PollOutcome::CycleComplete { session_number } => {
                let mut reply = RouteReply::new(
                    RouteStatus::SessionComplete,
                    format!(
                        "Session complete: cycle {} of 2 done. The next cycle has already started.",
                        session_number
                    ),
                )
                .with_voice(format!(
                    "Well done. Cycle {} of 2 complete. Rolling into the next one.",
                    session_number
                ));
                reply.session_number = Some(session_number);
                reply
            }
            PollOutcome::CloneActivated => {
                clone_reply("Both focus cycles are complete. Clone activated to carry on for you.")
            }
        }
    }
}

fn safe_mode_reply() -> RouteReply {
    RouteReply::new(
        RouteStatus::SafeModeActive,
        "Safe mode is on. Let's slow everything down. Breathe in for four counts, \
         hold for four, out for four. Nothing needs your attention right now.",
    )
    .with_voice("Safe mode on. Breathe with me. In for four, hold for four, out for four.")
}

fn clone_reply(message: &str) -> RouteReply {
    let mut reply = RouteReply::new(RouteStatus::AiCloneActivated, message)
        .with_voice("Clone activated. I've got the routine work covered.");
    reply.clone_activities = Some(CLONE_ACTIVITIES.iter().map(|s| s.to_string()).collect());
    reply
}

fn scan_reply() -> RouteReply {
    RouteReply::new(
        RouteStatus::ScanModeReady,
        "Scan mode ready. Point your camera at the document or upload a file, \
         and I'll take it from there.",
    )
    .with_voice("Scan mode ready. Show me the document.")
}

fn mode_reply(mode: &str) -> RouteReply {
    let blurb = match mode {
        "work" => "Notifications muted, focus front and center.",
        "study" => "Longer explanations on.",
        "creative" => "Ideas before judgments.",
        _ => "Slower pace, lighter tone.",
    };
    RouteReply::new(
        RouteStatus::ModeActive(mode.to_string()),
        format!("Switched to {} mode. {}", mode, blurb),
    )
    .with_voice(format!("{} mode on.", mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::client::ProviderError;
    use crate::providers::{ProviderConfig, ProviderKind};
    use async_trait::async_trait;
    use aura_common::SessionRestartPolicy;

    /// Transport that always fails, forcing the local responder
    struct DeadTransport;

    #[async_trait]
    impl Completions for DeadTransport {
        async fn complete(
            &self,
            _provider: &ProviderConfig,
            _api_key: &str,
            _message: &str,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Api(503))
        }
    }

    fn router() -> CommandRouter<DeadTransport> {
        let orchestrator = Arc::new(ResponseOrchestrator::new(Vec::new(), DeadTransport));
        let timers = Arc::new(SessionTimerRegistry::new(SessionRestartPolicy::Reject));
        CommandRouter::new(orchestrator, timers)
    }

    #[test]
    fn classify_precedence_is_fixed() {
        assert_eq!(classify("start work session"), Some(Builtin::StartSession));
        assert_eq!(classify("how much time is left"), Some(Builtin::TimerStatus));
        assert_eq!(
            classify("i am stressed and overwhelmed"),
            Some(Builtin::SafeMode)
        );
        assert_eq!(classify("activate my clone"), Some(Builtin::CloneTasks));
        assert_eq!(classify("can you scan this receipt"), Some(Builtin::ScanIntent));
        assert_eq!(
            classify("switch to study mode"),
            Some(Builtin::ModeSwitch("study".to_string()))
        );
        assert_eq!(classify("tell me a joke"), None);
    }

    #[test]
    fn safe_mode_outranks_mode_switch() {
        // "safe mode" contains "mode", but the stress branch is tested first
        assert_eq!(classify("safe mode please"), Some(Builtin::SafeMode));
        // likewise "scan mode" belongs to the scan branch
        assert_eq!(classify("scan mode"), Some(Builtin::ScanIntent));
    }

    #[tokio::test]
    async fn stress_wins_regardless_of_timer_state() {
        let router = router();
        router.route("start work session", Some("u")).await;

        let routed = router
            .route("I am stressed and overwhelmed", Some("u"))
            .await;
        assert_eq!(routed.reply.status, RouteStatus::SafeModeActive);
        assert_eq!(routed.api_used, "internal");
    }

    #[tokio::test]
    async fn start_session_populates_timer_fields() {
        let router = router();
        let routed = router.route("start work session", Some("u")).await;

        assert_eq!(routed.reply.status, RouteStatus::TimerStarted);
        assert_eq!(routed.command_type, "session_start");
        assert_eq!(routed.reply.session_number, Some(1));
        assert_eq!(routed.reply.time_left.as_deref(), Some("40:00"));
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_running() {
        let router = router();
        router.route("start work session", Some("u")).await;

        let routed = router.route("start work session", Some("u")).await;
        assert_eq!(routed.reply.status, RouteStatus::TimerAlreadyRunning);
    }

    #[tokio::test]
    async fn clone_branch_carries_activity_feed() {
        let router = router();
        let routed = router.route("activate my clone", None).await;

        assert_eq!(routed.reply.status, RouteStatus::AiCloneActivated);
        let activities = routed.reply.clone_activities.unwrap();
        assert_eq!(activities.len(), CLONE_ACTIVITIES.len());
        assert_eq!(activities[0], CLONE_ACTIVITIES[0]);
    }

    #[tokio::test]
    async fn unmatched_text_is_delegated_to_the_orchestrator() {
        let router = router();
        let routed = router.route("tell me a joke", None).await;

        assert_eq!(routed.reply.status, RouteStatus::Conversation);
        assert_eq!(routed.command_type, "conversation");
        assert_eq!(routed.api_used, "local_fallback");
        assert!(!routed.reply.message.is_empty());
    }

    #[tokio::test]
    async fn missing_user_id_maps_to_default_user() {
        let router = router();
        router.route("start work session", None).await;

        // Same default identity: the second anonymous start is rejected
        let routed = router.route("start work session", Some("  ")).await;
        assert_eq!(routed.reply.status, RouteStatus::TimerAlreadyRunning);
    }
}
