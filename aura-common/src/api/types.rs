//! Shared API request/response types
//!
//! The browser client drives its UI (timer widget, clone activity feed,
//! safe-mode overlay, scan panel) off the `status` tag of every reply, so
//! the serialized tag strings here are a wire contract, not display text.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// ========================================
// Route status tags
// ========================================

/// Status tag attached to every routed reply.
///
/// Serialized as the snake_case strings the client switches on, e.g.
/// `"timer_started"`. Mode activation carries the mode name in the tag
/// itself (`"work_mode_active"`), matching the client's pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteStatus {
    /// A focus session countdown was created
    TimerStarted,
    /// Start was refused because a countdown is already running
    TimerAlreadyRunning,
    /// Countdown is running; reply carries remaining time and progress
    Active,
    /// A 40-minute cycle finished; a follow-up cycle has begun
    SessionComplete,
    /// Both cycles finished (or clone explicitly requested); clone feed shown
    AiCloneActivated,
    /// Stress-relief overlay requested
    SafeModeActive,
    /// An interaction mode switch, e.g. `work_mode_active`
    ModeActive(String),
    /// Client should open the camera/upload capture flow
    ScanModeReady,
    /// Plain conversational reply with no UI side effect
    Conversation,
}

impl RouteStatus {
    /// Wire representation of the status tag
    pub fn as_tag(&self) -> Cow<'static, str> {
        match self {
            RouteStatus::TimerStarted => Cow::Borrowed("timer_started"),
            RouteStatus::TimerAlreadyRunning => Cow::Borrowed("timer_already_running"),
            RouteStatus::Active => Cow::Borrowed("active"),
            RouteStatus::SessionComplete => Cow::Borrowed("session_complete"),
            RouteStatus::AiCloneActivated => Cow::Borrowed("ai_clone_activated"),
            RouteStatus::SafeModeActive => Cow::Borrowed("safe_mode_active"),
            RouteStatus::ModeActive(mode) => Cow::Owned(format!("{}_mode_active", mode)),
            RouteStatus::ScanModeReady => Cow::Borrowed("scan_mode_ready"),
            RouteStatus::Conversation => Cow::Borrowed("conversation"),
        }
    }
}

impl Serialize for RouteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_tag())
    }
}

// ========================================
// Routed reply envelope
// ========================================

/// One routed reply, rendered by the client into the transcript and
/// optionally spoken aloud.
///
/// All fields beyond `status` and `message` are populated only by the
/// branches that use them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReply {
    pub status: RouteStatus,
    /// Display text for the chat transcript
    pub message: String,
    /// Shorter phrasing for speech synthesis; client falls back to `message`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_message: Option<String>,
    /// 1-indexed cycle number for the timer widget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_number: Option<u32>,
    /// Remaining countdown formatted `M:SS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<String>,
    /// Elapsed share of the session, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    /// Simulated clone activity feed, in display order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_activities: Option<Vec<String>>,
}

impl RouteReply {
    /// Create a reply with only status and message set
    pub fn new(status: RouteStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            voice_message: None,
            session_number: None,
            time_left: None,
            progress_percent: None,
            clone_activities: None,
        }
    }

    /// Plain conversational reply
    pub fn conversation(message: impl Into<String>) -> Self {
        Self::new(RouteStatus::Conversation, message)
    }

    /// Attach a voice-friendly phrasing
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice_message = Some(voice.into());
        self
    }
}

// ========================================
// Document scan result
// ========================================

/// Structured result of a document scan.
///
/// Shape is the contract a real OCR engine would satisfy; the current
/// producer is a stub (see the gateway's scan module).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Document class, drawn from a fixed catalog
    pub document_type: String,
    /// Extracted body text
    pub body_text: String,
    /// Salient points, in display order
    pub key_points: Vec<String>,
    /// Claimed recognition confidence, 70-100
    pub confidence_percent: u8,
}

// ========================================
// Tests
// ========================================
