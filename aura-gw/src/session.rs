//! Per-user focus session countdowns
//!
//! A session is one 40-minute countdown. Completing a cycle rolls straight
//! into the next; completing the second cycle activates the clone feed and
//! evicts the record, so a later "start" begins a fresh session. All state
//! is in-memory and lost on restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use aura_common::SessionRestartPolicy;

/// User identifier applied when a request carries none
pub const DEFAULT_USER: &str = "default";

/// One focus cycle lasts 40 minutes
pub const SESSION_DURATION: Duration = Duration::from_secs(2400);

/// Cycles per session; finishing the last one activates the clone
const TOTAL_CYCLES: u32 = 2;

/// Hard cap on tracked user identifiers; the stalest countdown is evicted
/// to admit a new user once the cap is hit
const MAX_TRACKED_USERS: usize = 4096;

/// Threshold-based encouragement, keyed on minutes remaining
/// (strictly more than 30 / 20 / 10, then the final stretch).
const ENCOURAGEMENTS: [&str; 4] = [
    "Great start. Pick one task and settle in.",
    "Solid momentum. Stay with the task in front of you.",
    "Past the halfway mark. Keep distractions closed.",
    "Final stretch. Finish the piece you are on.",
];

fn encouragement(remaining_secs: u64) -> &'static str {
    if remaining_secs > 30 * 60 {
        ENCOURAGEMENTS[0]
    } else if remaining_secs > 20 * 60 {
        ENCOURAGEMENTS[1]
    } else if remaining_secs > 10 * 60 {
        ENCOURAGEMENTS[2]
    } else {
        ENCOURAGEMENTS[3]
    }
}

#[derive(Debug, Clone)]
struct TimerSession {
    started_at: Instant,
    duration: Duration,
    cycle_count: u32,
}

impl TimerSession {
    fn new(now: Instant) -> Self {
        Self {
            started_at: now,
            duration: SESSION_DURATION,
            cycle_count: 0,
        }
    }

    fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }
}

/// Outcome of a start request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started { session_number: u32 },
    /// Refused under [`SessionRestartPolicy::Reject`]; the running
    /// countdown is untouched
    AlreadyRunning { remaining_secs: u64 },
}

/// Outcome of polling a user's countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    NoSession,
    Running {
        session_number: u32,
        remaining_secs: u64,
        progress_percent: u8,
        encouragement: &'static str,
    },
    /// A cycle just finished; the next one has already started
    CycleComplete { session_number: u32 },
    /// Both cycles finished; the record has been evicted
    CloneActivated,
}

/// In-memory registry of focus sessions, keyed by user identifier.
///
/// The single lock is the mutual-exclusion domain: two near-simultaneous
/// polls for the same user cannot both observe an expired countdown, so a
/// cycle is never double-counted.
pub struct SessionTimerRegistry {
    sessions: Mutex<HashMap<String, TimerSession>>,
    policy: SessionRestartPolicy,
}

impl SessionTimerRegistry {
    pub fn new(policy: SessionRestartPolicy) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub async fn start(&self, user: &str) -> StartOutcome {
        self.start_at(user, Instant::now()).await
    }

    pub async fn poll(&self, user: &str) -> PollOutcome {
        self.poll_at(user, Instant::now()).await
    }

    /// Start a session as of `now`. Time is a parameter so tests can
    /// simulate elapsed sessions without sleeping.
    pub(crate) async fn start_at(&self, user: &str, now: Instant) -> StartOutcome {
        let mut sessions = self.sessions.lock().await;

        if let Some(existing) = sessions.get(user) {
            if self.policy == SessionRestartPolicy::Reject {
                return StartOutcome::AlreadyRunning {
                    remaining_secs: existing.remaining(now).as_secs(),
                };
            }
        }

        if sessions.len() >= MAX_TRACKED_USERS && !sessions.contains_key(user) {
            // Completed sessions are evicted on completion, so anything
            // still here is nominally running; reclaim the stalest one
            // (an 80-minute-old countdown is long abandoned).
            let stale = sessions
                .iter()
                .min_by_key(|(_, s)| s.started_at)
                .map(|(k, _)| k.clone());
            if let Some(key) = stale {
                tracing::warn!(user = %key, "session registry at capacity, evicting stalest session");
                sessions.remove(&key);
            }
        }

        sessions.insert(user.to_string(), TimerSession::new(now));
        tracing::info!(user = %user, "focus session started");
        StartOutcome::Started { session_number: 1 }
    }

    /// Poll a session as of `now`, advancing cycle state on expiry.
    pub(crate) async fn poll_at(&self, user: &str, now: Instant) -> PollOutcome {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(user) else {
            return PollOutcome::NoSession;
        };

        let elapsed = now.saturating_duration_since(session.started_at);
        if elapsed < session.duration {
            let remaining_secs = (session.duration - elapsed).as_secs();
            let progress =
                (elapsed.as_secs() * 100 / session.duration.as_secs()).min(100) as u8;
            return PollOutcome::Running {
                session_number: session.cycle_count + 1,
                remaining_secs,
                progress_percent: progress,
                encouragement: encouragement(remaining_secs),
            };
        }

        session.cycle_count += 1;
        if session.cycle_count < TOTAL_CYCLES {
            session.started_at = now;
            tracing::info!(user = %user, cycle = session.cycle_count, "focus cycle complete");
            PollOutcome::CycleComplete {
                session_number: session.cycle_count,
            }
        } else {
            sessions.remove(user);
            tracing::info!(user = %user, "both cycles complete, clone activated");
            PollOutcome::CloneActivated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionTimerRegistry {
        SessionTimerRegistry::new(SessionRestartPolicy::Reject)
    }

    #[tokio::test]
    async fn start_then_poll_reports_nearly_full_duration() {
        let reg = registry();
        let now = Instant::now();

        let outcome = reg.start_at("u", now).await;
        assert_eq!(outcome, StartOutcome::Started { session_number: 1 });

        match reg.poll_at("u", now + Duration::from_millis(500)).await {
            PollOutcome::Running {
                session_number,
                remaining_secs,
                progress_percent,
                ..
            } => {
                assert_eq!(session_number, 1);
                assert!(remaining_secs >= 2399 && remaining_secs <= 2400);
                assert_eq!(progress_percent, 0);
            }
            other => panic!("expected Running, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn first_expiry_completes_cycle_and_restarts_countdown() {
        let reg = registry();
        let now = Instant::now();
        reg.start_at("u", now).await;

        let expired = now + SESSION_DURATION;
        assert_eq!(
            reg.poll_at("u", expired).await,
            PollOutcome::CycleComplete { session_number: 1 }
        );

        // Countdown restarted from the completion instant into cycle 2
        match reg.poll_at("u", expired + Duration::from_secs(1)).await {
            PollOutcome::Running {
                session_number,
                remaining_secs,
                ..
            } => {
                assert_eq!(session_number, 2);
                assert!(remaining_secs >= 2398);
            }
            other => panic!("expected Running, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn second_expiry_activates_clone_and_evicts() {
        let reg = registry();
        let now = Instant::now();
        reg.start_at("u", now).await;

        let first = now + SESSION_DURATION;
        reg.poll_at("u", first).await;
        let second = first + SESSION_DURATION;
        assert_eq!(reg.poll_at("u", second).await, PollOutcome::CloneActivated);

        // Record is gone; a fresh session starts at cycle 1
        assert_eq!(reg.poll_at("u", second).await, PollOutcome::NoSession);
        assert_eq!(
            reg.start_at("u", second).await,
            StartOutcome::Started { session_number: 1 }
        );
    }

    #[tokio::test]
    async fn reject_policy_leaves_running_countdown_untouched() {
        let reg = registry();
        let now = Instant::now();
        reg.start_at("u", now).await;

        let later = now + Duration::from_secs(600);
        match reg.start_at("u", later).await {
            StartOutcome::AlreadyRunning { remaining_secs } => {
                assert!(remaining_secs <= 1800);
            }
            other => panic!("expected AlreadyRunning, got {:?}", other),
        }

        // started_at unchanged: ten minutes are really gone
        match reg.poll_at("u", later).await {
            PollOutcome::Running { remaining_secs, .. } => {
                assert_eq!(remaining_secs, 1800);
            }
            other => panic!("expected Running, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn restart_policy_resets_the_countdown() {
        let reg = SessionTimerRegistry::new(SessionRestartPolicy::Restart);
        let now = Instant::now();
        reg.start_at("u", now).await;

        let later = now + Duration::from_secs(600);
        assert_eq!(
            reg.start_at("u", later).await,
            StartOutcome::Started { session_number: 1 }
        );
        match reg.poll_at("u", later + Duration::from_secs(1)).await {
            PollOutcome::Running { remaining_secs, .. } => {
                assert!(remaining_secs >= 2398);
            }
            other => panic!("expected Running, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let reg = registry();
        let now = Instant::now();
        reg.start_at("alice", now).await;

        assert_eq!(reg.poll_at("bob", now).await, PollOutcome::NoSession);
    }

    #[test]
    fn encouragement_thresholds() {
        assert_eq!(encouragement(35 * 60), ENCOURAGEMENTS[0]);
        assert_eq!(encouragement(30 * 60), ENCOURAGEMENTS[1]); // boundary is strict
        assert_eq!(encouragement(25 * 60), ENCOURAGEMENTS[1]);
        assert_eq!(encouragement(15 * 60), ENCOURAGEMENTS[2]);
        assert_eq!(encouragement(10 * 60), ENCOURAGEMENTS[3]);
        assert_eq!(encouragement(0), ENCOURAGEMENTS[3]);
    }
}
