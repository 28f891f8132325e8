//! Conversation state machine
//!
//! ```text
//!            wake                      wake / command (re-arms timer)
//!   Idle ──────────────▶ Active ◀────────────────────┐
//!    ▲                     │  └──────────────────────┘
//!    │  inactivity > timeout│
//!    └─────────────────────┤
//!                          │ shutdown command
//!                          ▼
//!                     Terminated
//! ```
//!
//! The clock is `tokio::time::Instant` so tests can drive the timeout with a
//! paused runtime.

use std::time::Duration;

use tokio::time::Instant;

/// Default inactivity window before dropping back to idle
pub const DEFAULT_CONVERSATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Conversation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Dormant, only wake words are acted on
    Idle,
    /// Conversation window open, transcripts are commands
    Active,
    /// Shutdown was requested, absorbing
    Terminated,
}

/// What the main loop should do with a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Wake word heard, speak the acknowledgement
    Acknowledge,
    /// Route the transcript as a command
    Route,
    /// Idle and not a wake word, drop it
    Discard,
    /// Conversation already terminated
    Ignore,
}

/// Mutable conversation record owned by the main loop
#[derive(Debug, Clone)]
pub struct ConversationState {
    phase: Phase,
    last_command_at: Instant,
    timeout: Duration,
}

impl ConversationState {
    /// Start idle with the given inactivity timeout
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            last_command_at: Instant::now(),
            timeout,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if the conversation window is open
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Check if shutdown has been reached
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    /// Time of the last wake word or command
    #[must_use]
    pub const fn last_command_at(&self) -> Instant {
        self.last_command_at
    }

    /// Configured inactivity timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drop back to idle once the timeout has elapsed
    ///
    /// Called once per loop iteration before listening. The transition is
    /// silent; returns true only when it happened on this call.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if self.phase == Phase::Active
            && now.saturating_duration_since(self.last_command_at) > self.timeout
        {
            self.phase = Phase::Idle;
            tracing::info!(
                timeout_secs = self.timeout.as_secs(),
                "conversation timed out, back to idle"
            );
            return true;
        }
        false
    }

    /// Decide what to do with a transcript and apply the transition
    ///
    /// A wake word always (re)opens the window and is never treated as a
    /// command. Any other transcript is a command while active and re-arms the
    /// timer before routing, whether or not it ends up recognized.
    pub fn on_transcript(&mut self, is_wake: bool, now: Instant) -> Step {
        match (self.phase, is_wake) {
            (Phase::Terminated, _) => Step::Ignore,
            (_, true) => {
                if self.phase == Phase::Idle {
                    tracing::info!("wake word detected, conversation active");
                } else {
                    tracing::debug!("wake word re-armed conversation");
                }
                self.phase = Phase::Active;
                self.last_command_at = now;
                Step::Acknowledge
            }
            (Phase::Active, false) => {
                self.last_command_at = now;
                Step::Route
            }
            (Phase::Idle, false) => Step::Discard,
        }
    }

    /// Enter the absorbing terminated phase
    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSATION_TIMEOUT)
    }
}
