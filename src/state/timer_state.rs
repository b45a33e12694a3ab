//! Timer state structure for the focus countdown

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Expired,
}

impl Phase {
    /// Status line shown next to the countdown
    pub fn status_text(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready to focus",
            Phase::Running => "Focus time!",
            Phase::Paused => "Paused",
            Phase::Expired => "Time's up!",
        }
    }
}

/// Countdown bookkeeping owned by the focus timer.
///
/// `deadline` is set exactly while the phase is `Running`; in that phase
/// `remaining_seconds` is a cached view recomputed from the deadline.
#[derive(Debug, Clone)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub deadline: Option<Instant>,
    pub phase: Phase,
    pub last_break: Option<Instant>,
    /// Break prompt is waiting for acknowledgement
    pub break_prompt: bool,
}

impl TimerState {
    /// Create an idle timer holding the configured duration
    pub fn new(remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            deadline: None,
            phase: Phase::Idle,
            last_break: None,
            break_prompt: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(0)
    }
}
