//! Focus timer state machine
//!
//! The countdown runs against an absolute deadline instead of decrementing a
//! counter per tick, so scheduling delay or a stalled tick source never makes
//! the displayed time drift. The owner is responsible for calling
//! [`FocusTimer::evaluate`] every [`TICK_INTERVAL`](super::TICK_INTERVAL)
//! while [`FocusTimer::is_ticking`] is true.
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Expired -> Idle
//!            \-> (break due) Paused + prompt -> acknowledge -> Running
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

use super::{
    clock::Clock,
    presentation::{Cue, Modal, Presentation},
};
use crate::{
    state::{Phase, TimerState},
    utils::format_hms,
};

/// Result of one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is not running; nothing was evaluated
    Stopped,
    /// Still counting down
    Counting { remaining_seconds: u64 },
    /// Break interval elapsed; the timer paused and raised the break prompt
    BreakDue { remaining_seconds: u64 },
    /// Deadline reached
    Expired,
}

/// Whole seconds left, rounded up so the display never shows 0 early
fn ceil_seconds(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

/// Single-instance focus countdown driving a presentation surface
pub struct FocusTimer<P> {
    state: TimerState,
    presentation: P,
    clock: Arc<dyn Clock>,
}

impl<P: Presentation> FocusTimer<P> {
    /// Create an idle timer loaded from the presentation's focus settings
    pub fn new(presentation: P, clock: Arc<dyn Clock>) -> Self {
        let remaining = presentation.focus_config().total_seconds();
        let mut timer = Self {
            state: TimerState::new(remaining),
            presentation,
            clock,
        };
        timer.refresh_display();
        timer.presentation.set_status(Phase::Idle.status_text());
        timer.presentation.set_inputs_enabled(true);
        info!("Focus timer initialized with {}s", remaining);
        timer
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    /// Whether the recurring evaluation should currently be scheduled
    pub fn is_ticking(&self) -> bool {
        self.state.is_running()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Start or resume the countdown. Returns false when nothing changed.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() {
            debug!("Start ignored, timer already running");
            return false;
        }

        if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.configured_seconds();
        }
        if self.state.remaining_seconds == 0 {
            debug!("Start ignored, no focus duration configured");
            return false;
        }

        let now = self.clock.now();
        if self.state.deadline.is_none() {
            match now.checked_add(Duration::from_secs(self.state.remaining_seconds)) {
                Some(deadline) => self.state.deadline = Some(deadline),
                None => {
                    warn!("Focus duration of {}s is out of range, not starting", self.state.remaining_seconds);
                    return false;
                }
            }
        }
        if self.state.last_break.is_none() {
            self.state.last_break = Some(now);
        }

        self.state.phase = Phase::Running;
        self.presentation.set_status(Phase::Running.status_text());
        self.presentation.set_inputs_enabled(false);
        info!("Focus timer running with {}s left", self.state.remaining_seconds);
        true
    }

    /// Freeze the countdown. Returns false when the timer was not running.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            debug!("Pause ignored, timer not running");
            return false;
        }

        // Stop ticking before touching the countdown fields
        self.state.phase = Phase::Paused;

        if let Some(deadline) = self.state.deadline.take() {
            let remaining = ceil_seconds(deadline.saturating_duration_since(self.clock.now()));
            if remaining != self.state.remaining_seconds {
                self.state.remaining_seconds = remaining;
                self.refresh_display();
            }
        }

        self.presentation.set_status(Phase::Paused.status_text());
        self.presentation.set_inputs_enabled(true);
        info!("Focus timer paused with {}s left", self.state.remaining_seconds);
        true
    }

    /// Stop everything and reload the configured duration
    pub fn reset(&mut self) {
        self.state.phase = Phase::Idle;
        self.state.deadline = None;
        self.state.remaining_seconds = self.configured_seconds();
        self.state.last_break = None;
        self.state.break_prompt = false;

        self.refresh_display();
        self.presentation.set_modal_visible(Modal::Break, false);
        self.presentation.stop_sound(Cue::WaterBreak);
        self.presentation.set_status(Phase::Idle.status_text());
        self.presentation.set_inputs_enabled(true);
        info!("Focus timer reset to {}s", self.state.remaining_seconds);
    }

    /// Dismiss the break prompt and resume with a fresh deadline.
    ///
    /// The time spent on the prompt is not charged to the session because the
    /// deadline is recomputed from the frozen remaining seconds. Returns false
    /// when no break prompt is pending.
    pub fn acknowledge_break(&mut self) -> bool {
        if !self.state.break_prompt {
            debug!("Break acknowledgement ignored, no break pending");
            return false;
        }

        self.state.break_prompt = false;
        self.presentation.set_modal_visible(Modal::Break, false);
        self.presentation.stop_sound(Cue::WaterBreak);

        self.state.last_break = Some(self.clock.now());
        self.state.deadline = None;
        info!("Break acknowledged, resuming focus session");
        self.start()
    }

    /// Dismiss the end-of-session notice, returning an expired timer to idle
    pub fn acknowledge_expiry(&mut self) -> bool {
        self.presentation.stop_sound(Cue::TimerEnd);
        self.presentation.set_modal_visible(Modal::Expiry, false);

        if self.state.phase != Phase::Expired {
            return false;
        }

        self.state.phase = Phase::Idle;
        self.state.remaining_seconds = self.configured_seconds();
        self.refresh_display();
        self.presentation.set_status(Phase::Idle.status_text());
        true
    }

    /// Apply a focus-duration edit; only an idle or expired timer picks it up
    pub fn on_focus_input_change(&mut self) -> bool {
        match self.state.phase {
            Phase::Idle | Phase::Expired => {
                self.state.remaining_seconds = self.configured_seconds();
                self.refresh_display();
                debug!("Focus input changed: {}s", self.state.remaining_seconds);
                true
            }
            Phase::Running | Phase::Paused => {
                debug!("Focus input change deferred until reset");
                false
            }
        }
    }

    /// One pass of the recurring evaluation.
    ///
    /// The break check runs before the expiry check, and a pass that raises a
    /// break never also expires the session.
    pub fn evaluate(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Stopped;
        }
        let Some(deadline) = self.state.deadline else {
            return TickOutcome::Stopped;
        };

        let now = self.clock.now();
        let remaining = deadline.saturating_duration_since(now);
        let remaining_seconds = ceil_seconds(remaining);

        if remaining_seconds != self.state.remaining_seconds {
            self.state.remaining_seconds = remaining_seconds;
            self.refresh_display();
        }

        if self.break_due(now) {
            self.pause();
            self.state.last_break = Some(now);
            self.state.break_prompt = true;
            self.presentation.set_modal_visible(Modal::Break, true);
            self.presentation.stop_sound(Cue::WaterBreak);
            self.presentation.play_sound(Cue::WaterBreak);
            info!("Break due with {}s of focus left", self.state.remaining_seconds);
            return TickOutcome::BreakDue {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        if remaining.is_zero() {
            self.expire();
            return TickOutcome::Expired;
        }

        TickOutcome::Counting { remaining_seconds }
    }

    fn expire(&mut self) {
        self.state.phase = Phase::Expired;
        self.state.deadline = None;
        self.state.remaining_seconds = 0;

        self.presentation.set_status(Phase::Expired.status_text());
        self.presentation.set_inputs_enabled(true);
        self.presentation.stop_sound(Cue::TimerEnd);
        self.presentation.play_sound(Cue::TimerEnd);
        self.presentation.set_modal_visible(Modal::Expiry, true);
        info!("Focus session complete");
    }

    fn break_due(&self, now: Instant) -> bool {
        let config = self.presentation.break_config();
        if !config.is_active() || self.state.remaining_seconds == 0 {
            return false;
        }
        let Some(last_break) = self.state.last_break else {
            return false;
        };
        now.saturating_duration_since(last_break) >= Duration::from_secs(config.interval_seconds())
    }

    fn configured_seconds(&self) -> u64 {
        self.presentation.focus_config().total_seconds()
    }

    fn refresh_display(&mut self) {
        let text = format_hms(self.state.remaining_seconds);
        self.presentation.display_time(&text);
    }
}
