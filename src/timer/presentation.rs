//! Presentation capability injected into the focus timer

use serde::{Deserialize, Serialize};

use crate::state::{BreakConfig, FocusConfig};

/// Modal dialogs the timer can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modal {
    /// Break reminder, dismissed by acknowledging the break
    Break,
    /// End-of-session notice
    Expiry,
    /// "Enable sound" prompt shown while audio is blocked
    Sound,
}

/// Notification sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    TimerEnd,
    WaterBreak,
}

impl Cue {
    pub const ALL: [Cue; 2] = [Cue::TimerEnd, Cue::WaterBreak];

    pub fn name(&self) -> &'static str {
        match self {
            Cue::TimerEnd => "timer-end",
            Cue::WaterBreak => "water-break",
        }
    }
}

/// Everything the timer reads from or shows to the user.
///
/// Config getters are called on every evaluation, so edits made through the
/// surface take effect on the next tick without the timer caching them.
pub trait Presentation {
    fn focus_config(&self) -> FocusConfig;
    fn break_config(&self) -> BreakConfig;
    fn display_time(&mut self, text: &str);
    fn set_status(&mut self, text: &str);
    fn set_modal_visible(&mut self, modal: Modal, visible: bool);
    fn set_inputs_enabled(&mut self, enabled: bool);
    fn play_sound(&mut self, cue: Cue);
    /// Stop a cue and rewind it
    fn stop_sound(&mut self, cue: Cue);
}
