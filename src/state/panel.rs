//! In-memory presentation surface served over the API

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{BreakConfig, FocusConfig};
use crate::{
    services::SoundPlayer,
    timer::{Cue, Modal, Presentation},
};

/// Snapshot of everything a client needs to render the timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelView {
    pub display: String,
    pub status: String,
    pub break_modal: bool,
    pub expiry_modal: bool,
    pub sound_prompt: bool,
    pub inputs_enabled: bool,
    pub focus: FocusConfig,
    #[serde(rename = "break")]
    pub break_config: BreakConfig,
}

/// Presentation state held by the daemon; clients poll it and edit its inputs
pub struct Panel {
    focus: FocusConfig,
    break_config: BreakConfig,
    display: String,
    status: String,
    break_modal: bool,
    expiry_modal: bool,
    sound_prompt: bool,
    inputs_enabled: bool,
    player: Arc<dyn SoundPlayer>,
}

impl Panel {
    pub fn new(focus: FocusConfig, break_config: BreakConfig, player: Arc<dyn SoundPlayer>) -> Self {
        Self {
            focus,
            break_config,
            display: String::new(),
            status: String::new(),
            break_modal: false,
            expiry_modal: false,
            sound_prompt: false,
            inputs_enabled: true,
            player,
        }
    }

    pub fn inputs_enabled(&self) -> bool {
        self.inputs_enabled
    }

    /// Replace the focus inputs. Returns false when the inputs are disabled.
    pub fn set_focus(&mut self, focus: FocusConfig) -> bool {
        if !self.inputs_enabled {
            return false;
        }
        self.focus = focus;
        true
    }

    /// Replace the break inputs. Returns false when the inputs are disabled.
    pub fn set_break(&mut self, break_config: BreakConfig) -> bool {
        if !self.inputs_enabled {
            return false;
        }
        self.break_config = break_config;
        true
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            display: self.display.clone(),
            status: self.status.clone(),
            break_modal: self.break_modal,
            expiry_modal: self.expiry_modal,
            sound_prompt: self.sound_prompt,
            inputs_enabled: self.inputs_enabled,
            focus: self.focus.clone(),
            break_config: self.break_config.clone(),
        }
    }
}

impl Presentation for Panel {
    fn focus_config(&self) -> FocusConfig {
        self.focus.clone()
    }

    fn break_config(&self) -> BreakConfig {
        self.break_config.clone()
    }

    fn display_time(&mut self, text: &str) {
        self.display = text.to_string();
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_modal_visible(&mut self, modal: Modal, visible: bool) {
        match modal {
            Modal::Break => self.break_modal = visible,
            Modal::Expiry => self.expiry_modal = visible,
            Modal::Sound => self.sound_prompt = visible,
        }
    }

    fn set_inputs_enabled(&mut self, enabled: bool) {
        self.inputs_enabled = enabled;
    }

    fn play_sound(&mut self, cue: Cue) {
        if let Err(e) = self.player.play(cue) {
            // Degrade to a silent notification and ask the user to enable sound
            warn!("Error playing {}: {}", cue.name(), e);
            self.sound_prompt = true;
        }
    }

    fn stop_sound(&mut self, cue: Cue) {
        self.player.stop(cue);
    }
}
