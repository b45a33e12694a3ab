//! Audio unlock on the first user gesture
//!
//! Playback may be refused until a user has interacted with the surface. One
//! listener per gesture kind waits for the first interaction and probes every
//! cue; once a probe succeeds all listeners are dropped and later gestures are
//! ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::audio::SoundPlayer;
use crate::timer::Cue;

/// Kind of user interaction that may unlock audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Touch,
    Click,
    Key,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::Touch, Gesture::Click, Gesture::Key];

    /// Parse a gesture name, as sent in the `X-Gesture` header
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "touch" | "touchstart" => Some(Gesture::Touch),
            "click" => Some(Gesture::Click),
            "key" | "keydown" => Some(Gesture::Key),
            _ => None,
        }
    }
}

/// What a gesture or enable request did to the audio gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Audio was unlocked by this call
    Unlocked,
    /// Audio had already been unlocked
    AlreadyUnlocked,
    /// No listener for this gesture is armed any more
    NotListening,
    /// Immediate probe failed; a deferred probe should be attempted
    Deferred,
}

/// Tracks armed gesture listeners and whether audio is unlocked
#[derive(Debug)]
pub struct AudioUnlocker {
    listeners: Vec<Gesture>,
    unlocked: bool,
    failed_attempts: u32,
}

impl AudioUnlocker {
    /// Create a locked gate with a listener armed for every gesture kind
    pub fn new() -> Self {
        Self {
            listeners: Gesture::ALL.to_vec(),
            unlocked: false,
            failed_attempts: 0,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn is_listening(&self, gesture: Gesture) -> bool {
        self.listeners.contains(&gesture)
    }

    /// Feed a user gesture through its one-time listener
    pub fn on_gesture(&mut self, gesture: Gesture, player: &dyn SoundPlayer) -> UnlockOutcome {
        if self.unlocked {
            return UnlockOutcome::AlreadyUnlocked;
        }
        if !self.is_listening(gesture) {
            return UnlockOutcome::NotListening;
        }

        self.listeners.retain(|armed| *armed != gesture);
        debug!("Audio unlock listener fired for {:?}", gesture);
        self.attempt(player)
    }

    /// Manual "enable sound" request; probes even after listeners are gone
    pub fn request_enable(&mut self, player: &dyn SoundPlayer) -> UnlockOutcome {
        if self.unlocked {
            return UnlockOutcome::AlreadyUnlocked;
        }
        self.attempt(player)
    }

    /// Record the result of a deferred probe. Returns true when audio is unlocked.
    pub fn finish_deferred(&mut self, result: Result<(), String>) -> bool {
        if self.unlocked {
            return true;
        }

        match result {
            Ok(()) => {
                self.mark_unlocked();
                info!("Audio unlocked by deferred probe");
                true
            }
            Err(e) => {
                self.failed_attempts += 1;
                warn!("Audio unlock attempt {} failed: {}", self.failed_attempts, e);
                false
            }
        }
    }

    fn attempt(&mut self, player: &dyn SoundPlayer) -> UnlockOutcome {
        let probed = Cue::ALL.iter().try_for_each(|cue| {
            let result = player.probe(*cue);
            player.stop(*cue);
            result
        });

        match probed {
            Ok(()) => {
                self.mark_unlocked();
                info!("Audio unlocked during user gesture");
                UnlockOutcome::Unlocked
            }
            Err(e) => {
                debug!("Immediate audio unlock failed, deferring: {}", e);
                UnlockOutcome::Deferred
            }
        }
    }

    fn mark_unlocked(&mut self) {
        self.unlocked = true;
        self.listeners.clear();
    }
}

impl Default for AudioUnlocker {
    fn default() -> Self {
        Self::new()
    }
}
