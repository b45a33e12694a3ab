//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{BreakConfig, FocusConfig, Panel, PanelView, Phase};
use crate::{
    services::{AudioUnlocker, Gesture, SoundPlayer, UnlockOutcome},
    timer::{Clock, Cue, FocusTimer, Modal, Presentation, TickOutcome},
};

/// Snapshot of the timer and its presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub break_prompt: bool,
    pub audio_unlocked: bool,
    pub panel: PanelView,
}

/// Shared handle owning the single focus timer and everything around it
pub struct AppState {
    /// The focus timer and its presentation surface
    pub timer: Arc<Mutex<FocusTimer<Panel>>>,
    /// Gesture listeners and audio unlock status
    pub audio: Arc<Mutex<AudioUnlocker>>,
    pub player: Arc<dyn SoundPlayer>,
    /// Evaluation period while the timer runs
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Whether the recurring evaluation should run
    pub ticking_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    pub _ticking_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create the application state with an idle timer loaded from the given settings
    pub fn new(
        port: u16,
        host: String,
        focus: FocusConfig,
        break_config: BreakConfig,
        player: Arc<dyn SoundPlayer>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        let panel = Panel::new(focus, break_config, Arc::clone(&player));
        let timer = FocusTimer::new(panel, clock);
        let (ticking_tx, ticking_rx) = watch::channel(false);

        Self {
            timer: Arc::new(Mutex::new(timer)),
            audio: Arc::new(Mutex::new(AudioUnlocker::new())),
            player,
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            ticking_tx,
            _ticking_rx: ticking_rx,
        }
    }

    /// Run an operation on the timer, then publish whether it should keep ticking
    pub fn with_timer<F, R>(&self, action: Option<&str>, operation: F) -> Result<R, String>
    where
        F: FnOnce(&mut FocusTimer<Panel>) -> R,
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let result = operation(&mut *timer);
        let ticking = timer.is_ticking();
        drop(timer); // Release the lock early

        if let Some(action) = action {
            self.record_action(action);
        }

        self.ticking_tx.send_if_modified(|current| {
            if *current != ticking {
                debug!("Ticking changed to {}", ticking);
                *current = ticking;
                true
            } else {
                false
            }
        });

        Ok(result)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    pub fn start(&self) -> Result<bool, String> {
        self.with_timer(Some("start"), |timer| timer.start())
    }

    pub fn pause(&self) -> Result<bool, String> {
        self.with_timer(Some("pause"), |timer| timer.pause())
    }

    pub fn reset(&self) -> Result<(), String> {
        self.with_timer(Some("reset"), |timer| timer.reset())
    }

    pub fn acknowledge_break(&self) -> Result<bool, String> {
        self.with_timer(Some("break-ack"), |timer| timer.acknowledge_break())
    }

    pub fn acknowledge_expiry(&self) -> Result<bool, String> {
        self.with_timer(Some("expiry-ack"), |timer| timer.acknowledge_expiry())
    }

    /// One tick of the recurring evaluation
    pub fn evaluate(&self) -> Result<TickOutcome, String> {
        self.with_timer(None, |timer| timer.evaluate())
    }

    /// Edit the focus inputs. Returns false when the inputs are disabled.
    pub fn update_focus_settings(&self, focus: FocusConfig) -> Result<bool, String> {
        self.with_timer(Some("focus-settings"), |timer| {
            if !timer.presentation_mut().set_focus(focus) {
                return false;
            }
            timer.on_focus_input_change();
            true
        })
    }

    /// Edit the break inputs. Returns false when the inputs are disabled.
    pub fn update_break_settings(&self, break_config: BreakConfig) -> Result<bool, String> {
        self.with_timer(Some("break-settings"), |timer| {
            timer.presentation_mut().set_break(break_config)
        })
    }

    /// Feed a user gesture to the audio unlock listeners
    pub fn register_gesture(&self, gesture: Gesture) -> Result<UnlockOutcome, String> {
        let outcome = self.audio.lock()
            .map_err(|e| format!("Failed to lock audio state: {}", e))?
            .on_gesture(gesture, self.player.as_ref());

        if outcome == UnlockOutcome::Unlocked {
            self.set_sound_prompt(false)?;
        }
        Ok(outcome)
    }

    /// Manual "enable sound" request
    pub fn enable_sound(&self) -> Result<UnlockOutcome, String> {
        let outcome = self.audio.lock()
            .map_err(|e| format!("Failed to lock audio state: {}", e))?
            .request_enable(self.player.as_ref());

        if outcome == UnlockOutcome::Unlocked {
            self.set_sound_prompt(false)?;
        }
        Ok(outcome)
    }

    /// Run the deferred probe for every cue and record the result
    pub async fn finish_audio_unlock(&self) -> Result<bool, String> {
        let mut result = Ok(());
        for cue in Cue::ALL {
            if let Err(e) = self.player.verify(cue).await {
                result = Err(e);
                break;
            }
        }

        let unlocked = self.audio.lock()
            .map_err(|e| format!("Failed to lock audio state: {}", e))?
            .finish_deferred(result);

        self.set_sound_prompt(!unlocked)?;
        Ok(unlocked)
    }

    fn set_sound_prompt(&self, visible: bool) -> Result<(), String> {
        self.with_timer(None, |timer| {
            timer.presentation_mut().set_modal_visible(Modal::Sound, visible)
        })
    }

    pub fn audio_unlocked(&self) -> bool {
        match self.audio.lock() {
            Ok(audio) => audio.is_unlocked(),
            Err(e) => {
                warn!("Failed to lock audio state: {}", e);
                false
            }
        }
    }

    /// Get the current timer and presentation state
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        let audio_unlocked = self.audio_unlocked();
        let timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        Ok(TimerSnapshot {
            phase: timer.phase(),
            remaining_seconds: timer.remaining_seconds(),
            break_prompt: timer.state().break_prompt,
            audio_unlocked,
            panel: timer.presentation().view(),
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Log where the timer stands, used once at startup
    pub fn log_initial_state(&self) {
        match self.snapshot() {
            Ok(snapshot) => info!(
                "Timer {:?} at {} (break reminders {})",
                snapshot.phase,
                snapshot.panel.display,
                if snapshot.panel.break_config.is_active() { "on" } else { "off" }
            ),
            Err(e) => warn!("Failed to read initial timer state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;
    use futures::future::BoxFuture;

    struct SilentPlayer;

    impl SoundPlayer for SilentPlayer {
        fn play(&self, _cue: Cue) -> Result<(), String> {
            Ok(())
        }
        fn stop(&self, _cue: Cue) {}
        fn probe(&self, _cue: Cue) -> Result<(), String> {
            Ok(())
        }
        fn verify(&self, _cue: Cue) -> BoxFuture<'static, Result<(), String>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn state(seconds: u64) -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            FocusConfig::new(0, 0, seconds),
            BreakConfig::disabled(),
            Arc::new(SilentPlayer),
            clock.clone(),
            Duration::from_millis(250),
        );
        (state, clock)
    }

    #[test]
    fn ticking_flag_follows_transitions() {
        let (state, clock) = state(2);
        let rx = state.ticking_tx.subscribe();
        assert!(!*rx.borrow());

        assert!(state.start().unwrap());
        assert!(*rx.borrow());

        assert!(state.pause().unwrap());
        assert!(!*rx.borrow());

        state.start().unwrap();
        clock.advance(Duration::from_secs(3));
        assert_eq!(state.evaluate().unwrap(), TickOutcome::Expired);
        assert!(!*rx.borrow());
    }

    #[test]
    fn settings_are_locked_while_running() {
        let (state, _) = state(30);
        state.start().unwrap();
        assert!(!state.update_focus_settings(FocusConfig::new(0, 1, 0)).unwrap());
        assert!(!state.update_break_settings(BreakConfig::new(true, 0, 0, 5)).unwrap());

        state.pause().unwrap();
        assert!(state.update_focus_settings(FocusConfig::new(0, 1, 0)).unwrap());
        // Paused timers keep their remaining time until reset
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 30);

        state.reset().unwrap();
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 60);
    }

    #[test]
    fn idle_focus_edit_refreshes_display() {
        let (state, _) = state(30);
        assert!(state.update_focus_settings(FocusConfig::new(1, 2, 3)).unwrap());
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, 3723);
        assert_eq!(snapshot.panel.display, "01:02:03");
    }

    #[test]
    fn gesture_unlocks_audio_once() {
        let (state, _) = state(30);
        assert_eq!(state.register_gesture(Gesture::Click).unwrap(), UnlockOutcome::Unlocked);
        assert!(state.audio_unlocked());
        assert_eq!(
            state.register_gesture(Gesture::Touch).unwrap(),
            UnlockOutcome::AlreadyUnlocked
        );
    }

    #[test]
    fn actions_are_recorded() {
        let (state, _) = state(30);
        state.start().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
    struct BlockedPlayer;

    impl SoundPlayer for BlockedPlayer {
        fn play(&self, _cue: Cue) -> Result<(), String> {
            Err("playback blocked".to_string())
        }
        fn stop(&self, _cue: Cue) {}
        fn probe(&self, _cue: Cue) -> Result<(), String> {
            Err("playback blocked".to_string())
        }
        fn verify(&self, _cue: Cue) -> BoxFuture<'static, Result<(), String>> {
            Box::pin(async { Err("playback blocked".to_string()) })
        }
    }

    #[tokio::test]
    async fn failed_deferred_unlock_shows_sound_prompt() {
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            FocusConfig::new(0, 0, 30),
            BreakConfig::disabled(),
            Arc::new(BlockedPlayer),
            Arc::new(ManualClock::new()),
            Duration::from_millis(250),
        );

        assert_eq!(state.register_gesture(Gesture::Click).unwrap(), UnlockOutcome::Deferred);
        assert!(!state.finish_audio_unlock().await.unwrap());
        assert!(state.snapshot().unwrap().panel.sound_prompt);
        assert!(!state.audio_unlocked());
    }

    #[test]
    fn unlocking_hides_sound_prompt() {
        let (state, _) = state(30);
        state
            .with_timer(None, |timer| timer.presentation_mut().set_modal_visible(Modal::Sound, true))
            .unwrap();
        assert!(state.snapshot().unwrap().panel.sound_prompt);

        assert_eq!(state.enable_sound().unwrap(), UnlockOutcome::Unlocked);
        assert!(!state.snapshot().unwrap().panel.sound_prompt);
    }
}
