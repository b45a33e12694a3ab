//! Configuration and CLI argument handling

use std::{collections::HashMap, path::PathBuf, time::Duration};
use clap::Parser;

use crate::{
    state::{BreakConfig, FocusConfig},
    timer::{Cue, TICK_INTERVAL},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A focus timer daemon with break reminders and a JSON control API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial focus duration, hours part
    #[arg(long, default_value = "0")]
    pub focus_hours: u64,

    /// Initial focus duration, minutes part
    #[arg(long, default_value = "25")]
    pub focus_minutes: u64,

    /// Initial focus duration, seconds part
    #[arg(long, default_value = "0")]
    pub focus_seconds: u64,

    /// Enable water break reminders
    #[arg(short, long)]
    pub breaks: bool,

    /// Break interval, hours part
    #[arg(long, default_value = "0")]
    pub break_hours: u64,

    /// Break interval, minutes part
    #[arg(long, default_value = "20")]
    pub break_minutes: u64,

    /// Break interval, seconds part
    #[arg(long, default_value = "0")]
    pub break_seconds: u64,

    /// Evaluation period in milliseconds while the timer runs
    #[arg(long, default_value_t = TICK_INTERVAL.as_millis() as u64)]
    pub tick_ms: u64,

    /// Program used to play sound files
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Sound played when the focus session ends
    #[arg(long)]
    pub end_sound: Option<PathBuf>,

    /// Sound played when a break is due
    #[arg(long)]
    pub break_sound: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn focus(&self) -> FocusConfig {
        FocusConfig::new(self.focus_hours, self.focus_minutes, self.focus_seconds)
    }

    pub fn break_config(&self) -> BreakConfig {
        BreakConfig::new(self.breaks, self.break_hours, self.break_minutes, self.break_seconds)
    }

    /// Tick period, never shorter than one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Sound file per cue, for the cues that have one
    pub fn sounds(&self) -> HashMap<Cue, PathBuf> {
        let mut sounds = HashMap::new();
        if let Some(path) = &self.end_sound {
            sounds.insert(Cue::TimerEnd, path.clone());
        }
        if let Some(path) = &self.break_sound {
            sounds.insert(Cue::WaterBreak, path.clone());
        }
        sounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_pomodoro() {
        let config = Config::try_parse_from(["focus-timer"]).unwrap();
        assert_eq!(config.focus().total_seconds(), 25 * 60);
        assert!(!config.break_config().enabled);
        assert_eq!(config.break_config().interval_seconds(), 20 * 60);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert!(config.sounds().is_empty());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "focus-timer",
            "--focus-minutes", "50",
            "--breaks",
            "--break-seconds", "30",
            "--break-minutes", "0",
            "--end-sound", "/tmp/end.wav",
            "--tick-ms", "0",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.focus().total_seconds(), 50 * 60);
        assert!(config.break_config().is_active());
        assert_eq!(config.break_config().interval_seconds(), 30);
        assert_eq!(config.sounds().get(&Cue::TimerEnd), Some(&PathBuf::from("/tmp/end.wav")));
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
        assert_eq!(config.log_level(), "debug");
    }
}
