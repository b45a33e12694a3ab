//! Focus and break settings as entered in the configuration inputs

use serde::{Deserialize, Serialize};

use crate::utils::parse_field;

/// Convert raw hour/minute/second fields into a total second count
fn total_seconds(hours: &str, minutes: &str, seconds: &str) -> u64 {
    parse_field(hours)
        .saturating_mul(3600)
        .saturating_add(parse_field(minutes).saturating_mul(60))
        .saturating_add(parse_field(seconds))
}

/// Focus session length, kept as the raw text of the three inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl FocusConfig {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours: hours.to_string(),
            minutes: minutes.to_string(),
            seconds: seconds.to_string(),
        }
    }

    /// Configured session length; unparsable fields count as zero
    pub fn total_seconds(&self) -> u64 {
        total_seconds(&self.hours, &self.minutes, &self.seconds)
    }
}

/// Break reminder toggle and interval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakConfig {
    pub enabled: bool,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl BreakConfig {
    pub fn new(enabled: bool, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            enabled,
            hours: hours.to_string(),
            minutes: minutes.to_string(),
            seconds: seconds.to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, 0, 0, 0)
    }

    pub fn interval_seconds(&self) -> u64 {
        total_seconds(&self.hours, &self.minutes, &self.seconds)
    }

    /// Reminders only fire when enabled with a non-zero interval
    pub fn is_active(&self) -> bool {
        self.enabled && self.interval_seconds() > 0
    }
}
