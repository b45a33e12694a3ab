//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The command changed the timer
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied".to_string(), message, timer)
    }

    /// The command was a no-op in the current state
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored".to_string(), message, timer)
    }

    /// Pick applied or ignored from a transition result
    pub fn from_transition(changed: bool, applied: &str, ignored: &str, timer: TimerSnapshot) -> Self {
        if changed {
            Self::applied(applied.to_string(), timer)
        } else {
            Self::ignored(ignored.to_string(), timer)
        }
    }
}

/// Full status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
