//! Focus timer core
//! 
//! The deadline-based countdown state machine and the seams it talks through:
//! a clock for "now" and a presentation surface for every visible effect.

pub mod clock;
pub mod focus_timer;
pub mod presentation;

use std::time::Duration;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use focus_timer::{FocusTimer, TickOutcome};
pub use presentation::{Cue, Modal, Presentation};

/// How often a running timer asks to be re-evaluated
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);
