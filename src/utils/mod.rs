//! Utility functions module
//! 
//! Formatting, lenient field parsing and signal handling shared across the daemon.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_hms, parse_field};
pub use signals::shutdown_signal;
