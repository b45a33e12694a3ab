//! Focus Timer - A deadline-based focus countdown with break reminders
//! 
//! This library provides the focus timer state machine, the presentation
//! panel it drives, audio cue handling and the HTTP API that controls it.

pub mod config;
pub mod state;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use timer::FocusTimer;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
