//! State management module
//! 
//! Timer bookkeeping, user settings, the presentation panel and the shared
//! application state handle.

pub mod app_state;
pub mod panel;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerSnapshot};
pub use panel::{Panel, PanelView};
pub use settings::{BreakConfig, FocusConfig};
pub use timer_state::{Phase, TimerState};
