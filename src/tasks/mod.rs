//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod focus_tick;

// Re-export main functions
pub use focus_tick::focus_tick_task;
