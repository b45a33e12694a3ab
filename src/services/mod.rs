//! External service module
//! 
//! Sound playback through an external player program and the gate that
//! unlocks audio on the first user gesture.

pub mod audio;
pub mod audio_unlock;

// Re-export main types
pub use audio::{CommandPlayer, SoundPlayer};
pub use audio_unlock::{AudioUnlocker, Gesture, UnlockOutcome};
