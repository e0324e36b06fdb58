//! Phase timer module
//!
//! This module contains the countdown state machine and its supporting
//! vocabulary: phases, notification cues, and clock formatting.

pub mod clock;
pub mod cue;
pub mod engine;
pub mod phase;

// Re-export main types
pub use clock::format_clock;
pub use cue::Cue;
pub use engine::PhaseTimer;
pub use phase::Phase;
