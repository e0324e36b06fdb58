//! State management module
//!
//! This module contains the shared application state and the display-frame
//! payload published to observers.

pub mod app_state;
pub mod display;

// Re-export main types
pub use app_state::{AppState, TimerCommand};
pub use display::DisplayFrame;
