//! Workpace - A state-managed HTTP server that paces focus work
//!
//! This library provides a countdown phase timer that alternates work
//! sessions, randomized short breaks, and a closing long break, and exposes
//! it over a small HTTP API with a server-sent event stream for displays.

pub mod config;
pub mod settings;
pub mod timer;
pub mod notify;
pub mod state;
pub mod tasks;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use settings::{SettingsStore, TimerSettings};
pub use timer::{Cue, Phase, PhaseTimer};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
