//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod cadence;

// Re-export main functions
pub use cadence::cadence_task;
