//! Timer phase definitions

use serde::{Deserialize, Serialize};

/// The four phases of the pacing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Stable lowercase name used in logs and event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Work => "work",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        }
    }

    /// Check if this phase has an active countdown
    pub fn is_running(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}
