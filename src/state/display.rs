//! Display frame structure published to the display surface

use serde::{Deserialize, Serialize};

use crate::timer::{format_clock, Phase, PhaseTimer};

/// What a display needs to render the timer: phase, clock face, running flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub phase: Phase,
    pub clock: String,
    pub running: bool,
}

impl DisplayFrame {
    /// Frame for an idle timer
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            clock: format_clock(0),
            running: false,
        }
    }

    /// Snapshot a frame from the current timer state
    pub fn from_timer(timer: &PhaseTimer) -> Self {
        Self {
            phase: timer.phase,
            clock: format_clock(timer.remaining_seconds),
            running: timer.phase.is_running(),
        }
    }
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TimerSettings;

    #[test]
    fn idle_frame_shows_a_zero_clock() {
        let frame = DisplayFrame::idle();
        assert_eq!(frame.phase, Phase::Idle);
        assert_eq!(frame.clock, "00:00");
        assert!(!frame.running);
    }

    #[test]
    fn frame_reflects_a_running_timer() {
        let mut timer = PhaseTimer::new();
        timer.start(TimerSettings::default());
        timer.tick();

        let frame = DisplayFrame::from_timer(&timer);
        assert_eq!(frame.phase, Phase::Work);
        assert_eq!(frame.clock, "24:59");
        assert!(frame.running);
    }
}
