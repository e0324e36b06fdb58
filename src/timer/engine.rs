//! The phase timer state machine
//!
//! Owns all countdown state and phase-transition rules. The engine knows
//! nothing about time sources or sinks: the host calls `tick` once per second
//! and routes returned cues to the notification sink.

use rand::{thread_rng, Rng};

use crate::settings::TimerSettings;

use super::{Cue, Phase};

/// Countdown state machine cycling work, random short breaks, and a long break
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    pub phase: Phase,
    pub remaining_seconds: u64,
    /// Seconds spent working since the session started; break ticks excluded
    pub work_elapsed_seconds: u64,
    /// Work-elapsed mark at which the next short break fires
    pub next_break_threshold: u64,
    /// Work remaining to restore after a short break; meaningful only during one
    pub saved_work_remaining: u64,
    /// Durations snapshotted at session start
    pub settings: TimerSettings,
}

impl PhaseTimer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            work_elapsed_seconds: 0,
            next_break_threshold: 0,
            saved_work_remaining: 0,
            settings: TimerSettings::default(),
        }
    }

    /// Begin a fresh work session with the given settings
    ///
    /// Resets any session in flight.
    pub fn start(&mut self, settings: TimerSettings) -> Cue {
        self.settings = settings;
        self.phase = Phase::Work;
        self.remaining_seconds = self.settings.work_seconds();
        self.work_elapsed_seconds = 0;
        self.saved_work_remaining = 0;
        self.next_break_threshold = self.draw_next_break_threshold();
        Cue::WorkStart
    }

    /// Return to idle; safe to call at any time, including while idle
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_seconds = 0;
    }

    /// Advance the countdown by one second
    ///
    /// A tick that begins with no time remaining completes the current phase
    /// instead of decrementing. Returns the cue for any phase entered.
    pub fn tick(&mut self) -> Option<Cue> {
        if self.phase == Phase::Idle {
            return None;
        }
        if self.remaining_seconds == 0 {
            return self.complete_phase();
        }

        self.remaining_seconds -= 1;
        if self.phase == Phase::Work {
            self.work_elapsed_seconds += 1;
            if self.short_break_due() {
                return Some(self.begin_short_break());
            }
        }
        None
    }

    /// Check if a session is in flight
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    fn complete_phase(&mut self) -> Option<Cue> {
        match self.phase {
            Phase::Work => {
                self.phase = Phase::LongBreak;
                self.remaining_seconds = self.settings.long_break_seconds();
                Some(Cue::Finished)
            }
            Phase::ShortBreak => {
                self.phase = Phase::Work;
                self.remaining_seconds = self.saved_work_remaining;
                self.next_break_threshold = self.draw_next_break_threshold();
                Some(Cue::WorkStart)
            }
            Phase::LongBreak => {
                self.stop();
                None
            }
            Phase::Idle => None,
        }
    }

    /// A short break is due once enough work has elapsed, unless the session
    /// is inside its final stretch where the break could not complete
    fn short_break_due(&self) -> bool {
        self.work_elapsed_seconds >= self.next_break_threshold
            && self.remaining_seconds > self.settings.random_break_duration
    }

    fn begin_short_break(&mut self) -> Cue {
        self.saved_work_remaining = self.remaining_seconds;
        self.phase = Phase::ShortBreak;
        self.remaining_seconds = self.settings.random_break_duration;
        Cue::BreakStart
    }

    /// Draw the work-elapsed mark for the next short break, a uniform
    /// interval past the current mark
    fn draw_next_break_threshold(&self) -> u64 {
        let (low, high) = self.settings.break_window_seconds();
        self.work_elapsed_seconds + thread_rng().gen_range(low..=high)
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}
