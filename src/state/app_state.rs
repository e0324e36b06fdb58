//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    notify::Notifier,
    settings::{SettingsStore, TimerSettings},
    timer::PhaseTimer,
};

use super::DisplayFrame;

/// Commands that arm and disarm the cadence task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Stop,
}

/// Main application state that owns the timer, its settings, and the channels
#[derive(Debug)]
pub struct AppState {
    /// The phase timer state machine
    pub timer: Arc<Mutex<PhaseTimer>>,
    /// Current settings, already merged over defaults
    pub settings: Arc<Mutex<TimerSettings>>,
    /// On-disk settings persistence
    pub store: SettingsStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Commands for the cadence task
    pub command_tx: broadcast::Sender<TimerCommand>,
    /// Display frames published every tick and on phase changes
    pub display_tx: watch::Sender<DisplayFrame>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayFrame>,
    /// Notification sink for phase-entry cues
    pub notifier: Notifier,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, store: SettingsStore, settings: TimerSettings) -> Self {
        let (command_tx, _) = broadcast::channel(100);
        let (display_tx, display_rx) = watch::channel(DisplayFrame::idle());

        Self {
            timer: Arc::new(Mutex::new(PhaseTimer::new())),
            settings: Arc::new(Mutex::new(settings)),
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            command_tx,
            display_tx,
            _display_rx: display_rx,
            notifier: Notifier::new(),
        }
    }

    /// Start a work session from the stored settings
    ///
    /// Restarting while running resets the session and rearms the cadence.
    /// Locks settings before timer, the same order `save_settings` uses, so
    /// a start serializes wholly before or wholly after a settings save.
    pub fn start_timer(&self) -> Result<DisplayFrame, String> {
        let settings = self.settings.lock()
            .map_err(|e| format!("Failed to lock settings: {}", e))?;
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        let cue = timer.start(settings.clone());
        drop(settings);

        let phase = timer.phase;
        let frame = DisplayFrame::from_timer(&timer);
        drop(timer); // Release the lock before fanning out

        info!("Work session started");
        self.record_action("start");
        self.publish_frame(frame.clone());
        self.notifier.fire(cue, phase);
        self.send_command(TimerCommand::Start);

        Ok(frame)
    }

    /// Stop the timer and disarm the cadence; idempotent
    pub fn stop_timer(&self) -> Result<DisplayFrame, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        timer.stop();
        let frame = DisplayFrame::from_timer(&timer);
        drop(timer);

        info!("Timer stopped");
        self.record_action("stop");
        self.publish_frame(frame.clone());
        self.send_command(TimerCommand::Stop);

        Ok(frame)
    }

    /// Advance the timer by one tick and publish the outcome
    ///
    /// Returns whether a session is still in flight, so the cadence task
    /// knows when to disarm.
    pub fn advance_timer(&self) -> Result<bool, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        let cue = timer.tick();
        let phase = timer.phase;
        let frame = DisplayFrame::from_timer(&timer);
        drop(timer);

        debug!("Tick: {} with {} remaining", phase.as_str(), frame.clock);
        self.publish_frame(frame);
        if let Some(cue) = cue {
            self.notifier.fire(cue, phase);
        }

        Ok(phase.is_running())
    }

    /// Replace the stored settings and persist them
    ///
    /// A running session is stopped under the same locks that install the new
    /// settings, so the stop cannot interleave with a concurrent start. Returns
    /// the stored settings and whether a session was stopped. A failed write is
    /// logged and does not fail the save; the new settings stay in effect for
    /// this process either way.
    pub fn save_settings(
        &self,
        new_settings: TimerSettings,
    ) -> Result<(TimerSettings, bool), String> {
        let mut settings = self.settings.lock()
            .map_err(|e| format!("Failed to lock settings: {}", e))?;
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        // No mid-session parameter changes: a running timer stops first.
        let stopped_timer = timer.is_running();
        if stopped_timer {
            timer.stop();
        }
        let frame = DisplayFrame::from_timer(&timer);
        drop(timer);

        *settings = new_settings;
        let saved = settings.clone();
        drop(settings);

        if stopped_timer {
            info!("Settings saved while running, timer stopped");
            self.publish_frame(frame);
            self.send_command(TimerCommand::Stop);
        }

        self.record_action("save-settings");
        if let Err(e) = self.store.save(&saved) {
            warn!("Settings not persisted: {}", e);
        }

        Ok((saved, stopped_timer))
    }

    /// Get the current settings
    pub fn get_settings(&self) -> Result<TimerSettings, String> {
        self.settings.lock()
            .map(|settings| settings.clone())
            .map_err(|e| format!("Failed to lock settings: {}", e))
    }

    /// Get a snapshot of the timer state
    pub fn get_timer(&self) -> Result<PhaseTimer, String> {
        self.timer.lock()
            .map(|timer| timer.clone())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Check if a session is in flight
    pub fn is_running(&self) -> Result<bool, String> {
        self.timer.lock()
            .map(|timer| timer.is_running())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish_frame(&self, frame: DisplayFrame) {
        if let Err(e) = self.display_tx.send(frame) {
            warn!("Failed to publish display frame: {}", e);
        }
    }

    fn send_command(&self, command: TimerCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("No cadence task listening for timer commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Cue, Phase};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_TEMP_FILE: AtomicUsize = AtomicUsize::new(0);

    fn test_state() -> AppState {
        let sequence = NEXT_TEMP_FILE.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "workpace-state-test-{}-{}.json",
            std::process::id(),
            sequence
        ));
        AppState::new(
            20721,
            "127.0.0.1".to_string(),
            SettingsStore::new(path),
            TimerSettings::default(),
        )
    }

    #[test]
    fn start_then_stop_round_trip() {
        let state = test_state();

        let frame = state.start_timer().unwrap();
        assert_eq!(frame.phase, Phase::Work);
        assert_eq!(frame.clock, "25:00");
        assert!(frame.running);
        assert!(state.is_running().unwrap());

        let frame = state.stop_timer().unwrap();
        assert_eq!(frame.phase, Phase::Idle);
        assert!(!frame.running);
        assert!(!state.is_running().unwrap());
    }

    #[test]
    fn stop_while_idle_is_harmless() {
        let state = test_state();
        let frame = state.stop_timer().unwrap();
        assert_eq!(frame.phase, Phase::Idle);
        assert_eq!(frame.clock, "00:00");

        state.stop_timer().unwrap();
        assert!(!state.is_running().unwrap());
    }

    #[test]
    fn advance_reports_whether_a_session_remains() {
        let state = test_state();
        assert!(!state.advance_timer().unwrap());

        state.start_timer().unwrap();
        assert!(state.advance_timer().unwrap());
        assert_eq!(state.get_timer().unwrap().remaining_seconds, 1499);
    }

    #[test]
    fn ticks_publish_display_frames() {
        let state = test_state();
        let mut display_rx = state.display_tx.subscribe();

        state.start_timer().unwrap();
        state.advance_timer().unwrap();

        let frame = display_rx.borrow_and_update().clone();
        assert_eq!(frame.clock, "24:59");
        assert!(frame.running);
    }

    #[test]
    fn cues_reach_notification_subscribers() {
        let state = test_state();
        let mut cue_rx = state.notifier.subscribe();

        state.start_timer().unwrap();
        let event = cue_rx.try_recv().unwrap();
        assert_eq!(event.cue, Cue::WorkStart);
        assert_eq!(event.phase, Phase::Work);

        // Returning to idle is silent.
        state.stop_timer().unwrap();
        assert!(cue_rx.try_recv().is_err());
    }

    #[test]
    fn saved_settings_take_effect_and_persist() {
        let state = test_state();
        let custom = TimerSettings {
            work_duration: 50,
            ..TimerSettings::default()
        };

        let (saved, stopped_timer) = state.save_settings(custom.clone()).unwrap();
        assert_eq!(saved, custom);
        assert!(!stopped_timer);
        assert_eq!(state.get_settings().unwrap(), custom);
        assert_eq!(state.store.load(), custom);

        let frame = state.start_timer().unwrap();
        assert_eq!(frame.clock, "50:00");

        let _ = std::fs::remove_file(state.store.path());
    }

    #[test]
    fn saving_settings_while_running_forces_a_stop() {
        let state = test_state();
        let mut commands = state.command_tx.subscribe();

        state.start_timer().unwrap();
        assert_eq!(commands.try_recv().unwrap(), TimerCommand::Start);

        let custom = TimerSettings {
            work_duration: 30,
            ..TimerSettings::default()
        };
        let (saved, stopped_timer) = state.save_settings(custom.clone()).unwrap();
        assert_eq!(saved, custom);
        assert!(stopped_timer);
        assert!(!state.is_running().unwrap());
        assert_eq!(commands.try_recv().unwrap(), TimerCommand::Stop);

        let _ = std::fs::remove_file(state.store.path());
    }

    #[test]
    fn save_settings_survives_a_failed_write() {
        let sequence = NEXT_TEMP_FILE.fetch_add(1, Ordering::Relaxed);
        let blocker = std::env::temp_dir().join(format!(
            "workpace-state-test-blocker-{}-{}",
            std::process::id(),
            sequence
        ));
        std::fs::write(&blocker, "plain file").unwrap();

        // The parent of the store path is a regular file, so every write fails.
        let state = AppState::new(
            20721,
            "127.0.0.1".to_string(),
            SettingsStore::new(blocker.join("settings.json")),
            TimerSettings::default(),
        );

        let custom = TimerSettings {
            work_duration: 45,
            ..TimerSettings::default()
        };
        let (saved, stopped_timer) = state.save_settings(custom.clone()).unwrap();
        assert_eq!(saved, custom);
        assert!(!stopped_timer);
        assert_eq!(state.get_settings().unwrap(), custom);

        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn actions_are_recorded() {
        let state = test_state();
        assert_eq!(state.get_last_action(), (None, None));

        state.start_timer().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}
