//! Timer settings and their on-disk persistence

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Durations that shape a work session
///
/// Serialized as a flat camelCase blob. Every field falls back to its
/// documented default independently, so a partial blob merges over defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    /// Length of a work session in minutes
    pub work_duration: u64,
    /// Shortest gap between random breaks in minutes
    pub random_break_min: u64,
    /// Longest gap between random breaks in minutes
    pub random_break_max: u64,
    /// Length of a random break in seconds
    pub random_break_duration: u64,
    /// Length of the closing long break in minutes
    pub long_break_duration: u64,
}

impl TimerSettings {
    /// Work session length in seconds
    pub fn work_seconds(&self) -> u64 {
        self.work_duration * 60
    }

    /// Long break length in seconds
    pub fn long_break_seconds(&self) -> u64 {
        self.long_break_duration * 60
    }

    /// Inclusive window, in seconds, for drawing the next break interval
    pub fn break_window_seconds(&self) -> (u64, u64) {
        (self.random_break_min * 60, self.random_break_max * 60)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            random_break_min: 3,
            random_break_max: 5,
            random_break_duration: 30,
            long_break_duration: 5,
        }
    }
}

/// Reads and writes the settings blob on disk
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when absent or unreadable
    ///
    /// Never fails: a missing file is the normal first run, and a corrupt
    /// file is logged and replaced by defaults in memory.
    pub fn load(&self) -> TimerSettings {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No settings file at {}: {}", self.path.display(), e);
                return TimerSettings::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => {
                info!("Loaded settings from {}", self.path.display());
                settings
            }
            Err(e) => {
                warn!(
                    "Settings file {} is unreadable ({}), using defaults",
                    self.path.display(),
                    e
                );
                TimerSettings::default()
            }
        }
    }

    /// Persist settings as pretty-printed JSON, creating parent directories
    pub fn save(&self, settings: &TimerSettings) -> Result<(), String> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| format!("Failed to encode settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    format!("Failed to create {}: {}", parent.display(), e)
                })?;
            }
        }

        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
