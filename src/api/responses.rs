//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{settings::TimerSettings, state::DisplayFrame, timer::Phase};

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: DisplayFrame,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: DisplayFrame) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response for a running timer
    pub fn active(message: String, timer: DisplayFrame) -> Self {
        Self::new("active".to_string(), message, timer)
    }

    /// Create a response for an idle timer
    pub fn inactive(message: String, timer: DisplayFrame) -> Self {
        Self::new("inactive".to_string(), message, timer)
    }
}

/// Response for the settings endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub settings: TimerSettings,
}

impl SettingsResponse {
    /// Report the stored settings
    pub fn current(settings: TimerSettings) -> Self {
        Self {
            status: "ok".to_string(),
            message: "Current settings".to_string(),
            timestamp: Utc::now(),
            settings,
        }
    }

    /// Acknowledge a save, noting whether a running timer was stopped
    pub fn saved(settings: TimerSettings, stopped_timer: bool) -> Self {
        let message = if stopped_timer {
            "Settings saved, running timer stopped".to_string()
        } else {
            "Settings saved".to_string()
        };
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            settings,
        }
    }
}

/// Full status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub clock: String,
    pub running: bool,
    pub remaining_seconds: u64,
    pub work_elapsed_seconds: u64,
    pub settings: TimerSettings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.2.0".to_string(),
        }
    }
}
