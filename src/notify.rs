//! Notification sink for phase-entry cues
//!
//! Cues are fire-and-forget: they are logged and fanned out to any connected
//! event listeners, and failures never reach the timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::timer::{Cue, Phase};

/// A cue paired with the phase that raised it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueEvent {
    pub cue: Cue,
    pub phase: Phase,
    pub timestamp: DateTime<Utc>,
}

/// Fans cue events out to event-stream subscribers
#[derive(Debug, Clone)]
pub struct Notifier {
    cue_tx: broadcast::Sender<CueEvent>,
}

impl Notifier {
    /// Create a notifier with no subscribers yet
    pub fn new() -> Self {
        let (cue_tx, _) = broadcast::channel(100);
        Self { cue_tx }
    }

    /// Fire a cue; never fails, never blocks
    pub fn fire(&self, cue: Cue, phase: Phase) {
        info!("Cue fired: {} (phase: {})", cue.as_str(), phase.as_str());

        let event = CueEvent {
            cue,
            phase,
            timestamp: Utc::now(),
        };
        if self.cue_tx.send(event).is_err() {
            // Normal when no event stream is connected.
            debug!("No cue listeners connected");
        }
    }

    /// Subscribe to future cue events
    pub fn subscribe(&self) -> broadcast::Receiver<CueEvent> {
        self.cue_tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
