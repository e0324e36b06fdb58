//! Notification cues emitted on phase entry

use serde::{Deserialize, Serialize};

/// Named cues for the notification sink
///
/// Exactly one cue fires when a work session starts or resumes, when a short
/// break begins, and when the work session finishes into the long break.
/// Returning to idle is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    WorkStart,
    BreakStart,
    Finished,
}

impl Cue {
    /// Stable kebab-case name used in logs and event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::WorkStart => "work-start",
            Cue::BreakStart => "break-start",
            Cue::Finished => "finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_kebab_case_names() {
        assert_eq!(
            serde_json::to_string(&Cue::WorkStart).unwrap(),
            "\"work-start\""
        );
        assert_eq!(
            serde_json::to_string(&Cue::BreakStart).unwrap(),
            "\"break-start\""
        );
        assert_eq!(Cue::Finished.as_str(), "finished");
    }
}
