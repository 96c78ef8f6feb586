// Session summary - What a finished (or abandoned) session looked like

use crate::sequencer::SequencerStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Serializable record of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub sequence_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_steps: usize,
    /// Highest 1-based step position reached
    pub steps_reached: usize,
    /// Seconds spent running
    pub session_elapsed: u64,
    pub completed: bool,
    /// Sequencer status when the summary was taken
    pub status: SequencerStatus,
}

impl SessionSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the summary as pretty JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
