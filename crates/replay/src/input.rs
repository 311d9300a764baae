//! Recorded frame stream

use anyhow::{Context, Result};
use landmarks::{Observation, RawObservation};
use serde::Deserialize;

/// One line of a recording
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedFrame {
    /// Capture time relative to the recording start (ms)
    pub t_ms: u64,
    pub observation: RawObservation,
}

/// Parse and validate one JSON line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<(u64, Observation)>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let frame: RecordedFrame = serde_json::from_str(line).context("Malformed frame")?;
    let observation = Observation::try_from(frame.observation).context("Invalid observation")?;
    Ok(Some((frame.t_ms, observation)))
}
