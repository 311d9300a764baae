//! Capture schedule and progress signals

use serde::{Deserialize, Serialize};

/// Wall-clock schedule of a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSchedule {
    /// Delay before the countdown starts (ms)
    pub settle_ms: u64,
    /// First countdown number
    pub countdown_from: u8,
    /// Duration of each countdown step (ms)
    pub count_ms: u64,
    /// Trailing capture time after the countdown (ms)
    pub finalize_ms: u64,
    /// Minimum usable frames for a successful capture
    pub min_frames: usize,
}

impl Default for CaptureSchedule {
    fn default() -> Self {
        Self {
            settle_ms: 500,
            countdown_from: 3,
            count_ms: 1000,
            finalize_ms: 500,
            min_frames: 10,
        }
    }
}

impl CaptureSchedule {
    /// Progress signals paired with their offset from session start
    pub fn milestones(&self) -> Vec<(u64, CaptureProgress)> {
        let mut milestones = vec![(0, CaptureProgress::Settling)];
        let mut at = self.settle_ms;
        for count in (1..=self.countdown_from).rev() {
            milestones.push((at, CaptureProgress::Countdown(count)));
            at += self.count_ms;
        }
        milestones.push((at, CaptureProgress::Capturing));
        milestones
    }

    /// Offset at which the session stops collecting (ms)
    pub fn total_ms(&self) -> u64 {
        self.settle_ms + u64::from(self.countdown_from) * self.count_ms + self.finalize_ms
    }
}

/// Status signals shown while calibrating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum CaptureProgress {
    Settling,
    Countdown(u8),
    Capturing,
    Success,
    Failure(String),
}
