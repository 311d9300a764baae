//! Capture session state machine

use crate::{average_triangle, CaptureError, CaptureProgress, CaptureSchedule};
use chrono::{DateTime, Utc};
use landmarks::{Observation, ReferencePose, Triangle};
use storage::ReferenceStore;
use tracing::{debug, info, warn};

/// One in-progress reference capture.
///
/// Driven by the caller: `ingest` every processed observation and `advance`
/// with the current time to collect the progress signals that became due.
/// Dropping the session abandons it.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    schedule: CaptureSchedule,
    started_at_ms: u64,
    milestones: Vec<(u64, CaptureProgress)>,
    /// Index of the next milestone to emit
    next_milestone: usize,
    frames: Vec<Triangle>,
}

impl CaptureSession {
    /// Start collecting at `now_ms`
    pub fn begin(schedule: CaptureSchedule, now_ms: u64) -> Self {
        info!(
            "Reference capture started ({} ms, min {} frames)",
            schedule.total_ms(),
            schedule.min_frames
        );
        Self {
            milestones: schedule.milestones(),
            schedule,
            started_at_ms: now_ms,
            next_milestone: 0,
            frames: Vec::new(),
        }
    }

    /// Buffer the observation's triangle. Frames without nose or shoulders
    /// are skipped silently; returns whether the frame was kept.
    pub fn ingest(&mut self, observation: &Observation) -> bool {
        match observation.triangle() {
            Some(triangle) => {
                self.frames.push(triangle);
                true
            }
            None => {
                debug!("Capture frame skipped: triangle incomplete");
                false
            }
        }
    }

    /// Progress signals that became due since the last call
    pub fn advance(&mut self, now_ms: u64) -> Vec<CaptureProgress> {
        let elapsed = self.elapsed_ms(now_ms);
        let mut due = Vec::new();
        while let Some((at, progress)) = self.milestones.get(self.next_milestone) {
            if *at > elapsed {
                break;
            }
            due.push(progress.clone());
            self.next_milestone += 1;
        }
        due
    }

    /// The schedule has run out and the session should be finished
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.schedule.total_ms()
    }

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    /// Average the buffered frames into a reference without persisting it
    pub fn finish(self, captured_at: DateTime<Utc>) -> Result<ReferencePose, CaptureError> {
        let count = self.frames.len();
        let required = self.schedule.min_frames;

        let averaged = match average_triangle(&self.frames) {
            Some(triangle) if count >= required => triangle,
            _ => {
                warn!("Reference capture failed: {} of {} frames", count, required);
                return Err(CaptureError::InsufficientFrames { count, required });
            }
        };

        Ok(ReferencePose::new(averaged, captured_at))
    }

    /// Finish and persist as the new reference, replacing any prior one.
    ///
    /// On failure nothing is stored and the computed reference is discarded.
    pub fn complete(
        self,
        store: &dyn ReferenceStore,
        captured_at: DateTime<Utc>,
    ) -> Result<ReferencePose, CaptureError> {
        let frames = self.frames.len();
        let reference = self.finish(captured_at)?;

        store.save(&reference).map_err(|e| {
            warn!("Reference capture could not be saved: {}", e);
            CaptureError::SaveFailed(e)
        })?;

        info!(
            "Reference pose saved (ratio {:.3}, {} frames)",
            reference.ratio(),
            frames
        );
        Ok(reference)
    }
}
