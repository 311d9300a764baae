//! Reference Calibration
//!
//! Turns a short, user-initiated burst of noisy observations into one
//! stable reference pose:
//! - Wall-clock schedule (settle, 3-2-1 countdown, finalize)
//! - Triangle buffering with silent skipping of incomplete frames
//! - Landmark averaging, then ratio derivation
//! - Persistence through the reference store

mod average;
mod schedule;
mod session;

pub use average::average_triangle;
pub use schedule::{CaptureProgress, CaptureSchedule};
pub use session::CaptureSession;

use storage::StorageError;
use thiserror::Error;

/// Calibration failures surfaced to the user
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Captured {count} usable frames, need at least {required}")]
    InsufficientFrames { count: usize, required: usize },

    #[error("Failed to save reference pose: {0}")]
    SaveFailed(#[source] StorageError),
}

impl CaptureError {
    /// Actionable status line for the UI
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::InsufficientFrames { count, required } => format!(
                "Not enough frames ({}/{}). Make sure your face and both shoulders are visible, then retry.",
                count, required
            ),
            CaptureError::SaveFailed(_) => {
                "Could not save your reference posture. Please try again.".to_string()
            }
        }
    }
}
