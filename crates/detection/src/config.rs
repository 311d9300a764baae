//! Detector configuration

use serde::{Deserialize, Serialize};

/// Hand-near-face detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Hand-to-face distance, as a fraction of face size, counted as "near"
    pub distance_threshold: f64,

    /// Maximum hand/face mean depth gap for "near"
    pub depth_threshold: f64,

    /// Consecutive near frames before emitting
    pub trigger_frames: u32,

    /// Face size below which alerts are low-confidence
    pub min_face_size: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.18,
            depth_threshold: 0.12,
            trigger_frames: 3,
            min_face_size: 0.08,
        }
    }
}

/// Shoulder-rounding detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Moving average window (processed frames)
    pub smoothing_window: usize,

    /// Fractional ratio drop versus the reference that counts as rounding
    pub ratio_drop_threshold: f64,

    /// Consecutive bad frames before emitting
    pub trigger_frames: u32,

    /// Head-delta ratio below which alerts are low-confidence
    pub head_tilt_confidence: f64,

    /// Depth change (toward camera) that zeroes the depth score
    pub depth_deviation_threshold: f64,

    /// Weight of the depth component in the overall score
    pub depth_weight: f64,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 10,
            ratio_drop_threshold: 0.07,
            trigger_frames: 4,
            head_tilt_confidence: 0.8,
            depth_deviation_threshold: 0.05,
            depth_weight: 0.3,
        }
    }
}
