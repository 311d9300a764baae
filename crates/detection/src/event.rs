//! Alert events emitted by the detectors

use serde::{Deserialize, Serialize};

/// How strongly an alert should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertVariant {
    /// Full alert: tone, flash, and message
    Normal,
    /// Weak or ambiguous signal: flash only
    LowConfidence,
}

impl AlertVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertVariant::Normal => "normal",
            AlertVariant::LowConfidence => "low_confidence",
        }
    }
}

/// Detector-specific measurements behind an alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AlertPayload {
    Proximity {
        /// Hand-to-face distance divided by face size
        normalized_distance: f64,
        face_size: f64,
    },
    Posture {
        live_ratio: f64,
        reference_ratio: f64,
        /// Live head delta over reference head delta
        head_delta_ratio: f64,
    },
}

/// Transient alert, consumed immediately by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub variant: AlertVariant,
    /// Human-readable cause
    pub reason: String,
    pub payload: AlertPayload,
}
