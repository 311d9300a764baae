//! Posture and Face-Touch Detection
//!
//! Frame-by-frame detectors over landmark observations:
//! - Hand-near-face proximity with a depth gate
//! - Shoulder rounding against the calibrated reference
//! - Composite posture score for continuous feedback
//!
//! Both detectors emit on the rising edge only. The caller acknowledges an
//! event once it has actually been shown; until then the detector keeps
//! re-emitting while the condition holds.

pub mod config;
pub mod event;
pub mod posture;
pub mod proximity;
pub mod state;

pub use config::{PostureConfig, ProximityConfig};
pub use event::{AlertEvent, AlertPayload, AlertVariant};
pub use posture::{PostureDetector, PostureScore};
pub use proximity::{ProximityDetector, ProximityReading};
pub use state::LatchState;
