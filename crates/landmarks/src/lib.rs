//! Landmark Data Model
//!
//! Per-frame observations emitted by the external pose/hand/face model:
//! - Normalized landmarks with optional relative depth
//! - The nose + shoulders triangle used as the posture proxy
//! - Boundary validation of the raw detector payload
//! - Geometry helpers (triangle ratio, head tilt, face rectangle)
//! - The calibrated reference pose

pub mod geometry;
mod error;
mod landmark;
mod observation;
mod reference;

pub use error::ObservationError;
pub use geometry::{average_depth, head_tilt_delta, mean_depth, triangle_ratio, FaceRect};
pub use landmark::{Landmark, PoseIndex, Triangle};
pub use observation::{Observation, RawLandmark, RawObservation, OBSERVATION_VERSION};
pub use reference::ReferencePose;
