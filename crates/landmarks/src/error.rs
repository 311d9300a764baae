//! Observation Error Types

use thiserror::Error;

/// Errors raised while normalizing a raw detector payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    /// Payload declares a schema version this build does not understand
    #[error("Unsupported observation version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A landmark carried NaN or infinite coordinates
    #[error("{region} landmark {index} has non-finite coordinates")]
    NonFinite { region: &'static str, index: usize },
}
