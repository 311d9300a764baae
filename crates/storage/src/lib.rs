//! Storage Layer
//!
//! Single-slot key-value persistence for the reference pose. The alerting
//! core only relies on the save/load/clear contract; durability is the
//! backend's concern.

mod file;
mod memory;

pub use file::JsonFileReferenceStore;
pub use memory::InMemoryReferenceStore;

use landmarks::ReferencePose;
use thiserror::Error;

/// Constant key of the single reference slot
pub const REFERENCE_KEY: &str = "reference-pose";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence contract for the reference pose
pub trait ReferenceStore: Send + Sync {
    /// Overwrite the stored reference
    fn save(&self, reference: &ReferencePose) -> Result<(), StorageError>;

    /// Current reference, if one has been saved
    fn load(&self) -> Result<Option<ReferencePose>, StorageError>;

    /// Remove the stored reference (no-op when empty)
    fn clear(&self) -> Result<(), StorageError>;
}
