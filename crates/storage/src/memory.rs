//! In-memory reference store

use crate::{ReferenceStore, StorageError, REFERENCE_KEY};
use landmarks::ReferencePose;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Reference store backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct InMemoryReferenceStore {
    slots: Mutex<HashMap<&'static str, ReferencePose>>,
    /// Reject every save (for exercising failure paths)
    fail_saves: AtomicBool,
}

impl InMemoryReferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a reference
    pub fn with_reference(reference: ReferencePose) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(REFERENCE_KEY, reference);
        }
        store
    }

    /// Make subsequent saves fail
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }
}

impl ReferenceStore for InMemoryReferenceStore {
    fn save(&self, reference: &ReferencePose) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StorageError::Backend("save rejected".to_string()));
        }

        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Backend(format!("Lock error: {}", e)))?;
        slots.insert(REFERENCE_KEY, reference.clone());
        debug!("Stored reference under {}", REFERENCE_KEY);
        Ok(())
    }

    fn load(&self) -> Result<Option<ReferencePose>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Backend(format!("Lock error: {}", e)))?;
        Ok(slots.get(REFERENCE_KEY).cloned())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Backend(format!("Lock error: {}", e)))?;
        slots.remove(REFERENCE_KEY);
        Ok(())
    }
}
