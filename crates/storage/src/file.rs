//! JSON file reference store

use crate::{ReferenceStore, StorageError, REFERENCE_KEY};
use landmarks::ReferencePose;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reference store writing one JSON document per key under a directory
#[derive(Debug, Clone)]
pub struct JsonFileReferenceStore {
    dir: PathBuf,
}

impl JsonFileReferenceStore {
    /// Create a store rooted at `dir` (created lazily on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Using reference store at {}", dir.display());
        Self { dir }
    }

    fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", REFERENCE_KEY))
    }
}

impl ReferenceStore for JsonFileReferenceStore {
    fn save(&self, reference: &ReferencePose) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.slot_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(reference)?;

        // Readers never observe a half-written slot
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote reference to {}", path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<ReferencePose>, StorageError> {
        match fs::read(self.slot_path()) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use landmarks::{Landmark, Triangle};

    fn reference() -> ReferencePose {
        ReferencePose::new(
            Triangle::new(
                Landmark::with_depth(0.5, 0.2, -0.3),
                Landmark::with_depth(0.3, 0.6, -0.1),
                Landmark::with_depth(0.7, 0.6, -0.1),
            ),
            Utc::now(),
        )
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileReferenceStore::new(dir.path().join("nested"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileReferenceStore::new(dir.path());
        let saved = reference();

        store.save(&saved).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.captured_at(), saved.captured_at());
        assert!((loaded.ratio() - saved.ratio()).abs() < 1e-12);
        assert!(!dir.path().join("reference-pose.json.tmp").exists());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("reference-pose.json"), b"{not json").unwrap();
        let store = JsonFileReferenceStore::new(dir.path());

        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
    }
}
