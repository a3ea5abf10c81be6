//! Persisted tracker state
//!
//! A three-key store backing cold-start recovery: the tracker mode flag and
//! the last accepted coordinate pair. Stored as TOML in the XDG data
//! directory (~/.local/share/geotrack/state.toml). The coordinate keys are
//! written together and removed together; addresses are never persisted and
//! must be re-resolved from the recovered coordinate.

use crate::constants::store::{APP_DIR_NAME, STATE_FILE_NAME};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedState {
    /// TrackerMode flag: true means UsingFixedOverride
    #[serde(default)]
    should_use_custom_location: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_location_latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_location_longitude: Option<f64>,
}

/// Durable key-value store for the tracker
///
/// Every mutating accessor saves immediately, matching the write-through
/// behavior the tracker relies on.
#[derive(Debug)]
pub struct Store {
    state: PersistedState,
    path: PathBuf,
}

impl Store {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Store("Could not determine data directory".to_string()))
    }

    /// Get the state file path
    pub fn state_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(STATE_FILE_NAME))
    }

    /// Load persisted state from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::state_path()?)
    }

    /// Load persisted state from a specific path (for testing)
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Store(format!("Failed to read state file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Store(format!("Failed to parse state file: {}", e)))?
        } else {
            PersistedState::default()
        };

        Ok(Self { state, path })
    }

    /// Save state to disk
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("Failed to create state directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(&self.state)
            .map_err(|e| Error::Store(format!("Failed to serialize state: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| Error::Store(format!("Failed to write state file: {}", e)))?;

        Ok(())
    }

    /// Path this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted TrackerMode flag
    pub fn use_custom_location(&self) -> bool {
        self.state.should_use_custom_location
    }

    /// Persist the TrackerMode flag
    pub fn set_use_custom_location(&mut self, flag: bool) -> Result<()> {
        self.state.should_use_custom_location = flag;
        self.save()
    }

    /// Last accepted coordinate, if both components are present
    pub fn last_coordinates(&self) -> Option<Coordinates> {
        match (
            self.state.last_location_latitude,
            self.state.last_location_longitude,
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Persist the last accepted coordinate (both components together)
    pub fn set_last_coordinates(&mut self, coordinate: Coordinates) -> Result<()> {
        self.state.last_location_latitude = Some(coordinate.lat);
        self.state.last_location_longitude = Some(coordinate.lng);
        self.save()
    }

    /// Remove both coordinate keys
    pub fn clear_last_coordinates(&mut self) -> Result<()> {
        self.state.last_location_latitude = None;
        self.state.last_location_longitude = None;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn create_test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        let store = Store::load_from(path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_defaults() {
        let (store, _temp) = create_test_store();
        assert!(!store.use_custom_location());
        assert!(store.last_coordinates().is_none());
    }

    #[test]
    fn test_coordinate_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");

        {
            let mut store = Store::load_from(path.clone()).unwrap();
            store
                .set_last_coordinates(Coordinates::new(39.7817, -89.6501))
                .unwrap();
        }

        let store = Store::load_from(path).unwrap();
        let coords = store.last_coordinates().unwrap();
        assert_relative_eq!(coords.lat, 39.7817);
        assert_relative_eq!(coords.lng, -89.6501);
    }

    #[test]
    fn test_flag_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");

        {
            let mut store = Store::load_from(path.clone()).unwrap();
            store.set_use_custom_location(true).unwrap();
        }

        let store = Store::load_from(path).unwrap();
        assert!(store.use_custom_location());
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let (mut store, _temp) = create_test_store();
        store
            .set_last_coordinates(Coordinates::new(1.0, 2.0))
            .unwrap();
        store.clear_last_coordinates().unwrap();

        assert!(store.last_coordinates().is_none());

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("last_location_latitude"));
        assert!(!content.contains("last_location_longitude"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::load_from(temp_dir.path().join("missing.toml")).unwrap();
        assert!(!store.use_custom_location());
        assert!(store.last_coordinates().is_none());
    }

    #[test]
    fn test_partial_pair_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "last_location_latitude = 40.0\n").unwrap();

        let store = Store::load_from(path).unwrap();
        assert!(store.last_coordinates().is_none());
    }
}
