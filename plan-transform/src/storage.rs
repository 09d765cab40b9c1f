//! On-disk storage for saved plan calibrations.
//!
//! Provides centralized storage for per-plan calibration data, one JSON
//! file per plan. All data is stored in ~/.planfix/ by default. The
//! engine itself never touches the filesystem: restoring a calibration
//! is a load here followed by
//! [`set_calibration`](crate::TransformEngine::set_calibration), with
//! every derived quantity recomputed fresh from the raw points.

use std::path::{Path, PathBuf};

use crate::calibration::Calibration;

/// Storage manager for saved calibrations.
///
/// Manages loading and saving of per-plan calibration files from a
/// centralized directory (defaults to ~/.planfix/).
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    /// Root directory for all stored data (e.g., ~/.planfix)
    root_path: PathBuf,
}

impl CalibrationStore {
    /// Create a new store with the default path (~/.planfix)
    pub fn new() -> std::io::Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
        let root_path = PathBuf::from(home).join(".planfix");
        Ok(Self { root_path })
    }

    /// Create a new store with a custom root path
    pub fn with_path(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Get the root storage path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Get the calibrations directory path
    fn calibrations_dir(&self) -> PathBuf {
        self.root_path.join("calibrations")
    }

    /// Generate the filename for a plan's calibration
    fn calibration_path(&self, plan_id: &str) -> PathBuf {
        assert!(
            !plan_id.is_empty() && !plan_id.contains(['/', '\\', '.']),
            "Plan id must be a plain name without path separators or dots"
        );

        let plan_safe = plan_id.replace(' ', "_");
        self.calibrations_dir().join(format!("{plan_safe}.json"))
    }

    /// Get the saved calibration for a plan.
    ///
    /// Returns None if no calibration was saved for this plan.
    /// Returns Some(Err) if the file exists but cannot be loaded.
    pub fn get_calibration(&self, plan_id: &str) -> Option<Result<Calibration, std::io::Error>> {
        let path = self.calibration_path(plan_id);

        if !path.exists() {
            return None;
        }

        Some(Calibration::load_from_file(&path))
    }

    /// Save a plan's calibration.
    ///
    /// Creates the calibrations directory if it doesn't exist.
    /// Returns the path where the calibration was saved.
    pub fn save_calibration(
        &self,
        plan_id: &str,
        calibration: &Calibration,
    ) -> std::io::Result<PathBuf> {
        let dir = self.calibrations_dir();
        std::fs::create_dir_all(&dir)?;

        let path = self.calibration_path(plan_id);
        calibration.save_to_file(&path)?;
        Ok(path)
    }

    /// List the plan ids that have a saved calibration.
    pub fn list_calibrations(&self) -> std::io::Result<Vec<String>> {
        let dir = self.calibrations_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut plans = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    plans.push(stem.replace('_', " "));
                }
            }
        }

        Ok(plans)
    }

    /// Delete a plan's saved calibration.
    ///
    /// Returns Ok(true) if the file was deleted, Ok(false) if it didn't exist.
    pub fn delete_calibration(&self, plan_id: &str) -> std::io::Result<bool> {
        let path = self.calibration_path(plan_id);

        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(path)?;
        Ok(true)
    }
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_path(PathBuf::from(".planfix")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationPoint, GeoPoint, PlanPoint};
    use crate::engine::TransformEngine;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn create_test_store() -> CalibrationStore {
        let temp_dir = std::env::temp_dir().join(format!(
            "planfix_test_{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        CalibrationStore::with_path(temp_dir)
    }

    fn sample_calibration() -> Calibration {
        Calibration::new(
            CalibrationPoint::new(GeoPoint::new(0.0, 0.0), PlanPoint::new(0.0, 0.0)),
            CalibrationPoint::new(GeoPoint::new(1.0, 1.0), PlanPoint::new(100.0, 100.0)),
            CalibrationPoint::new(GeoPoint::new(0.0, 1.0), PlanPoint::new(0.0, 100.0)),
        )
    }

    #[test]
    fn test_calibration_path() {
        let store = create_test_store();
        let path = store.calibration_path("hall b");

        assert!(path.to_str().unwrap().contains("calibrations"));
        assert!(path.to_str().unwrap().ends_with("hall_b.json"));
    }

    #[test]
    fn test_get_nonexistent_calibration() {
        let store = create_test_store();
        assert!(store.get_calibration("missing").is_none());
    }

    #[test]
    fn test_save_and_load_calibration() {
        let store = create_test_store();
        let calibration = sample_calibration();

        let path = store.save_calibration("site plan", &calibration).unwrap();
        assert!(path.exists());

        let loaded = store
            .get_calibration("site plan")
            .expect("Calibration should exist")
            .expect("Calibration should load successfully");

        assert_eq!(loaded, calibration);

        std::fs::remove_dir_all(store.root_path()).ok();
    }

    #[test]
    fn test_list_calibrations() {
        let store = create_test_store();

        store
            .save_calibration("floor 1", &sample_calibration())
            .unwrap();
        store
            .save_calibration("floor 2", &sample_calibration())
            .unwrap();

        let mut plans = store.list_calibrations().unwrap();
        plans.sort();

        assert_eq!(plans, vec!["floor 1".to_string(), "floor 2".to_string()]);

        std::fs::remove_dir_all(store.root_path()).ok();
    }

    #[test]
    fn test_delete_calibration() {
        let store = create_test_store();

        store
            .save_calibration("garage", &sample_calibration())
            .unwrap();
        assert!(store.get_calibration("garage").is_some());

        assert!(store.delete_calibration("garage").unwrap());
        assert!(store.get_calibration("garage").is_none());
        assert!(!store.delete_calibration("garage").unwrap());

        std::fs::remove_dir_all(store.root_path()).ok();
    }

    #[test]
    fn test_restore_into_engine() {
        let store = create_test_store();
        store
            .save_calibration("warehouse", &sample_calibration())
            .unwrap();

        let restored = store.get_calibration("warehouse").unwrap().unwrap();
        let mut engine = TransformEngine::new();
        engine.set_calibration(restored);

        let mid = engine.world_to_pixel(GeoPoint::new(0.5, 0.5)).unwrap();
        assert!((mid.x - 50.0).abs() < 0.001);
        assert!((mid.y - 50.0).abs() < 0.001);

        std::fs::remove_dir_all(store.root_path()).ok();
    }
}
