//! Calibration data model for a loaded plan.
//!
//! Three paired (GPS, pixel) reference points define how a plan image
//! sits in the world. The pairs are stored exactly as collected, with
//! no geometric validation here: degeneracy is only detectable when a
//! transform is derived, and is reported there.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A GPS coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar coordinates used by the transform fits: (longitude,
    /// latitude) as (x, y). Valid only over extents small enough that
    /// Earth curvature is negligible.
    pub(crate) fn to_planar(self) -> Vector2<f64> {
        Vector2::new(self.longitude, self.latitude)
    }
}

/// A point in the plan image's native raster resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another plan point, in pixels.
    pub fn distance_to(&self, other: &PlanPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub(crate) fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub(crate) fn from_vector(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// One paired reference point: a GPS coordinate and the pixel it marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub world: GeoPoint,
    pub pixel: PlanPoint,
}

impl CalibrationPoint {
    pub fn new(world: GeoPoint, pixel: PlanPoint) -> Self {
        Self { world, pixel }
    }
}

/// The full calibration for one plan: exactly three reference pairs.
///
/// Serializes as plain numeric fields so a saved calibration can be
/// restored later with every derived quantity recomputed fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub points: [CalibrationPoint; 3],
}

impl Calibration {
    pub fn new(p1: CalibrationPoint, p2: CalibrationPoint, p3: CalibrationPoint) -> Self {
        Self {
            points: [p1, p2, p3],
        }
    }

    /// Indices of the two reference points with the largest world-space
    /// separation. Used by the collinear fallback, where picking the
    /// best-separated pair minimizes the numeric error contributed by
    /// closely spaced points.
    pub(crate) fn best_separated_pair(&self) -> (usize, usize) {
        let planar: Vec<Vector2<f64>> = self.points.iter().map(|p| p.world.to_planar()).collect();

        let mut best = (0, 1);
        let mut best_dist_sq = (planar[0] - planar[1]).norm_squared();
        for (i, j) in [(0, 2), (1, 2)] {
            let dist_sq = (planar[i] - planar[j]).norm_squared();
            if dist_sq > best_dist_sq {
                best = (i, j);
                best_dist_sq = dist_sq;
            }
        }
        best
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
