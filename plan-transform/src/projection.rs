//! Transform derivation from a calibration.
//!
//! A [`PlanProjection`] is recomputed from the stored reference points
//! on every query rather than cached, so it can never disagree with the
//! calibration it was derived from.

use geo_math::{normalize_angle, Affine2, Similarity2};
use thiserror::Error;

use crate::calibration::{Calibration, GeoPoint, PlanPoint};

/// Why a transform query produced no value.
///
/// None of these are faults: host layers surface them as ordinary UI
/// states ("not yet calibrated", "can't compute scale").
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("no calibration is set")]
    NotCalibrated,
    #[error("calibration points are geometrically degenerate")]
    DegenerateCalibration,
    #[error("reference points have zero world-space separation")]
    ZeroWorldDistance,
    #[error("reference points have zero pixel-space separation")]
    ZeroPixelDistance,
}

/// The world-to-pixel map derived from a calibration.
///
/// Three non-collinear reference points determine a full affine fit.
/// When the points are collinear the affine solve is ill-conditioned,
/// so the best-separated pair determines a similarity fit instead
/// (uniform scale + rotation + translation, no shear).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanProjection {
    Affine(Affine2),
    Similarity(Similarity2),
}

impl PlanProjection {
    /// Derive the transform for a calibration.
    ///
    /// # Returns
    /// * `Ok(PlanProjection)` - Affine fit, or similarity fallback for
    ///   collinear points
    /// * `Err(TransformError::DegenerateCalibration)` - If even the
    ///   best-separated world pair is effectively a single point
    pub fn derive(calibration: &Calibration) -> Result<Self, TransformError> {
        let world = [
            calibration.points[0].world.to_planar(),
            calibration.points[1].world.to_planar(),
            calibration.points[2].world.to_planar(),
        ];
        let pixel = [
            calibration.points[0].pixel.to_vector(),
            calibration.points[1].pixel.to_vector(),
            calibration.points[2].pixel.to_vector(),
        ];

        match Affine2::from_correspondences(&world, &pixel) {
            Ok(affine) => Ok(Self::Affine(affine)),
            Err(_collinear) => {
                let (i, j) = calibration.best_separated_pair();
                Similarity2::from_pair(world[i], world[j], pixel[i], pixel[j])
                    .map(Self::Similarity)
                    .map_err(|_| TransformError::DegenerateCalibration)
            }
        }
    }

    /// Map a GPS coordinate to plan pixels.
    pub fn world_to_pixel(&self, world: GeoPoint) -> PlanPoint {
        let planar = world.to_planar();
        let pixel = match self {
            Self::Affine(affine) => affine.apply(planar),
            Self::Similarity(sim) => sim.apply(planar),
        };
        PlanPoint::from_vector(pixel)
    }

    /// Pixel-space direction of geographic north (increasing latitude),
    /// in radians where 0 points along the pixel +x axis.
    pub fn north_angle(&self) -> f64 {
        let angle = match self {
            Self::Affine(affine) => affine.north_angle(),
            Self::Similarity(sim) => sim.north_angle(),
        };
        normalize_angle(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationPoint;
    use approx::assert_relative_eq;

    fn pair(lat: f64, lng: f64, x: f64, y: f64) -> CalibrationPoint {
        CalibrationPoint::new(GeoPoint::new(lat, lng), PlanPoint::new(x, y))
    }

    #[test]
    fn test_non_collinear_uses_affine() {
        let cal = Calibration::new(
            pair(0.0, 0.0, 0.0, 0.0),
            pair(1.0, 1.0, 100.0, 100.0),
            pair(0.0, 1.0, 0.0, 100.0),
        );

        let projection = PlanProjection::derive(&cal).unwrap();
        assert!(matches!(projection, PlanProjection::Affine(_)));
    }

    #[test]
    fn test_collinear_falls_back_to_similarity() {
        let cal = Calibration::new(
            pair(0.0, 0.0, 0.0, 0.0),
            pair(1.0, 1.0, 100.0, 0.0),
            pair(2.0, 2.0, 200.0, 0.0),
        );

        let projection = PlanProjection::derive(&cal).unwrap();
        assert!(matches!(projection, PlanProjection::Similarity(_)));

        // The fallback is exact at its two defining points (0 and 2)
        let p0 = projection.world_to_pixel(GeoPoint::new(0.0, 0.0));
        assert_relative_eq!(p0.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p0.y, 0.0, epsilon = 1e-9);

        let p2 = projection.world_to_pixel(GeoPoint::new(2.0, 2.0));
        assert_relative_eq!(p2.x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(p2.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_all_points_coincident_is_degenerate() {
        let cal = Calibration::new(
            pair(10.0, 20.0, 0.0, 0.0),
            pair(10.0, 20.0, 50.0, 50.0),
            pair(10.0, 20.0, 100.0, 100.0),
        );

        let result = PlanProjection::derive(&cal);
        assert_eq!(result, Err(TransformError::DegenerateCalibration));
    }

    #[test]
    fn test_midpoint_scenario() {
        // Two corners one degree apart in both axes, plus a third
        // non-collinear corner; the relative midpoint lands at (50, 50)
        let cal = Calibration::new(
            pair(0.0, 0.0, 0.0, 0.0),
            pair(1.0, 1.0, 100.0, 100.0),
            pair(0.0, 1.0, 0.0, 100.0),
        );

        let projection = PlanProjection::derive(&cal).unwrap();
        let mid = projection.world_to_pixel(GeoPoint::new(0.5, 0.5));

        assert_relative_eq!(mid.x, 50.0, epsilon = 0.001);
        assert_relative_eq!(mid.y, 50.0, epsilon = 0.001);
    }
}
