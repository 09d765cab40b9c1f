//! Planar affine fit from three point correspondences.
//!
//! Solves the 6-unknown system mapping three world points onto three
//! pixel points with a closed-form Cramer's-rule expansion, with error
//! handling for collinear (zero-area) world configurations.

use nalgebra::Vector2;
use thiserror::Error;

/// Threshold below which the world-point determinant is treated as zero.
const DETERMINANT_EPSILON: f64 = 1e-10;

/// Error when the three world points are collinear or nearly so
#[derive(Error, Debug, Clone, PartialEq)]
#[error("collinear points: determinant={determinant:.6e}")]
pub struct CollinearPointsError {
    /// The determinant value (zero or near-zero)
    pub determinant: f64,
}

/// 6-parameter affine map from world coordinates to pixel coordinates:
/// ```text
/// u = a * x + b * y + tx
/// v = c * x + d * y + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    /// x contribution to pixel u
    pub a: f64,
    /// y contribution to pixel u
    pub b: f64,
    /// x contribution to pixel v
    pub c: f64,
    /// y contribution to pixel v
    pub d: f64,
    /// Translation offset for pixel u
    pub tx: f64,
    /// Translation offset for pixel v
    pub ty: f64,
}

impl Affine2 {
    /// Fit the affine map that carries each `world[i]` exactly onto
    /// `pixel[i]`.
    ///
    /// # Arguments
    /// * `world` - Three world-space points, must not be collinear
    /// * `pixel` - The corresponding pixel-space points
    ///
    /// # Returns
    /// * `Ok(Affine2)` - The exact interpolating transform
    /// * `Err(CollinearPointsError)` - If the world points span no area
    pub fn from_correspondences(
        world: &[Vector2<f64>; 3],
        pixel: &[Vector2<f64>; 3],
    ) -> Result<Self, CollinearPointsError> {
        let (x1, y1) = (world[0].x, world[0].y);
        let (x2, y2) = (world[1].x, world[1].y);
        let (x3, y3) = (world[2].x, world[2].y);
        let (u1, v1) = (pixel[0].x, pixel[0].y);
        let (u2, v2) = (pixel[1].x, pixel[1].y);
        let (u3, v3) = (pixel[2].x, pixel[2].y);

        let det = x1 * (y2 - y3) - y1 * (x2 - x3) + (x2 * y3 - x3 * y2);

        if det.abs() < DETERMINANT_EPSILON {
            return Err(CollinearPointsError { determinant: det });
        }

        let a = (u1 * (y2 - y3) - y1 * (u2 - u3) + (u2 * y3 - u3 * y2)) / det;
        let b = (x1 * (u2 - u3) - u1 * (x2 - x3) + (x2 * u3 - x3 * u2)) / det;
        let tx = (x1 * (y2 * u3 - y3 * u2) - y1 * (x2 * u3 - x3 * u2) + u1 * (x2 * y3 - x3 * y2))
            / det;

        let c = (v1 * (y2 - y3) - y1 * (v2 - v3) + (v2 * y3 - v3 * y2)) / det;
        let d = (x1 * (v2 - v3) - v1 * (x2 - x3) + (x2 * v3 - x3 * v2)) / det;
        let ty = (x1 * (y2 * v3 - y3 * v2) - y1 * (x2 * v3 - x3 * v2) + v1 * (x2 * y3 - x3 * y2))
            / det;

        Ok(Self { a, b, c, d, tx, ty })
    }

    /// Apply the transform to a world-space point.
    pub fn apply(&self, world: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.a * world.x + self.b * world.y + self.tx,
            self.c * world.x + self.d * world.y + self.ty,
        )
    }

    /// Pixel-space displacement produced by a unit increase of world y.
    ///
    /// With world axes (longitude, latitude) this is the pixel direction
    /// of geographic north.
    pub fn north_vector(&self) -> Vector2<f64> {
        Vector2::new(self.b, self.d)
    }

    /// Angle of [`north_vector`](Self::north_vector) in radians, where
    /// 0 points along the pixel +x axis.
    pub fn north_angle(&self) -> f64 {
        self.d.atan2(self.b)
    }
}
