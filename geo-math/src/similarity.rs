//! Similarity fit from two point correspondences.
//!
//! A similarity transform is uniform scale + rotation + translation with
//! no shear. It is fully determined by two correspondences, which makes
//! it the fallback when three calibration points are collinear and the
//! full affine fit would divide by a near-zero determinant.

use nalgebra::Vector2;
use thiserror::Error;

/// Squared world separation below which the defining pair is treated as
/// a single point.
const MIN_SEPARATION_SQ: f64 = 1e-20;

/// Error when the two defining world points are effectively identical
#[derive(Error, Debug, Clone, PartialEq)]
#[error("coincident points: squared separation={separation_sq:.6e}")]
pub struct CoincidentPointsError {
    /// Squared world-space distance between the pair
    pub separation_sq: f64,
}

/// 4-parameter similarity map from world coordinates to pixel
/// coordinates:
/// ```text
/// u = scale_cos * x - scale_sin * y + tx
/// v = scale_sin * x + scale_cos * y + ty
/// ```
/// `(scale_cos, scale_sin)` are the real and imaginary parts of a
/// complex scale-rotation factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity2 {
    /// Real part of the scale-rotation factor
    pub scale_cos: f64,
    /// Imaginary part of the scale-rotation factor
    pub scale_sin: f64,
    /// Translation offset for pixel u
    pub tx: f64,
    /// Translation offset for pixel v
    pub ty: f64,
}

impl Similarity2 {
    /// Fit the similarity map carrying `world_a` onto `pixel_a` and
    /// `world_b` onto `pixel_b`. Exact at both defining points by
    /// construction.
    ///
    /// # Returns
    /// * `Ok(Similarity2)` - The interpolating transform
    /// * `Err(CoincidentPointsError)` - If the world pair is (nearly)
    ///   a single point, leaving rotation and scale undetermined
    pub fn from_pair(
        world_a: Vector2<f64>,
        world_b: Vector2<f64>,
        pixel_a: Vector2<f64>,
        pixel_b: Vector2<f64>,
    ) -> Result<Self, CoincidentPointsError> {
        let dw = world_b - world_a;
        let dist_sq = dw.norm_squared();

        if dist_sq < MIN_SEPARATION_SQ {
            return Err(CoincidentPointsError {
                separation_sq: dist_sq,
            });
        }

        let dp = pixel_b - pixel_a;
        let scale_cos = (dp.x * dw.x + dp.y * dw.y) / dist_sq;
        let scale_sin = (dp.y * dw.x - dp.x * dw.y) / dist_sq;

        let tx = pixel_a.x - (scale_cos * world_a.x - scale_sin * world_a.y);
        let ty = pixel_a.y - (scale_sin * world_a.x + scale_cos * world_a.y);

        Ok(Self {
            scale_cos,
            scale_sin,
            tx,
            ty,
        })
    }

    /// Apply the transform to a world-space point.
    pub fn apply(&self, world: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.scale_cos * world.x - self.scale_sin * world.y + self.tx,
            self.scale_sin * world.x + self.scale_cos * world.y + self.ty,
        )
    }

    /// Pixel-space displacement produced by a unit increase of world y.
    pub fn north_vector(&self) -> Vector2<f64> {
        Vector2::new(-self.scale_sin, self.scale_cos)
    }

    /// Angle of [`north_vector`](Self::north_vector) in radians, where
    /// 0 points along the pixel +x axis.
    pub fn north_angle(&self) -> f64 {
        self.scale_cos.atan2(-self.scale_sin)
    }

    /// Uniform scale factor (pixels per world unit).
    pub fn scale(&self) -> f64 {
        self.scale_cos.hypot(self.scale_sin)
    }

    /// Rotation angle in radians (counter-clockwise).
    pub fn rotation(&self) -> f64 {
        self.scale_sin.atan2(self.scale_cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn assert_vec_eq(actual: Vector2<f64>, expected: Vector2<f64>, epsilon: f64) {
        assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
        assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    }

    #[test]
    fn test_exact_at_defining_points() {
        let world_a = Vector2::new(2.0, 3.0);
        let world_b = Vector2::new(8.0, -1.0);
        let pixel_a = Vector2::new(120.0, 40.0);
        let pixel_b = Vector2::new(610.0, 905.0);

        let sim = Similarity2::from_pair(world_a, world_b, pixel_a, pixel_b).unwrap();

        assert_vec_eq(sim.apply(world_a), pixel_a, 1e-9);
        assert_vec_eq(sim.apply(world_b), pixel_b, 1e-9);
    }

    #[test]
    fn test_recovers_rotation_and_scale() {
        let theta = PI / 3.0;
        let s = 4.0;
        let map = |p: Vector2<f64>| {
            Vector2::new(
                s * (theta.cos() * p.x - theta.sin() * p.y) + 10.0,
                s * (theta.sin() * p.x + theta.cos() * p.y) + 20.0,
            )
        };

        let world_a = Vector2::new(0.0, 0.0);
        let world_b = Vector2::new(5.0, 2.0);
        let sim =
            Similarity2::from_pair(world_a, world_b, map(world_a), map(world_b)).unwrap();

        assert_relative_eq!(sim.scale(), s, epsilon = 1e-9);
        assert_relative_eq!(sim.rotation(), theta, epsilon = 1e-9);

        let p = Vector2::new(-1.5, 7.25);
        assert_vec_eq(sim.apply(p), map(p), 1e-9);
    }

    #[test]
    fn test_coincident_points_error() {
        let world = Vector2::new(1.0, 1.0);
        let result = Similarity2::from_pair(
            world,
            world,
            Vector2::new(0.0, 0.0),
            Vector2::new(100.0, 100.0),
        );

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.separation_sq < 1e-20);
    }

    #[test]
    fn test_north_angle_no_rotation() {
        // Pure scale: world y maps onto pixel +y
        let sim = Similarity2::from_pair(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
        )
        .unwrap();

        assert_vec_eq(sim.north_vector(), Vector2::new(0.0, 10.0), 1e-12);
        assert_relative_eq!(sim.north_angle(), PI / 2.0, epsilon = 1e-12);
    }
}
