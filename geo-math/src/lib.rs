//! geo-math - Geometric primitives for plan positioning
//!
//! This crate provides the pure math used to align GPS coordinates with
//! a raster site plan:
//!
//! - **Geodesy** - Great-circle (haversine) distance between GPS fixes
//! - **Affine** - 6-parameter planar fit from three point correspondences
//! - **Similarity** - 4-parameter fit from two point correspondences,
//!   used when three points are collinear
//!
//! # Example
//!
//! ```
//! use geo_math::Affine2;
//! use nalgebra::Vector2;
//!
//! // Three correspondences encoding a pure 2x scale
//! let world = [
//!     Vector2::new(0.0, 0.0),
//!     Vector2::new(1.0, 0.0),
//!     Vector2::new(0.0, 1.0),
//! ];
//! let pixel = [
//!     Vector2::new(0.0, 0.0),
//!     Vector2::new(2.0, 0.0),
//!     Vector2::new(0.0, 2.0),
//! ];
//!
//! let affine = Affine2::from_correspondences(&world, &pixel).unwrap();
//! let mapped = affine.apply(Vector2::new(0.5, 0.5));
//! assert!((mapped.x - 1.0).abs() < 1e-12);
//! ```

pub mod affine;
pub mod geodesy;
pub mod similarity;

// Re-export commonly used types
pub use affine::{Affine2, CollinearPointsError};
pub use geodesy::{haversine_distance_meters, normalize_angle, EARTH_RADIUS_METERS};
pub use similarity::{CoincidentPointsError, Similarity2};
