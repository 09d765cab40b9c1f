//! Calibration state and transform queries for GPS-on-plan positioning.
//!
//! A handheld device shows a live GPS position on top of a static site
//! plan image. This crate holds the calibration that aligns the two
//! coordinate systems (three paired GPS/pixel reference points) and
//! answers the queries the host layers need:
//!
//! - [`TransformEngine::world_to_pixel`] - pixel position for a GPS fix
//! - [`TransformEngine::north_angle`] - pixel direction of true north
//! - [`TransformEngine::pixels_per_meter`] - plan scale for zoom control
//!
//! Image decoding, sensor acquisition, and all rendering live in host
//! layers; this crate consumes and produces plain numbers only.

pub mod calibration;
pub mod engine;
pub mod projection;
pub mod storage;

pub use calibration::{Calibration, CalibrationPoint, GeoPoint, PlanPoint};
pub use engine::{CalibrationEvent, TransformEngine};
pub use projection::{PlanProjection, TransformError};
pub use storage::CalibrationStore;
