//! The transform engine: calibration state plus derived-quantity queries.
//!
//! One engine instance serves one loaded plan. It is constructed
//! explicitly and passed to the layers that need it; hosts that share
//! it across threads wrap it in a `Mutex`, which serializes queries
//! against calibration replacement so a query can never observe a torn
//! mix of old and new reference points. The caller must
//! [`clear_calibration`](TransformEngine::clear_calibration) when a
//! different plan is loaded, otherwise the stale calibration would
//! silently apply to the new image.

use std::fmt;

use geo_math::haversine_distance_meters;
use tracing::debug;

use crate::calibration::{Calibration, GeoPoint, PlanPoint};
use crate::projection::{PlanProjection, TransformError};

/// Fired to registered listeners after a mutation has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationEvent {
    /// A new calibration replaced the previous state
    Set,
    /// The engine was reset to the uncalibrated state
    Cleared,
}

type Listener = Box<dyn FnMut(CalibrationEvent) + Send>;

/// Calibration state holder and query surface for one loaded plan.
///
/// The derived transform is never cached: every query recomputes it
/// from the stored reference points, so the result is always consistent
/// with the latest calibration.
#[derive(Default)]
pub struct TransformEngine {
    calibration: Option<Calibration>,
    version: u64,
    listeners: Vec<Listener>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff all three reference pairs are set.
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Replace the calibration unconditionally.
    ///
    /// All six points are updated together; no geometric validation
    /// happens here since degeneracy only surfaces at derivation.
    /// Listeners fire synchronously after the new state is committed.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = Some(calibration);
        self.version += 1;
        debug!(version = self.version, "calibration replaced");
        self.notify(CalibrationEvent::Set);
    }

    /// Reset to the uncalibrated state. Idempotent: clearing an already
    /// clear engine changes nothing and notifies nobody.
    pub fn clear_calibration(&mut self) {
        if self.calibration.take().is_some() {
            self.version += 1;
            debug!(version = self.version, "calibration cleared");
            self.notify(CalibrationEvent::Cleared);
        }
    }

    /// Read-only view of the stored reference points, for persistence.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Monotonic counter bumped on every state change. Consumers that
    /// prefer polling over callbacks compare this against a remembered
    /// value to detect replacement or clearing.
    pub fn calibration_version(&self) -> u64 {
        self.version
    }

    /// Register a change listener. Listeners run synchronously on the
    /// mutating call, after the new state is fully committed.
    pub fn subscribe(&mut self, listener: impl FnMut(CalibrationEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: CalibrationEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn projection(&self) -> Result<PlanProjection, TransformError> {
        let calibration = self
            .calibration
            .as_ref()
            .ok_or(TransformError::NotCalibrated)?;
        PlanProjection::derive(calibration)
    }

    /// Map a live GPS fix to plan pixels.
    pub fn world_to_pixel(&self, world: GeoPoint) -> Result<PlanPoint, TransformError> {
        Ok(self.projection()?.world_to_pixel(world))
    }

    /// Pixel-space direction of geographic north in radians, 0 along
    /// the pixel +x axis.
    ///
    /// Returns 0.0 when uncalibrated or degenerate - a defined default,
    /// not an error. Callers that need to distinguish use
    /// [`is_calibrated`](Self::is_calibrated).
    pub fn north_angle(&self) -> f64 {
        self.projection()
            .map(|p| p.north_angle())
            .unwrap_or(0.0)
    }

    /// Plan scale in pixels per meter, from the geodesic and pixel
    /// distances between reference points 1 and 2.
    ///
    /// Point 3 is deliberately not consulted: scale has always been a
    /// two-point quantity here, and changing which points feed it would
    /// shift numeric output for previously saved calibrations.
    pub fn pixels_per_meter(&self) -> Result<f64, TransformError> {
        let calibration = self
            .calibration
            .as_ref()
            .ok_or(TransformError::NotCalibrated)?;

        let p1 = &calibration.points[0];
        let p2 = &calibration.points[1];

        let meters = haversine_distance_meters(
            p1.world.latitude,
            p1.world.longitude,
            p2.world.latitude,
            p2.world.longitude,
        );
        if meters == 0.0 {
            return Err(TransformError::ZeroWorldDistance);
        }

        let pixels = p1.pixel.distance_to(&p2.pixel);
        if pixels == 0.0 {
            return Err(TransformError::ZeroPixelDistance);
        }

        Ok(pixels / meters)
    }
}

impl fmt::Debug for TransformEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformEngine")
            .field("calibration", &self.calibration)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
