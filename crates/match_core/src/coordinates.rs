//! Coordinate transform between the feed scale and the plotting pitch.
//!
//! ## Coordinate Systems
//!
//! **Source coordinates** (event feed):
//! - X: 0 = own goal line, 100 = opponent goal line
//! - Y: 0-100 touchline to touchline
//!
//! **Pitch coordinates** (every plot-ready table):
//! - X: 0-120
//! - Y: 0-80
//!
//! Every component goes through [`PitchTransform`]; the scale factors live
//! nowhere else.

use serde::{Deserialize, Serialize};

/// Pitch length in plotting units.
pub const PITCH_LENGTH: f64 = 120.0;

/// Pitch width in plotting units.
pub const PITCH_WIDTH: f64 = 80.0;

/// Source scale maximum on both axes.
pub const SOURCE_MAX: f64 = 100.0;

/// A point on the 120x80 pitch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PitchPoint) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Angle of the vector from `self` to `other`, degrees in (-180, 180].
    pub fn angle_to(&self, other: &PitchPoint) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Linear rescale from the 100x100 feed scale to the 120x80 pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchTransform {
    scale_x: f64,
    scale_y: f64,
}

impl Default for PitchTransform {
    fn default() -> Self {
        Self {
            scale_x: PITCH_LENGTH / SOURCE_MAX,
            scale_y: PITCH_WIDTH / SOURCE_MAX,
        }
    }
}

impl PitchTransform {
    #[inline]
    pub fn scale_x(&self, x: f64) -> f64 {
        x * self.scale_x
    }

    #[inline]
    pub fn scale_y(&self, y: f64) -> f64 {
        y * self.scale_y
    }

    #[inline]
    pub fn to_pitch(&self, x: f64, y: f64) -> PitchPoint {
        PitchPoint::new(self.scale_x(x), self.scale_y(y))
    }

    /// Scale an optional end location; both coordinates must be present.
    pub fn end_to_pitch(&self, end_x: Option<f64>, end_y: Option<f64>) -> Option<PitchPoint> {
        Some(self.to_pitch(end_x?, end_y?))
    }
}
