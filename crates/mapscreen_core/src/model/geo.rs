//! Geographic and screen-space value types.
//!
//! # Responsibility
//! - Define the validated `Coordinate` shared by every map operation.
//! - Provide fixed-precision rounding for tap-derived coordinates.
//! - Describe screen points and viewport sizes used by projections.
//!
//! # Invariants
//! - A `Coordinate` always holds finite latitude in `[-90, 90]` and finite
//!   longitude in `[-180, 180]`, including after deserialization.
//! - Rounding uses round-half-away-from-zero.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decimal places kept for tap-derived destinations (about 1.1 m).
pub const TAP_ROUNDING_DECIMALS: u32 = 5;

/// Coordinate validation errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude is outside `[-90, 90]` or not finite.
    InvalidLatitude(f64),
    /// Longitude is outside `[-180, 180]` or not finite.
    InvalidLongitude(f64),
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLatitude(value) => {
                write!(f, "latitude {value} must be a finite value in [-90, 90]")
            }
            Self::InvalidLongitude(value) => {
                write!(f, "longitude {value} must be a finite value in [-180, 180]")
            }
        }
    }
}

impl Error for CoordinateError {}

/// WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateWire", into = "CoordinateWire")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct CoordinateWire {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<CoordinateWire> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: CoordinateWire) -> Result<Self, Self::Error> {
        Coordinate::new(value.latitude, value.longitude)
    }
}

impl From<Coordinate> for CoordinateWire {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl Coordinate {
    /// Creates a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from values already known to be in range.
    ///
    /// Only for crate constants; callers must keep both axes inside the
    /// ranges `new` enforces.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns this coordinate with both axes rounded to `decimals` places.
    ///
    /// Rounding a value inside the valid range never leaves it, so the result
    /// needs no re-validation.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            latitude: round_to_decimals(self.latitude, decimals),
            longitude: round_to_decimals(self.longitude, decimals),
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Rounds `value` to `decimals` places, halves away from zero.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Point in view coordinates; origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the map view in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Returns `None` unless both sides are finite and positive.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |side: f64| side.is_finite() && side > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{round_to_decimals, Coordinate, CoordinateError, ScreenPoint, Viewport};

    #[test]
    fn new_accepts_range_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range_and_nan() {
        assert_eq!(
            Coordinate::new(90.5, 0.0).unwrap_err(),
            CoordinateError::InvalidLatitude(90.5)
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1).unwrap_err(),
            CoordinateError::InvalidLongitude(-180.1)
        );
        assert!(matches!(
            Coordinate::new(f64::NAN, 0.0),
            Err(CoordinateError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_to_decimals(1.25, 1), 1.3);
        assert_eq!(round_to_decimals(-1.25, 1), -1.3);
        assert_eq!(round_to_decimals(-2.5, 0), -3.0);
        assert_eq!(round_to_decimals(2.5, 0), 3.0);
    }

    #[test]
    fn viewport_rejects_empty_sides() {
        assert!(Viewport::new(0.0, 10.0).is_none());
        assert!(Viewport::new(10.0, f64::INFINITY).is_none());
        let viewport = Viewport::new(390.0, 844.0).expect("valid viewport");
        assert_eq!(viewport.center(), ScreenPoint::new(195.0, 422.0));
        assert!(!viewport.contains(ScreenPoint::new(-1.0, 5.0)));
    }
}
