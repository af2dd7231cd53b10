//! Map viewport regions and the arithmetic performed on them.
//!
//! # Responsibility
//! - Build regions from metric extents around a center.
//! - Scale regions for zoom, fit them around bounding boxes.
//! - Project screen points into a region for hosts without a native projection.
//!
//! # Invariants
//! - Both spans of a `MapRegion` are finite and strictly positive.
//! - Spans built from meters are capped at 180° latitude / 360° longitude.
//!   Scaling does not cap.
//! - A `BoundingBox` holds the narrower of the plain and the
//!   antimeridian-crossing longitude ranges of its points.

use crate::model::geo::{Coordinate, ScreenPoint, Viewport};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Length of one degree of latitude on the WGS84 equatorial sphere.
pub const METERS_PER_DEGREE: f64 = 111_319.490_793_273_57;
/// Smallest span used when fitting a degenerate (point or line) bounding box.
pub const MIN_FIT_SPAN_DEGREES: f64 = 0.002;

const MAX_LATITUDE_SPAN: f64 = 180.0;
const MAX_LONGITUDE_SPAN: f64 = 360.0;
// cos(89.9999°); keeps longitude spans finite at the poles.
const MIN_COS_LATITUDE: f64 = 1.745e-6;

/// Region construction and transformation errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionError {
    /// One span is zero, negative, or not finite.
    InvalidSpan {
        latitude_span: f64,
        longitude_span: f64,
    },
    /// Metric extent is zero, negative, or not finite.
    InvalidExtent(f64),
    /// Scale or padding factor is negative, zero where forbidden, or not finite.
    InvalidFactor(f64),
}

impl Display for RegionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpan {
                latitude_span,
                longitude_span,
            } => write!(
                f,
                "region spans must be finite and > 0, got lat={latitude_span} lon={longitude_span}"
            ),
            Self::InvalidExtent(meters) => {
                write!(f, "region extent must be finite and > 0 meters, got {meters}")
            }
            Self::InvalidFactor(factor) => write!(f, "invalid region factor: {factor}"),
        }
    }
}

impl Error for RegionError {}

/// Rectangular viewport: center plus latitude/longitude spans in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapRegion {
    center: Coordinate,
    latitude_span: f64,
    longitude_span: f64,
}

impl MapRegion {
    pub fn new(
        center: Coordinate,
        latitude_span: f64,
        longitude_span: f64,
    ) -> Result<Self, RegionError> {
        let valid = |span: f64| span.is_finite() && span > 0.0;
        if !valid(latitude_span) || !valid(longitude_span) {
            return Err(RegionError::InvalidSpan {
                latitude_span,
                longitude_span,
            });
        }
        Ok(Self {
            center,
            latitude_span,
            longitude_span,
        })
    }

    /// Region covering `latitudinal_m` north-south and `longitudinal_m`
    /// east-west in total, centered on `center`.
    pub fn from_meters(
        center: Coordinate,
        latitudinal_m: f64,
        longitudinal_m: f64,
    ) -> Result<Self, RegionError> {
        for meters in [latitudinal_m, longitudinal_m] {
            if !meters.is_finite() || meters <= 0.0 {
                return Err(RegionError::InvalidExtent(meters));
            }
        }

        let cos_lat = center
            .latitude()
            .to_radians()
            .cos()
            .max(MIN_COS_LATITUDE);
        let latitude_span = (latitudinal_m / METERS_PER_DEGREE).min(MAX_LATITUDE_SPAN);
        let longitude_span =
            (longitudinal_m / (METERS_PER_DEGREE * cos_lat)).min(MAX_LONGITUDE_SPAN);
        Self::new(center, latitude_span, longitude_span)
    }

    /// Region reaching `half_extent_m` meters from `center` along each axis.
    pub fn around(center: Coordinate, half_extent_m: f64) -> Result<Self, RegionError> {
        Self::from_meters(center, half_extent_m * 2.0, half_extent_m * 2.0)
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn latitude_span(&self) -> f64 {
        self.latitude_span
    }

    pub fn longitude_span(&self) -> f64 {
        self.longitude_span
    }

    /// Multiplies both spans by `factor`; the center is kept.
    pub fn scaled(&self, factor: f64) -> Result<Self, RegionError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RegionError::InvalidFactor(factor));
        }
        Self::new(
            self.center,
            self.latitude_span * factor,
            self.longitude_span * factor,
        )
    }

    /// Grows both spans by `ratio` of their size on every side.
    pub fn padded(&self, ratio: f64) -> Result<Self, RegionError> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(RegionError::InvalidFactor(ratio));
        }
        let grow = 1.0 + 2.0 * ratio;
        Self::new(
            self.center,
            (self.latitude_span * grow).min(MAX_LATITUDE_SPAN),
            (self.longitude_span * grow).min(MAX_LONGITUDE_SPAN),
        )
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let half_lat = self.latitude_span / 2.0;
        let half_lon = self.longitude_span / 2.0;
        (coordinate.latitude() - self.center.latitude()).abs() <= half_lat
            && wrapped_longitude_delta(coordinate.longitude(), self.center.longitude()).abs()
                <= half_lon
    }

    /// Linear (equirectangular) projection of a view point into this region.
    ///
    /// Longitude wraps across the antimeridian; latitudes past a pole yield
    /// `None`.
    pub fn coordinate_at(&self, point: ScreenPoint, viewport: Viewport) -> Option<Coordinate> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let latitude =
            self.center.latitude() + self.latitude_span * (0.5 - point.y / viewport.height);
        let longitude =
            self.center.longitude() + self.longitude_span * (point.x / viewport.width - 0.5);
        Coordinate::new(latitude, wrap_longitude(longitude)).ok()
    }
}

/// Axis-aligned latitude/longitude bounds of a set of coordinates.
///
/// A box crossing the antimeridian keeps `min_longitude <= max_longitude` by
/// shifting its eastern edge past 180, e.g. `179.5..=180.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Tightest box around `points`; picks the antimeridian-crossing
    /// longitude range when it is narrower. Returns `None` for an empty input.
    pub fn from_coordinates<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let points: Vec<Coordinate> = points.into_iter().copied().collect();
        let first = points.first()?;
        let seed = Self {
            min_latitude: first.latitude(),
            max_latitude: first.latitude(),
            min_longitude: first.longitude(),
            max_longitude: first.longitude(),
        };
        let plain = points.iter().fold(seed, |bounds, point| Self {
            min_latitude: bounds.min_latitude.min(point.latitude()),
            max_latitude: bounds.max_latitude.max(point.latitude()),
            min_longitude: bounds.min_longitude.min(point.longitude()),
            max_longitude: bounds.max_longitude.max(point.longitude()),
        });
        if plain.longitude_span() <= 180.0 {
            return Some(plain);
        }

        let (min_shifted, max_shifted) = points
            .iter()
            .map(|point| east_of_antimeridian(point.longitude()))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), lon| {
                (min.min(lon), max.max(lon))
            });
        if max_shifted - min_shifted < plain.longitude_span() {
            Some(Self {
                min_longitude: min_shifted,
                max_longitude: max_shifted,
                ..plain
            })
        } else {
            Some(plain)
        }
    }

    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let longitudes = self.min_longitude..=self.max_longitude;
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude())
            && (longitudes.contains(&coordinate.longitude())
                || longitudes.contains(&east_of_antimeridian(coordinate.longitude())))
    }

    /// Smallest region covering the box, with spans floored at
    /// [`MIN_FIT_SPAN_DEGREES`].
    pub fn to_region(&self) -> Result<MapRegion, RegionError> {
        let center = Coordinate::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            wrap_longitude((self.min_longitude + self.max_longitude) / 2.0),
        )
        .map_err(|_| RegionError::InvalidSpan {
            latitude_span: self.max_latitude - self.min_latitude,
            longitude_span: self.longitude_span(),
        })?;
        MapRegion::new(
            center,
            (self.max_latitude - self.min_latitude).max(MIN_FIT_SPAN_DEGREES),
            self.longitude_span().max(MIN_FIT_SPAN_DEGREES),
        )
    }
}

/// Maps western longitudes into `(180, 360)`; eastern ones are unchanged.
fn east_of_antimeridian(longitude: f64) -> f64 {
    if longitude < 0.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        return longitude;
    }
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && longitude > 0.0 {
        180.0
    } else {
        wrapped
    }
}

fn wrapped_longitude_delta(longitude: f64, reference: f64) -> f64 {
    let delta = longitude - reference;
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::{wrap_longitude, BoundingBox, MapRegion, RegionError, MIN_FIT_SPAN_DEGREES};
    use crate::model::geo::{Coordinate, ScreenPoint, Viewport};

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[test]
    fn around_equator_uses_same_span_on_both_axes() {
        let region = MapRegion::around(coord(0.0, 0.0), 100_000.0).expect("region");
        assert!((region.latitude_span() - 1.796_630_568).abs() < 1e-6);
        assert!((region.longitude_span() - region.latitude_span()).abs() < 1e-9);
    }

    #[test]
    fn around_widens_longitude_span_with_latitude() {
        let region = MapRegion::around(coord(60.0, 30.0), 100_000.0).expect("region");
        let ratio = region.longitude_span() / region.latitude_span();
        assert!((ratio - 2.0).abs() < 1e-9, "cos(60°) = 0.5 doubles the span");
    }

    #[test]
    fn around_caps_spans_near_the_pole() {
        let region = MapRegion::around(coord(90.0, 0.0), 1_000_000.0).expect("region");
        assert_eq!(region.longitude_span(), 360.0);
        assert!(region.latitude_span() < 180.0);
    }

    #[test]
    fn around_rejects_non_positive_extent() {
        let err = MapRegion::around(coord(0.0, 0.0), 0.0).unwrap_err();
        assert_eq!(err, RegionError::InvalidExtent(0.0));
    }

    #[test]
    fn scaled_rejects_underflow_to_zero() {
        let region = MapRegion::new(coord(0.0, 0.0), 1e-300, 1e-300).expect("region");
        assert!(matches!(
            region.scaled(1e-100),
            Err(RegionError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn bounding_box_of_single_point_gets_minimum_span() {
        let point = coord(10.0, 20.0);
        let region = BoundingBox::from_coordinates([&point])
            .expect("non-empty")
            .to_region()
            .expect("region");
        assert_eq!(region.center(), point);
        assert_eq!(region.latitude_span(), MIN_FIT_SPAN_DEGREES);
        assert_eq!(region.longitude_span(), MIN_FIT_SPAN_DEGREES);
    }

    #[test]
    fn bounding_box_is_none_for_empty_input() {
        let empty: Vec<Coordinate> = Vec::new();
        assert!(BoundingBox::from_coordinates(&empty).is_none());
    }

    #[test]
    fn bounding_box_across_antimeridian_takes_the_short_way() {
        let west_edge = coord(0.0, 179.5);
        let east_edge = coord(0.0, -179.5);
        let bounds = BoundingBox::from_coordinates([&west_edge, &east_edge]).expect("non-empty");
        assert!((bounds.longitude_span() - 1.0).abs() < 1e-9);
        assert!(bounds.contains(west_edge));
        assert!(bounds.contains(east_edge));
        assert!(!bounds.contains(coord(0.0, 0.0)));

        let region = bounds.to_region().expect("region");
        assert_eq!(region.center().longitude().abs(), 180.0);
        assert!((region.longitude_span() - 1.0).abs() < 1e-9);
        assert!(region.contains(west_edge));
        assert!(region.contains(east_edge));
        assert!(!region.contains(coord(0.0, 0.0)));
    }

    #[test]
    fn bounding_box_around_the_globe_keeps_plain_range() {
        let west = coord(10.0, -120.0);
        let middle = coord(0.0, 0.0);
        let east = coord(-10.0, 120.0);
        let bounds =
            BoundingBox::from_coordinates([&west, &middle, &east]).expect("non-empty");
        assert_eq!(bounds.min_longitude, -120.0);
        assert_eq!(bounds.max_longitude, 120.0);
        let region = bounds.to_region().expect("region");
        assert_eq!(region.center(), coord(0.0, 0.0));
        assert_eq!(region.longitude_span(), 240.0);
    }

    #[test]
    fn padded_grows_each_side() {
        let region = MapRegion::new(coord(0.0, 0.0), 2.0, 4.0).expect("region");
        let padded = region.padded(0.25).expect("padded");
        assert_eq!(padded.latitude_span(), 3.0);
        assert_eq!(padded.longitude_span(), 6.0);
        assert!(region.padded(-0.1).is_err());
    }

    #[test]
    fn coordinate_at_maps_corners_and_center() {
        let region = MapRegion::new(coord(50.0, 10.0), 2.0, 4.0).expect("region");
        let viewport = Viewport::new(200.0, 100.0).expect("viewport");

        assert_eq!(
            region.coordinate_at(viewport.center(), viewport),
            Some(coord(50.0, 10.0))
        );
        assert_eq!(
            region.coordinate_at(ScreenPoint::new(0.0, 0.0), viewport),
            Some(coord(51.0, 8.0))
        );
        assert_eq!(
            region.coordinate_at(ScreenPoint::new(200.0, 100.0), viewport),
            Some(coord(49.0, 12.0))
        );
    }

    #[test]
    fn coordinate_at_wraps_antimeridian() {
        let region = MapRegion::new(coord(0.0, 179.0), 2.0, 4.0).expect("region");
        let viewport = Viewport::new(100.0, 100.0).expect("viewport");
        let point = region
            .coordinate_at(ScreenPoint::new(100.0, 50.0), viewport)
            .expect("projectable");
        assert!((point.longitude() - -179.0).abs() < 1e-9);
        assert!(region.contains(point));
    }

    #[test]
    fn wrap_longitude_keeps_positive_edge() {
        assert_eq!(wrap_longitude(540.0), 180.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
    }
}
