//! Route, overlay and placemark models returned by external providers.
//!
//! # Responsibility
//! - Carry provider results into the controller in validated form.
//! - Derive the route overlay drawn on the map.
//!
//! # Invariants
//! - A `Route` always has a non-empty polyline and the bounds of that polyline.
//! - A `RouteOverlay` is derived from exactly one `Route`.

use crate::model::geo::Coordinate;
use crate::model::region::BoundingBox;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Travel mode requested from the directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Automobile,
    Walking,
    Transit,
    Any,
}

impl TransportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automobile => "automobile",
            Self::Walking => "walking",
            Self::Transit => "transit",
            Self::Any => "any",
        }
    }
}

/// Ordered coordinates describing a path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(Vec<Coordinate>);

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(&self.0)
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(value: Vec<Coordinate>) -> Self {
        Self::new(value)
    }
}

/// One route returned by the directions provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    polyline: Polyline,
    bounds: BoundingBox,
    /// Provider-reported length in meters, when known.
    pub distance_m: Option<f64>,
    /// Provider-reported travel time in seconds, when known.
    pub expected_travel_time_s: Option<f64>,
}

impl Route {
    /// Returns `None` when the polyline is empty.
    pub fn from_polyline(polyline: impl Into<Polyline>) -> Option<Self> {
        let polyline = polyline.into();
        let bounds = polyline.bounding_box()?;
        Some(Self {
            polyline,
            bounds,
            distance_m: None,
            expected_travel_time_s: None,
        })
    }

    pub fn with_metrics(mut self, distance_m: f64, expected_travel_time_s: f64) -> Self {
        self.distance_m = Some(distance_m);
        self.expected_travel_time_s = Some(expected_travel_time_s);
        self
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

/// The route line currently drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub id: Uuid,
    pub polyline: Polyline,
    pub bounds: BoundingBox,
}

impl RouteOverlay {
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: Uuid::new_v4(),
            polyline: route.polyline.clone(),
            bounds: route.bounds,
        }
    }
}

/// One geocoding match.
///
/// Providers may return a placemark without a resolved location; such
/// entries cannot be shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    pub coordinate: Option<Coordinate>,
    pub name: Option<String>,
}

impl Placemark {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            name: None,
        }
    }

    pub fn named(coordinate: Coordinate, name: impl Into<String>) -> Self {
        Self {
            coordinate: Some(coordinate),
            name: Some(name.into()),
        }
    }
}
