//! Core logic of the map screen.
//! This crate is the single source of truth for map-screen invariants.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod provider;
pub mod screen;

pub use config::{ConfigError, MapScreenConfig};
pub use controller::events::{EventOutcome, HostEvent, TapGesture, TapPhase};
pub use controller::map_screen::{ControllerError, MapScreenController, MapScreenProviders};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::annotation::{Annotation, AnnotationId, AnnotationKind};
pub use model::geo::{Coordinate, CoordinateError, ScreenPoint, Viewport};
pub use model::region::{BoundingBox, MapRegion, RegionError};
pub use model::route::{Placemark, Polyline, Route, RouteOverlay, TransportMode};
pub use provider::deferred::{DeferredDirections, DeferredError, DeferredGeocoder};
pub use provider::directions::{DirectionsError, DirectionsProvider, DirectionsRequest};
pub use provider::geocoder::{Geocoder, GeocodingError};
pub use provider::location::{AuthorizationStatus, LocationProvider, PermissionDenied};
pub use provider::surface::{CommandBufferSurface, MapSurface, SurfaceCommand};
pub use provider::RequestId;
pub use screen::controls::MapControl;
pub use screen::prompt::{SearchPrompt, SearchPromptResponse};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
