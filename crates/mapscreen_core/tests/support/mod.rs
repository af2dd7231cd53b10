#![allow(dead_code)]

use mapscreen_core::model::route::Placemark;
use mapscreen_core::provider::geocoder::{GeocodeCompletion, GeocodeResult};
use mapscreen_core::provider::location::{AuthorizationStatus, LocationProvider};
use mapscreen_core::screen::render::OverlayStyle;
use mapscreen_core::{
    Annotation, Coordinate, DeferredDirections, Geocoder, MapRegion, MapScreenConfig,
    MapScreenController, MapScreenProviders, MapSurface, RequestId, RouteOverlay, ScreenPoint,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("valid coordinate")
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Surface double: counts calls and projects every point to a fixed coordinate.
#[derive(Default)]
pub struct RecordingSurface {
    pub projection: Option<Coordinate>,
    pub regions: Vec<MapRegion>,
    pub annotations_added: Vec<Annotation>,
    pub overlays_added: Vec<(RouteOverlay, OverlayStyle)>,
    pub remove_annotations_calls: usize,
    pub remove_overlays_calls: usize,
}

impl MapSurface for RecordingSurface {
    fn set_region(&mut self, region: &MapRegion, _animated: bool) {
        self.regions.push(*region);
    }

    fn add_annotation(&mut self, annotation: &Annotation) {
        self.annotations_added.push(annotation.clone());
    }

    fn remove_all_annotations(&mut self) {
        self.remove_annotations_calls += 1;
    }

    fn add_overlay(&mut self, overlay: &RouteOverlay, style: &OverlayStyle) {
        self.overlays_added.push((overlay.clone(), *style));
    }

    fn remove_all_overlays(&mut self) {
        self.remove_overlays_calls += 1;
    }

    fn project_screen_point(&self, _point: ScreenPoint) -> Option<Coordinate> {
        self.projection
    }
}

/// Geocoder double answering synchronously with a canned result.
pub struct StubGeocoder {
    result: GeocodeResult,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn answering(result: GeocodeResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_match(latitude: f64, longitude: f64) -> Self {
        Self::answering(Ok(vec![Placemark::at(coord(latitude, longitude))]))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

impl Geocoder for StubGeocoder {
    fn geocode_address(&self, _request_id: RequestId, query: &str, completion: GeocodeCompletion) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());
        completion(self.result.clone());
    }
}

/// Location double recording which actions the controller took.
pub struct StubLocation {
    pub status: AuthorizationStatus,
    pub permission_requests: AtomicUsize,
    pub update_starts: AtomicUsize,
}

impl StubLocation {
    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            status,
            permission_requests: AtomicUsize::new(0),
            update_starts: AtomicUsize::new(0),
        }
    }
}

impl LocationProvider for StubLocation {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_permission(&self) {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn start_updates(&self) {
        self.update_starts.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub controller: MapScreenController<RecordingSurface>,
    pub geocoder: Arc<StubGeocoder>,
    pub directions: Arc<DeferredDirections>,
}

pub fn harness_with(
    config: MapScreenConfig,
    geocoder: StubGeocoder,
    location: Option<Arc<StubLocation>>,
) -> Harness {
    let geocoder = Arc::new(geocoder);
    let directions = Arc::new(DeferredDirections::new());
    let providers = MapScreenProviders {
        geocoder: geocoder.clone(),
        directions: directions.clone(),
        location: location.map(|provider| provider as Arc<dyn LocationProvider>),
    };
    let controller = MapScreenController::new(config, RecordingSurface::default(), providers)
        .expect("controller should build");
    Harness {
        controller,
        geocoder,
        directions,
    }
}

/// Initialized controller with default config and a Paris-answering geocoder.
pub fn initialized_harness() -> Harness {
    let mut harness = harness_with(
        MapScreenConfig::default(),
        StubGeocoder::with_match(48.8566, 2.3522),
        None,
    );
    harness
        .controller
        .initialize()
        .expect("initialize should succeed");
    harness
}
