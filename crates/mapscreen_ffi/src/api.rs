//! FFI use-case API for the Flutter map screen.
//!
//! # Responsibility
//! - Expose one process-wide map screen session to Dart via FRB.
//! - Let the Dart host replay surface commands on its own map widget and
//!   answer geocode/directions requests it resolved on the platform.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call that can change state pumps provider completions before it
//!   returns, so drained commands always reflect applied results.
//! - Request ids returned here are the controller's ids, which are also the
//!   ids `screen_fulfill_*`/`screen_fail_*` expect.

use log::{info, warn};
use mapscreen_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CommandBufferSurface, Coordinate, DeferredDirections, DeferredGeocoder, DirectionsError,
    GeocodingError, MapScreenConfig, MapScreenController, MapScreenProviders, Placemark, Route,
    ScreenPoint, TapGesture, Viewport,
};
use std::sync::{Arc, Mutex, MutexGuard};

const DEFAULT_VIEW_WIDTH: f64 = 390.0;
const DEFAULT_VIEW_HEIGHT: f64 = 844.0;

static SESSION: Mutex<Option<ScreenSession>> = Mutex::new(None);

struct ScreenSession {
    controller: MapScreenController<CommandBufferSurface>,
    geocoder: Arc<DeferredGeocoder>,
    directions: Arc<DeferredDirections>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope for screen commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Provider request started by this call, if any.
    pub request_id: Option<u64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ScreenActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            request_id: None,
            message: message.into(),
        }
    }

    fn issued(message: impl Into<String>, request_id: u64) -> Self {
        Self {
            ok: true,
            request_id: Some(request_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            request_id: None,
            message: message.into(),
        }
    }
}

/// Read-only view of the current screen state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub open: bool,
    pub annotation_count: u32,
    pub overlay_count: u32,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

/// Provider request waiting for the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequestItem {
    pub request_id: u64,
    /// `geocode` or `directions`.
    pub kind: String,
    /// City query for geocode requests.
    pub query: Option<String>,
    /// Request body as JSON (`DirectionsRequest` for directions).
    pub payload_json: String,
}

/// Opens the map screen session and shows the home region.
///
/// Input semantics:
/// - `config_json`: `MapScreenConfig` JSON; blank input uses defaults.
///
/// # FFI contract
/// - Replaces any open session; its pending requests are dropped.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_open(config_json: String) -> ScreenActionResponse {
    let config = if config_json.trim().is_empty() {
        MapScreenConfig::default()
    } else {
        match MapScreenConfig::from_json_str(&config_json) {
            Ok(config) => config,
            Err(err) => return ScreenActionResponse::failure(format!("screen_open failed: {err}")),
        }
    };

    let viewport = match Viewport::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT) {
        Some(viewport) => viewport,
        None => return ScreenActionResponse::failure("screen_open failed: invalid viewport"),
    };
    let geocoder = Arc::new(DeferredGeocoder::new());
    let directions = Arc::new(DeferredDirections::new());
    let providers = MapScreenProviders {
        geocoder: geocoder.clone(),
        directions: directions.clone(),
        location: None,
    };

    let mut controller =
        match MapScreenController::new(config, CommandBufferSurface::new(viewport), providers) {
            Ok(controller) => controller,
            Err(err) => return ScreenActionResponse::failure(format!("screen_open failed: {err}")),
        };
    if let Err(err) = controller.initialize() {
        return ScreenActionResponse::failure(format!("screen_open failed: {err}"));
    }

    let mut guard = lock_session();
    if guard.is_some() {
        warn!("event=screen_open module=ffi status=ok replaced_session=true");
    }
    *guard = Some(ScreenSession {
        controller,
        geocoder,
        directions,
    });
    info!("event=screen_open module=ffi status=ok");
    ScreenActionResponse::success("Screen opened.")
}

/// Updates the map view size used to project taps.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_resize(width: f64, height: f64) -> ScreenActionResponse {
    let Some(viewport) = Viewport::new(width, height) else {
        return ScreenActionResponse::failure(format!(
            "screen_resize failed: invalid size {width}x{height}"
        ));
    };
    with_session("screen_resize", |session| {
        session.controller.surface_mut().resize(viewport);
        ScreenActionResponse::success("Viewport updated.")
    })
}

/// Completed tap at view point `(x, y)`: requests directions from home.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_tap(x: f64, y: f64) -> ScreenActionResponse {
    with_session("screen_tap", |session| {
        let gesture = TapGesture::ended(ScreenPoint::new(x, y));
        match session.controller.handle_tap(gesture) {
            Some(request_id) => ScreenActionResponse::issued("Directions requested.", request_id),
            None => ScreenActionResponse::failure("Tap is outside the map."),
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_zoom_in() -> ScreenActionResponse {
    with_session("screen_zoom_in", |session| {
        match session.controller.zoom_in() {
            Ok(()) => ScreenActionResponse::success("Zoomed in."),
            Err(err) => ScreenActionResponse::failure(format!("screen_zoom_in failed: {err}")),
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_zoom_out() -> ScreenActionResponse {
    with_session("screen_zoom_out", |session| {
        match session.controller.zoom_out() {
            Ok(()) => ScreenActionResponse::success("Zoomed out."),
            Err(err) => ScreenActionResponse::failure(format!("screen_zoom_out failed: {err}")),
        }
    })
}

/// Removes every pin and the route overlay.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_clear() -> ScreenActionResponse {
    with_session("screen_clear", |session| {
        session.controller.clear_all();
        ScreenActionResponse::success("Map cleared.")
    })
}

/// Starts a city search. Blank text fails without a request.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_search(text: String) -> ScreenActionResponse {
    with_session("screen_search", |session| {
        match session.controller.search_city(&text) {
            Ok(request_id) => ScreenActionResponse::issued("City search started.", request_id),
            Err(err) => ScreenActionResponse::failure(format!("screen_search failed: {err}")),
        }
    })
}

/// Reports one location fix; ignored unless tracking is enabled.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_location_update(latitude: f64, longitude: f64) -> ScreenActionResponse {
    let fix = match Coordinate::new(latitude, longitude) {
        Ok(fix) => fix,
        Err(err) => {
            return ScreenActionResponse::failure(format!("screen_location_update failed: {err}"))
        }
    };
    with_session("screen_location_update", |session| {
        if session.controller.on_location_update(&[fix]) {
            ScreenActionResponse::success("Region follows location.")
        } else {
            ScreenActionResponse::failure("Location tracking is disabled.")
        }
    })
}

/// Returns queued surface commands as a JSON array and clears the queue.
///
/// # FFI contract
/// - Returns `[]` when no session is open.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_drain_commands() -> String {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return "[]".to_string();
    };
    session.controller.pump();
    let commands = session.controller.surface_mut().drain_commands();
    match serde_json::to_string(&commands) {
        Ok(json) => json,
        Err(err) => {
            warn!("event=drain_commands module=ffi status=error error={err}");
            "[]".to_string()
        }
    }
}

/// Geocode and directions requests the host still has to answer, oldest
/// first within each kind.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_pending_requests() -> Vec<PendingRequestItem> {
    let guard = lock_session();
    let Some(session) = guard.as_ref() else {
        return Vec::new();
    };

    let geocodes = session
        .geocoder
        .pending()
        .into_iter()
        .map(|(request_id, query)| PendingRequestItem {
            request_id,
            kind: "geocode".to_string(),
            payload_json: serde_json::json!({ "query": query }).to_string(),
            query: Some(query),
        });
    let directions = session
        .directions
        .pending()
        .into_iter()
        .map(|(request_id, request)| {
            let payload_json = match serde_json::to_string(&request) {
                Ok(json) => json,
                Err(err) => {
                    warn!(
                        "event=pending_requests module=ffi status=error request_id={request_id} error={err}"
                    );
                    "{}".to_string()
                }
            };
            PendingRequestItem {
                request_id,
                kind: "directions".to_string(),
                query: None,
                payload_json,
            }
        });
    geocodes.chain(directions).collect()
}

/// Answers geocode request `request_id` with one match.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_fulfill_geocode(
    request_id: u64,
    latitude: f64,
    longitude: f64,
    name: Option<String>,
) -> ScreenActionResponse {
    let coordinate = match Coordinate::new(latitude, longitude) {
        Ok(coordinate) => coordinate,
        Err(err) => {
            return ScreenActionResponse::failure(format!("screen_fulfill_geocode failed: {err}"))
        }
    };
    let placemark = match name {
        Some(name) => Placemark::named(coordinate, name),
        None => Placemark::at(coordinate),
    };
    with_session("screen_fulfill_geocode", |session| {
        match session.geocoder.fulfill(request_id, vec![placemark]) {
            Ok(()) => ScreenActionResponse::success("Geocode applied."),
            Err(err) => {
                ScreenActionResponse::failure(format!("screen_fulfill_geocode failed: {err}"))
            }
        }
    })
}

/// Fails geocode request `request_id`. Blank `message` means no match.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_fail_geocode(request_id: u64, message: String) -> ScreenActionResponse {
    with_session("screen_fail_geocode", |session| {
        let error = if message.trim().is_empty() {
            let query = session
                .geocoder
                .pending()
                .into_iter()
                .find(|(id, _)| *id == request_id)
                .map(|(_, query)| query)
                .unwrap_or_default();
            GeocodingError::NoMatch(query)
        } else {
            GeocodingError::Provider(message.trim().to_string())
        };
        match session.geocoder.fail(request_id, error) {
            Ok(()) => ScreenActionResponse::success("Geocode failure recorded."),
            Err(err) => ScreenActionResponse::failure(format!("screen_fail_geocode failed: {err}")),
        }
    })
}

/// Answers directions request `request_id` with one route.
///
/// Input semantics:
/// - `points_json`: JSON array of `{latitude, longitude}`; an empty array
///   means no route was found.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_fulfill_directions(
    request_id: u64,
    points_json: String,
    distance_m: Option<f64>,
    expected_travel_time_s: Option<f64>,
) -> ScreenActionResponse {
    let points: Vec<Coordinate> = match serde_json::from_str(&points_json) {
        Ok(points) => points,
        Err(err) => {
            return ScreenActionResponse::failure(format!(
                "screen_fulfill_directions failed: invalid points: {err}"
            ))
        }
    };
    let routes = Route::from_polyline(points)
        .map(|mut route| {
            route.distance_m = distance_m;
            route.expected_travel_time_s = expected_travel_time_s;
            route
        })
        .into_iter()
        .collect::<Vec<_>>();

    with_session("screen_fulfill_directions", |session| {
        match session.directions.fulfill(request_id, routes) {
            Ok(()) => ScreenActionResponse::success("Directions applied."),
            Err(err) => {
                ScreenActionResponse::failure(format!("screen_fulfill_directions failed: {err}"))
            }
        }
    })
}

/// Fails directions request `request_id`. Blank `message` means no route.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_fail_directions(request_id: u64, message: String) -> ScreenActionResponse {
    let error = if message.trim().is_empty() {
        DirectionsError::NoRoute
    } else {
        DirectionsError::Provider(message.trim().to_string())
    };
    with_session("screen_fail_directions", |session| {
        match session.directions.fail(request_id, error) {
            Ok(()) => ScreenActionResponse::success("Directions failure recorded."),
            Err(err) => {
                ScreenActionResponse::failure(format!("screen_fail_directions failed: {err}"))
            }
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_snapshot() -> ScreenSnapshot {
    let guard = lock_session();
    match guard.as_ref() {
        Some(session) => {
            let controller = &session.controller;
            let region = controller.region();
            ScreenSnapshot {
                open: true,
                annotation_count: controller.annotation_count() as u32,
                overlay_count: controller.overlay_count() as u32,
                center_latitude: region.center().latitude(),
                center_longitude: region.center().longitude(),
                latitude_span: region.latitude_span(),
                longitude_span: region.longitude_span(),
            }
        }
        None => ScreenSnapshot {
            open: false,
            annotation_count: 0,
            overlay_count: 0,
            center_latitude: 0.0,
            center_longitude: 0.0,
            latitude_span: 0.0,
            longitude_span: 0.0,
        },
    }
}

/// Closes the session. Late provider answers for it are discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_close() -> ScreenActionResponse {
    match lock_session().take() {
        Some(_) => {
            info!("event=screen_close module=ffi status=ok");
            ScreenActionResponse::success("Screen closed.")
        }
        None => ScreenActionResponse::failure("No screen is open."),
    }
}

fn lock_session() -> MutexGuard<'static, Option<ScreenSession>> {
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session(
    operation: &str,
    f: impl FnOnce(&mut ScreenSession) -> ScreenActionResponse,
) -> ScreenActionResponse {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return ScreenActionResponse::failure(format!("{operation} failed: no screen is open"));
    };
    let response = f(session);
    session.controller.pump();
    response
}
