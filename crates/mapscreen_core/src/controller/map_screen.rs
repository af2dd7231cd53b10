//! Map screen controller.
//!
//! # Responsibility
//! - Own the screen state: region, pins, route overlay, in-flight requests.
//! - Translate host events into surface updates and provider requests.
//! - Apply provider completions on the UI thread through `pump()`.
//!
//! # Invariants
//! - Provider failures are logged and never change pins, overlay or region.
//! - At most one route overlay is drawn; the last applied route wins.
//! - Overlapping requests are neither deduplicated nor cancelled; every
//!   Start/Finish pair stays on the map until `clear_all`.
//! - `clear_all` removes every pin, the home pin included.
//! - Geocode and directions requests share one id space; providers receive
//!   the same id the controller returns.

use crate::config::{ConfigError, MapScreenConfig};
use crate::controller::events::{EventOutcome, HostEvent, TapGesture, TapPhase};
use crate::model::annotation::{Annotation, AnnotationId};
use crate::model::geo::{Coordinate, TAP_ROUNDING_DECIMALS};
use crate::model::region::{MapRegion, RegionError};
use crate::model::route::RouteOverlay;
use crate::provider::directions::{
    DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResult,
};
use crate::provider::geocoder::{GeocodeResult, Geocoder, GeocodingError};
use crate::provider::location::{AuthorizationStatus, LocationProvider, PermissionDenied};
use crate::provider::surface::MapSurface;
use crate::provider::RequestId;
use crate::screen::controls::{MapControl, ScreenLayout};
use crate::screen::prompt::{normalize_city_query, SearchPrompt, SearchPromptResponse};
use crate::screen::render::{annotation_view, AnnotationView, OverlayStyle};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use uuid::Uuid;

/// Controller setup and command errors.
#[derive(Debug)]
pub enum ControllerError {
    Config(ConfigError),
    Region(RegionError),
    Geocoding(GeocodingError),
    LocationUnavailable,
    PermissionDenied(PermissionDenied),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Region(err) => write!(f, "{err}"),
            Self::Geocoding(err) => write!(f, "{err}"),
            Self::LocationUnavailable => write!(f, "no location provider configured"),
            Self::PermissionDenied(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Region(err) => Some(err),
            Self::Geocoding(err) => Some(err),
            Self::PermissionDenied(err) => Some(err),
            Self::LocationUnavailable => None,
        }
    }
}

impl From<ConfigError> for ControllerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RegionError> for ControllerError {
    fn from(value: RegionError) -> Self {
        Self::Region(value)
    }
}

impl From<GeocodingError> for ControllerError {
    fn from(value: GeocodingError) -> Self {
        Self::Geocoding(value)
    }
}

impl From<PermissionDenied> for ControllerError {
    fn from(value: PermissionDenied) -> Self {
        Self::PermissionDenied(value)
    }
}

/// External services the controller talks to.
#[derive(Clone)]
pub struct MapScreenProviders {
    pub geocoder: Arc<dyn Geocoder>,
    pub directions: Arc<dyn DirectionsProvider>,
    /// `None` when the host offers no live location.
    pub location: Option<Arc<dyn LocationProvider>>,
}

/// Provider outcome waiting to be applied on the UI thread.
enum Completion {
    Directions {
        request_id: RequestId,
        result: DirectionsResult,
    },
    Geocode {
        request_id: RequestId,
        result: GeocodeResult,
    },
}

/// State owner and event handler of one map screen.
pub struct MapScreenController<S: MapSurface> {
    config: MapScreenConfig,
    surface: S,
    providers: MapScreenProviders,
    region: MapRegion,
    annotations: Vec<Annotation>,
    route_overlay: Option<RouteOverlay>,
    pending_directions: BTreeMap<RequestId, DirectionsRequest>,
    pending_geocodes: BTreeMap<RequestId, String>,
    next_request_id: RequestId,
    layout: Option<ScreenLayout>,
    inbox_tx: Sender<Completion>,
    inbox_rx: Receiver<Completion>,
}

impl<S: MapSurface> MapScreenController<S> {
    /// Validates `config` and prepares the home region. Nothing is drawn
    /// until [`initialize`](Self::initialize).
    pub fn new(
        config: MapScreenConfig,
        surface: S,
        providers: MapScreenProviders,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        let region = MapRegion::around(config.home, config.home_half_extent_m)?;
        let (inbox_tx, inbox_rx) = mpsc::channel();
        Ok(Self {
            config,
            surface,
            providers,
            region,
            annotations: Vec::new(),
            route_overlay: None,
            pending_directions: BTreeMap::new(),
            pending_geocodes: BTreeMap::new(),
            next_request_id: 1,
            layout: None,
            inbox_tx,
            inbox_rx,
        })
    }

    /// Builds the controls, shows the home region and drops the home pin.
    ///
    /// Runs the location-permission check when tracking is enabled. Repeated
    /// calls only log a warning.
    pub fn initialize(&mut self) -> Result<(), ControllerError> {
        if self.layout.is_some() {
            warn!("event=screen_init module=controller status=skipped reason=already_initialized");
            return Ok(());
        }
        self.layout = Some(ScreenLayout::build());

        let home = Annotation::home(self.config.home, self.config.home_title.clone());
        self.add_annotation(home);
        let region = MapRegion::around(self.config.home, self.config.home_half_extent_m)?;
        self.set_region(region);
        info!(
            "event=screen_init module=controller status=ok tracking={}",
            self.config.location_tracking_enabled
        );

        if self.config.location_tracking_enabled {
            if let Err(err) = self.check_location_permission() {
                warn!("event=location_permission module=controller status=error error={err}");
            }
        }
        Ok(())
    }

    /// Routes one host event to its handler.
    pub fn dispatch(&mut self, event: HostEvent) -> EventOutcome {
        match event {
            HostEvent::Tap(gesture) => self
                .handle_tap(gesture)
                .map_or(EventOutcome::Ignored, EventOutcome::RequestIssued),
            HostEvent::Control(MapControl::ZoomIn) => applied_if(self.zoom_in().is_ok()),
            HostEvent::Control(MapControl::ZoomOut) => applied_if(self.zoom_out().is_ok()),
            HostEvent::Control(MapControl::ClearAll) => {
                self.clear_all();
                EventOutcome::Applied
            }
            HostEvent::Control(MapControl::Search) => {
                EventOutcome::PresentPrompt(self.open_search_prompt())
            }
            HostEvent::SearchPrompt(response) => self.handle_search_prompt(response),
            HostEvent::LocationUpdated(fixes) => applied_if(self.on_location_update(&fixes)),
            HostEvent::AuthorizationChanged(status) => {
                if !self.config.location_tracking_enabled {
                    return EventOutcome::Ignored;
                }
                match self.apply_authorization(status) {
                    Ok(_) => EventOutcome::Applied,
                    Err(err) => {
                        warn!(
                            "event=location_permission module=controller status=error error={err}"
                        );
                        EventOutcome::Ignored
                    }
                }
            }
        }
    }

    /// Applies every provider completion received so far, in arrival order.
    ///
    /// Returns how many completions were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.inbox_rx.try_recv() {
            match completion {
                Completion::Directions { request_id, result } => {
                    self.apply_directions(request_id, result)
                }
                Completion::Geocode { request_id, result } => {
                    self.apply_geocode(request_id, result)
                }
            }
            applied += 1;
        }
        applied
    }

    /// Requests directions from home to the tapped point.
    ///
    /// Only the `Ended` phase is acted on. The projected coordinate is
    /// rounded to 5 decimals before use.
    pub fn handle_tap(&mut self, gesture: TapGesture) -> Option<RequestId> {
        if gesture.phase != TapPhase::Ended {
            return None;
        }
        let Some(raw) = self.surface.project_screen_point(gesture.point) else {
            warn!(
                "event=map_tap module=controller status=skipped reason=unprojectable x={} y={}",
                gesture.point.x, gesture.point.y
            );
            return None;
        };
        let destination = raw.rounded(TAP_ROUNDING_DECIMALS);
        debug!("event=map_tap module=controller status=ok raw={raw} destination={destination}");
        Some(self.request_directions(self.config.home, destination))
    }

    /// Pins Start/Finish and asks the directions provider for a route.
    pub fn request_directions(
        &mut self,
        source: Coordinate,
        destination: Coordinate,
    ) -> RequestId {
        self.add_annotation(Annotation::start(source));
        self.add_annotation(Annotation::finish(destination));

        let request = DirectionsRequest {
            source,
            destination,
            mode: self.config.transport_mode,
        };
        let request_id = self.issue_request_id();
        self.pending_directions.insert(request_id, request);

        let inbox = self.inbox_tx.clone();
        self.providers.directions.route(
            request_id,
            request,
            Box::new(move |result| {
                // The screen may be gone by the time the provider answers.
                let _ = inbox.send(Completion::Directions { request_id, result });
            }),
        );
        info!(
            "event=directions_requested module=controller status=ok request_id={request_id} mode={}",
            request.mode.as_str()
        );
        request_id
    }

    pub fn zoom_in(&mut self) -> Result<(), RegionError> {
        self.zoom_by(self.config.zoom_in_factor)
    }

    pub fn zoom_out(&mut self) -> Result<(), RegionError> {
        self.zoom_by(self.config.zoom_out_factor)
    }

    /// Removes every pin (home included) and the route overlay.
    pub fn clear_all(&mut self) {
        let removed = self.annotations.len();
        self.annotations.clear();
        self.route_overlay = None;
        self.surface.remove_all_annotations();
        self.surface.remove_all_overlays();
        info!("event=clear_all module=controller status=ok removed_annotations={removed}");
    }

    pub fn open_search_prompt(&self) -> SearchPrompt {
        SearchPrompt::default()
    }

    /// Starts geocoding `name`; blank input is rejected without a provider
    /// call.
    pub fn search_city(&mut self, name: &str) -> Result<RequestId, GeocodingError> {
        let Some(query) = normalize_city_query(name) else {
            warn!("event=city_search module=controller status=error error=empty_query");
            return Err(GeocodingError::EmptyQuery);
        };

        let request_id = self.issue_request_id();
        self.pending_geocodes.insert(request_id, query.clone());

        let inbox = self.inbox_tx.clone();
        self.providers.geocoder.geocode_address(
            request_id,
            &query,
            Box::new(move |result| {
                let _ = inbox.send(Completion::Geocode { request_id, result });
            }),
        );
        info!("event=city_search module=controller status=ok request_id={request_id}");
        Ok(request_id)
    }

    /// Recenters on the newest fix when live tracking is enabled.
    pub fn on_location_update(&mut self, fixes: &[Coordinate]) -> bool {
        if !self.config.location_tracking_enabled {
            debug!("event=location_update module=controller status=skipped reason=tracking_disabled");
            return false;
        }
        let Some(latest) = fixes.last().copied() else {
            return false;
        };
        match MapRegion::around(latest, self.config.location_half_extent_m) {
            Ok(region) => {
                debug!("event=location_update module=controller status=ok center={latest}");
                self.set_region(region);
                true
            }
            Err(err) => {
                warn!("event=location_update module=controller status=error error={err}");
                false
            }
        }
    }

    /// Reads the current authorization and acts on it: asks when undecided,
    /// starts updates when granted.
    ///
    /// # Errors
    /// - `LocationUnavailable` without a location provider.
    /// - `PermissionDenied` when access is denied or restricted. No settings
    ///   redirect is offered.
    pub fn check_location_permission(&self) -> Result<AuthorizationStatus, ControllerError> {
        let provider = self
            .providers
            .location
            .as_ref()
            .ok_or(ControllerError::LocationUnavailable)?;
        self.apply_authorization(provider.authorization_status())
    }

    /// View for the pin with `id`, `None` when no such pin is on the map.
    pub fn annotation_view(&self, id: AnnotationId) -> Option<AnnotationView> {
        self.annotations
            .iter()
            .find(|annotation| annotation.id == id)
            .map(annotation_view)
    }

    /// Stroke style for the overlay with `id`, `None` when it is not the
    /// current route.
    pub fn overlay_style(&self, id: Uuid) -> Option<OverlayStyle> {
        self.route_overlay
            .as_ref()
            .filter(|overlay| overlay.id == id)
            .map(|_| self.config.route_style)
    }

    pub fn home(&self) -> Coordinate {
        self.config.home
    }

    pub fn config(&self) -> &MapScreenConfig {
        &self.config
    }

    pub fn region(&self) -> MapRegion {
        self.region
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn route_overlay(&self) -> Option<&RouteOverlay> {
        self.route_overlay.as_ref()
    }

    pub fn overlay_count(&self) -> usize {
        usize::from(self.route_overlay.is_some())
    }

    /// In-flight directions requests, oldest first.
    pub fn pending_directions(&self) -> Vec<(RequestId, DirectionsRequest)> {
        self.pending_directions
            .iter()
            .map(|(id, request)| (*id, *request))
            .collect()
    }

    /// In-flight geocode queries, oldest first.
    pub fn pending_geocodes(&self) -> Vec<(RequestId, String)> {
        self.pending_geocodes
            .iter()
            .map(|(id, query)| (*id, query.clone()))
            .collect()
    }

    pub fn layout(&self) -> Option<&ScreenLayout> {
        self.layout.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn handle_search_prompt(&mut self, response: SearchPromptResponse) -> EventOutcome {
        match response {
            SearchPromptResponse::Cancel => EventOutcome::Ignored,
            SearchPromptResponse::Search(text) => self
                .search_city(&text)
                .map_or(EventOutcome::Ignored, EventOutcome::RequestIssued),
        }
    }

    fn apply_authorization(
        &self,
        status: AuthorizationStatus,
    ) -> Result<AuthorizationStatus, ControllerError> {
        let provider = self
            .providers
            .location
            .as_ref()
            .ok_or(ControllerError::LocationUnavailable)?;
        match status {
            AuthorizationStatus::NotDetermined => provider.request_permission(),
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                return Err(PermissionDenied { status }.into());
            }
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways => {
                provider.start_updates()
            }
        }
        info!(
            "event=location_permission module=controller status=ok authorization={}",
            status.as_str()
        );
        Ok(status)
    }

    fn apply_directions(&mut self, request_id: RequestId, result: DirectionsResult) {
        self.pending_directions.remove(&request_id);
        let route = match result.and_then(|routes| {
            routes.into_iter().next().ok_or(DirectionsError::NoRoute)
        }) {
            Ok(route) => route,
            Err(err) => {
                warn!(
                    "event=directions_failed module=controller status=error request_id={request_id} error={err}"
                );
                return;
            }
        };

        let overlay = RouteOverlay::from_route(&route);
        let fitted = route
            .bounds()
            .to_region()
            .and_then(|region| region.padded(self.config.route_fit_padding));

        self.surface.remove_all_overlays();
        self.surface.add_overlay(&overlay, &self.config.route_style);
        self.route_overlay = Some(overlay);
        match fitted {
            Ok(region) => self.set_region(region),
            Err(err) => warn!(
                "event=route_fit module=controller status=error request_id={request_id} error={err}"
            ),
        }
        info!(
            "event=route_drawn module=controller status=ok request_id={request_id} points={} distance_m={:?}",
            route.polyline().len(),
            route.distance_m
        );
    }

    fn apply_geocode(&mut self, request_id: RequestId, result: GeocodeResult) {
        let query = self.pending_geocodes.remove(&request_id).unwrap_or_default();
        let coordinate = match result {
            Ok(placemarks) => placemarks
                .into_iter()
                .next()
                .and_then(|placemark| placemark.coordinate),
            Err(err) => {
                warn!(
                    "event=city_search_failed module=controller status=error request_id={request_id} error={err}"
                );
                return;
            }
        };
        let Some(coordinate) = coordinate else {
            let err = GeocodingError::NoMatch(query);
            warn!(
                "event=city_search_failed module=controller status=error request_id={request_id} error={err}"
            );
            return;
        };

        match MapRegion::around(coordinate, self.config.search_half_extent_m) {
            Ok(region) => {
                self.set_region(region);
                self.add_annotation(Annotation::search_result(coordinate));
                debug!(
                    "event=city_found module=controller status=ok request_id={request_id} center={coordinate}"
                );
            }
            Err(err) => warn!(
                "event=city_search_failed module=controller status=error request_id={request_id} error={err}"
            ),
        }
    }

    fn zoom_by(&mut self, factor: f64) -> Result<(), RegionError> {
        match self.region.scaled(factor) {
            Ok(region) => {
                self.set_region(region);
                Ok(())
            }
            Err(err) => {
                warn!("event=zoom module=controller status=skipped factor={factor} error={err}");
                Err(err)
            }
        }
    }

    fn set_region(&mut self, region: MapRegion) {
        self.region = region;
        self.surface.set_region(&region, true);
    }

    fn add_annotation(&mut self, annotation: Annotation) {
        self.surface.add_annotation(&annotation);
        self.annotations.push(annotation);
    }

    fn issue_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

fn applied_if(applied: bool) -> EventOutcome {
    if applied {
        EventOutcome::Applied
    } else {
        EventOutcome::Ignored
    }
}
