//! Host events fed into the controller and the outcomes it reports back.

use crate::model::geo::{Coordinate, ScreenPoint};
use crate::provider::location::AuthorizationStatus;
use crate::provider::RequestId;
use crate::screen::controls::MapControl;
use crate::screen::prompt::{SearchPrompt, SearchPromptResponse};
use serde::{Deserialize, Serialize};

/// Recognizer phase of a tap gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Single-finger tap on the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapGesture {
    pub point: ScreenPoint,
    pub phase: TapPhase,
}

impl TapGesture {
    /// A completed tap, the only phase the controller acts on.
    pub fn ended(point: ScreenPoint) -> Self {
        Self {
            point,
            phase: TapPhase::Ended,
        }
    }
}

/// Everything the host can report to the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Tap(TapGesture),
    Control(MapControl),
    SearchPrompt(SearchPromptResponse),
    /// Batch of location fixes, oldest first.
    LocationUpdated(Vec<Coordinate>),
    AuthorizationChanged(AuthorizationStatus),
}

/// What handling one host event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// State changed synchronously.
    Applied,
    /// A provider request is in flight.
    RequestIssued(RequestId),
    /// The host should present this prompt.
    PresentPrompt(SearchPrompt),
    /// Nothing to do (wrong gesture phase, tracking disabled, cancel, ...).
    Ignored,
}
