//! Directions capability contract.

use crate::model::geo::Coordinate;
use crate::model::route::{Route, TransportMode};
use crate::provider::RequestId;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DirectionsResult = Result<Vec<Route>, DirectionsError>;

/// Completion invoked exactly once per route request, on any thread.
pub type DirectionsCompletion = Box<dyn FnOnce(DirectionsResult) + Send + 'static>;

/// Parameters of one route calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionsRequest {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub mode: TransportMode,
}

/// Route calculation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionsError {
    /// Provider found no route, or returned one without geometry.
    NoRoute,
    /// Provider-side failure (network, throttling, service error).
    Provider(String),
}

impl Display for DirectionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoute => write!(f, "no route found"),
            Self::Provider(message) => write!(f, "directions provider failed: {message}"),
        }
    }
}

impl Error for DirectionsError {}

/// Route calculation backed by the platform service.
pub trait DirectionsProvider: Send + Sync {
    /// Starts calculating routes; results arrive through `completion`.
    ///
    /// `request_id` is issued by the controller and identifies this request
    /// for the host.
    fn route(
        &self,
        request_id: RequestId,
        request: DirectionsRequest,
        completion: DirectionsCompletion,
    );
}
