//! Geocoding capability contract.

use crate::model::route::Placemark;
use crate::provider::RequestId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GeocodeResult = Result<Vec<Placemark>, GeocodingError>;

/// Completion invoked exactly once per geocode request, on any thread.
pub type GeocodeCompletion = Box<dyn FnOnce(GeocodeResult) + Send + 'static>;

/// Geocoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingError {
    /// Query was blank after normalization; no provider call was made.
    EmptyQuery,
    /// Provider returned no usable match for the query.
    NoMatch(String),
    /// Provider-side failure (network, quota, service error).
    Provider(String),
}

impl Display for GeocodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "geocoding query must not be empty"),
            Self::NoMatch(query) => write!(f, "no geocoding match for `{query}`"),
            Self::Provider(message) => write!(f, "geocoding provider failed: {message}"),
        }
    }
}

impl Error for GeocodingError {}

/// Free-text address resolution backed by the platform service.
pub trait Geocoder: Send + Sync {
    /// Starts resolving `query`; the result arrives through `completion`.
    ///
    /// `request_id` is issued by the controller and identifies this request
    /// for the host.
    fn geocode_address(&self, request_id: RequestId, query: &str, completion: GeocodeCompletion);
}
