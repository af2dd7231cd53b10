//! Host-fulfilled providers.
//!
//! # Responsibility
//! - Park geocode/route requests until the host reports an outcome.
//! - Key parked requests by the controller-issued id the host echoes back
//!   on fulfillment.
//!
//! # Invariants
//! - Each parked completion runs at most once.
//! - A parked id is the same id the controller returned for the request.
//! - Completions run outside the internal lock.

use crate::model::route::{Placemark, Route};
use crate::provider::directions::{
    DirectionsCompletion, DirectionsError, DirectionsProvider, DirectionsRequest,
};
use crate::provider::geocoder::{GeocodeCompletion, Geocoder, GeocodingError};
use crate::provider::RequestId;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

/// Fulfillment errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredError {
    /// No parked request has this id (never issued, or already fulfilled).
    UnknownRequest(RequestId),
}

impl Display for DeferredError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRequest(id) => write!(f, "no pending request with id {id}"),
        }
    }
}

impl Error for DeferredError {}

struct Parked<Q, C> {
    query: Q,
    completion: C,
}

struct ParkedQueue<Q, C> {
    pending: BTreeMap<RequestId, Parked<Q, C>>,
}

impl<Q: Clone, C> ParkedQueue<Q, C> {
    fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Returns `false` when `id` replaced an older parked request.
    fn park(&mut self, id: RequestId, query: Q, completion: C) -> bool {
        self.pending
            .insert(id, Parked { query, completion })
            .is_none()
    }

    fn take(&mut self, id: RequestId) -> Result<Parked<Q, C>, DeferredError> {
        self.pending
            .remove(&id)
            .ok_or(DeferredError::UnknownRequest(id))
    }

    fn snapshot(&self) -> Vec<(RequestId, Q)> {
        self.pending
            .iter()
            .map(|(id, parked)| (*id, parked.query.clone()))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking completion never runs under the lock, so poisoned state is
    // still consistent.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Geocoder whose answers are supplied later by the host.
pub struct DeferredGeocoder {
    queue: Mutex<ParkedQueue<String, GeocodeCompletion>>,
}

impl Default for DeferredGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredGeocoder {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(ParkedQueue::new()),
        }
    }

    /// Pending `(id, query)` pairs, oldest first.
    pub fn pending(&self) -> Vec<(RequestId, String)> {
        lock(&self.queue).snapshot()
    }

    pub fn fulfill(&self, id: RequestId, placemarks: Vec<Placemark>) -> Result<(), DeferredError> {
        let parked = lock(&self.queue).take(id)?;
        (parked.completion)(Ok(placemarks));
        Ok(())
    }

    pub fn fail(&self, id: RequestId, error: GeocodingError) -> Result<(), DeferredError> {
        let parked = lock(&self.queue).take(id)?;
        (parked.completion)(Err(error));
        Ok(())
    }
}

impl Geocoder for DeferredGeocoder {
    fn geocode_address(&self, request_id: RequestId, query: &str, completion: GeocodeCompletion) {
        if !lock(&self.queue).park(request_id, query.to_string(), completion) {
            warn!("event=geocode_parked module=provider status=ok request_id={request_id} replaced=true");
            return;
        }
        debug!("event=geocode_parked module=provider status=ok request_id={request_id}");
    }
}

/// Directions provider whose answers are supplied later by the host.
pub struct DeferredDirections {
    queue: Mutex<ParkedQueue<DirectionsRequest, DirectionsCompletion>>,
}

impl Default for DeferredDirections {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredDirections {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(ParkedQueue::new()),
        }
    }

    /// Pending `(id, request)` pairs, oldest first.
    pub fn pending(&self) -> Vec<(RequestId, DirectionsRequest)> {
        lock(&self.queue).snapshot()
    }

    pub fn fulfill(&self, id: RequestId, routes: Vec<Route>) -> Result<(), DeferredError> {
        let parked = lock(&self.queue).take(id)?;
        (parked.completion)(Ok(routes));
        Ok(())
    }

    pub fn fail(&self, id: RequestId, error: DirectionsError) -> Result<(), DeferredError> {
        let parked = lock(&self.queue).take(id)?;
        (parked.completion)(Err(error));
        Ok(())
    }
}

impl DirectionsProvider for DeferredDirections {
    fn route(
        &self,
        request_id: RequestId,
        request: DirectionsRequest,
        completion: DirectionsCompletion,
    ) {
        if !lock(&self.queue).park(request_id, request, completion) {
            warn!("event=route_parked module=provider status=ok request_id={request_id} replaced=true");
            return;
        }
        debug!(
            "event=route_parked module=provider status=ok request_id={request_id} mode={}",
            request.mode.as_str()
        );
    }
}
