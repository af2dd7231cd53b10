//! External capability contracts and host adapters.
//!
//! # Responsibility
//! - Define the surface, geocoder, directions and location capabilities the
//!   controller consumes.
//! - Provide adapters for hosts that render and resolve out of process.
//!
//! # Invariants
//! - Provider completions never mutate controller state directly; they only
//!   hand results back to the controller inbox.

pub mod deferred;
pub mod directions;
pub mod geocoder;
pub mod location;
pub mod surface;

/// Identifier of one in-flight provider request.
pub type RequestId = u64;
