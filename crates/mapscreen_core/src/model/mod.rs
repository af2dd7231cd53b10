//! Value types for the map screen.
//!
//! # Responsibility
//! - Define coordinates, regions, pins and routes used by the controller.
//! - Keep validation at construction so downstream code can trust values.
//!
//! # Invariants
//! - Every `Coordinate` is in range; every `MapRegion` has positive spans.

pub mod annotation;
pub mod geo;
pub mod region;
pub mod route;
