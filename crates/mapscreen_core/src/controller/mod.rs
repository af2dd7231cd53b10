//! Map screen orchestration.
//!
//! # Responsibility
//! - Hold the single controller type that owns screen state.
//! - Define host events and the outcomes reported back to hosts.
//!
//! # Invariants
//! - All state changes happen on the thread that calls into the controller.

pub mod events;
pub mod map_screen;
