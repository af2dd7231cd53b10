//! Visual elements wired onto the map screen.
//!
//! # Responsibility
//! - Describe control buttons, the search prompt and render styles.
//! - Stay free of controller state so hosts can render from descriptions.

pub mod controls;
pub mod prompt;
pub mod render;
