//! Flutter bridge for the map screen core.

pub mod api;
