//! Map annotation (pin) model.
//!
//! # Invariants
//! - `id` is generated once per pin and never reused.
//! - `Start`/`Finish` pins carry their fixed titles; search results are
//!   unlabeled.

use crate::model::geo::Coordinate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier hosts use to correlate pins with native views.
pub type AnnotationId = Uuid;

pub const START_TITLE: &str = "Start";
pub const FINISH_TITLE: &str = "Finish";

/// Why a pin was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// The fixed home location.
    Home,
    /// Source of a directions request.
    Start,
    /// Destination of a directions request.
    Finish,
    /// First match of a city search.
    SearchResult,
}

/// One pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub coordinate: Coordinate,
    pub title: Option<String>,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, coordinate: Coordinate, title: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            coordinate,
            title,
            kind,
        }
    }

    pub fn home(coordinate: Coordinate, title: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Home, coordinate, Some(title.into()))
    }

    pub fn start(coordinate: Coordinate) -> Self {
        Self::new(
            AnnotationKind::Start,
            coordinate,
            Some(START_TITLE.to_string()),
        )
    }

    pub fn finish(coordinate: Coordinate) -> Self {
        Self::new(
            AnnotationKind::Finish,
            coordinate,
            Some(FINISH_TITLE.to_string()),
        )
    }

    pub fn search_result(coordinate: Coordinate) -> Self {
        Self::new(AnnotationKind::SearchResult, coordinate, None)
    }
}
