//! Render answers for annotation and overlay requests from the map surface.

use crate::model::annotation::{Annotation, AnnotationId};
use serde::{Deserialize, Serialize};

/// Reuse identifier shared by every pin view.
pub const ANNOTATION_REUSE_IDENTIFIER: &str = "CustomAnnotation";

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLUE: Rgba = Rgba::new(0, 0, 255, 255);
    pub const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);
    /// Light gray at 50% opacity, used behind zoom buttons.
    pub const TRANSLUCENT_LIGHT_GRAY: Rgba = Rgba::new(170, 170, 170, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Stroke style for route polylines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub stroke_color: Rgba,
    pub line_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::BLUE,
            line_width: 5.0,
        }
    }
}

/// Visual form of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    Marker,
}

/// View description returned for one annotation render request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationView {
    pub annotation_id: AnnotationId,
    pub reuse_identifier: String,
    pub style: MarkerStyle,
    pub can_show_callout: bool,
    pub title: Option<String>,
}

/// Builds the view for a pin. Every kind shares one marker style; the title
/// shows in the callout.
pub fn annotation_view(annotation: &Annotation) -> AnnotationView {
    AnnotationView {
        annotation_id: annotation.id,
        reuse_identifier: ANNOTATION_REUSE_IDENTIFIER.to_string(),
        style: MarkerStyle::Marker,
        can_show_callout: true,
        title: annotation.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{annotation_view, OverlayStyle, Rgba, ANNOTATION_REUSE_IDENTIFIER};
    use crate::model::annotation::Annotation;
    use crate::model::geo::Coordinate;

    #[test]
    fn default_overlay_style_is_blue_five_points() {
        let style = OverlayStyle::default();
        assert_eq!(style.stroke_color, Rgba::BLUE);
        assert_eq!(style.line_width, 5.0);
    }

    #[test]
    fn annotation_view_reuses_identifier_and_shows_callout() {
        let coordinate = Coordinate::new(1.0, 2.0).expect("valid coordinate");
        let pin = Annotation::start(coordinate);
        let view = annotation_view(&pin);
        assert_eq!(view.annotation_id, pin.id);
        assert_eq!(view.reuse_identifier, ANNOTATION_REUSE_IDENTIFIER);
        assert!(view.can_show_callout);
        assert_eq!(view.title.as_deref(), Some("Start"));
    }
}
