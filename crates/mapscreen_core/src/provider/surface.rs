//! Map surface capability and the command-buffer adapter.
//!
//! # Responsibility
//! - Define the rendering sink the controller drives.
//! - Provide `CommandBufferSurface`, which records every call as a
//!   `SurfaceCommand` for a host (Flutter, CLI) to replay on its own widget.
//!
//! # Invariants
//! - The surface never owns domain state; it only mirrors controller calls.
//! - `CommandBufferSurface` projects taps against the last region it was
//!   given; before any region it cannot project.

use crate::model::annotation::Annotation;
use crate::model::geo::{Coordinate, ScreenPoint, Viewport};
use crate::model::region::MapRegion;
use crate::model::route::RouteOverlay;
use crate::screen::render::OverlayStyle;
use serde::Serialize;

/// Rendering sink driven by the map screen controller.
pub trait MapSurface {
    fn set_region(&mut self, region: &MapRegion, animated: bool);
    fn add_annotation(&mut self, annotation: &Annotation);
    fn remove_all_annotations(&mut self);
    fn add_overlay(&mut self, overlay: &RouteOverlay, style: &OverlayStyle);
    fn remove_all_overlays(&mut self);
    /// Converts a view point into a map coordinate, `None` when the point
    /// does not map onto the globe.
    fn project_screen_point(&self, point: ScreenPoint) -> Option<Coordinate>;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum SurfaceCommand {
    SetRegion {
        region: MapRegion,
        animated: bool,
    },
    AddAnnotation {
        annotation: Annotation,
    },
    RemoveAllAnnotations,
    AddOverlay {
        overlay: RouteOverlay,
        style: OverlayStyle,
    },
    RemoveAllOverlays,
}

/// Surface that queues commands for an out-of-process renderer.
#[derive(Debug, Clone)]
pub struct CommandBufferSurface {
    viewport: Viewport,
    region: Option<MapRegion>,
    commands: Vec<SurfaceCommand>,
}

impl CommandBufferSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            region: None,
            commands: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the view size after a host layout pass.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Last region pushed by the controller.
    pub fn region(&self) -> Option<MapRegion> {
        self.region
    }

    /// Commands recorded since the last drain, oldest first.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Takes all queued commands, leaving the buffer empty.
    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl MapSurface for CommandBufferSurface {
    fn set_region(&mut self, region: &MapRegion, animated: bool) {
        self.region = Some(*region);
        self.commands.push(SurfaceCommand::SetRegion {
            region: *region,
            animated,
        });
    }

    fn add_annotation(&mut self, annotation: &Annotation) {
        self.commands.push(SurfaceCommand::AddAnnotation {
            annotation: annotation.clone(),
        });
    }

    fn remove_all_annotations(&mut self) {
        self.commands.push(SurfaceCommand::RemoveAllAnnotations);
    }

    fn add_overlay(&mut self, overlay: &RouteOverlay, style: &OverlayStyle) {
        self.commands.push(SurfaceCommand::AddOverlay {
            overlay: overlay.clone(),
            style: *style,
        });
    }

    fn remove_all_overlays(&mut self) {
        self.commands.push(SurfaceCommand::RemoveAllOverlays);
    }

    fn project_screen_point(&self, point: ScreenPoint) -> Option<Coordinate> {
        self.region?.coordinate_at(point, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandBufferSurface, MapSurface, SurfaceCommand};
    use crate::model::geo::{Coordinate, ScreenPoint, Viewport};
    use crate::model::region::MapRegion;

    fn surface() -> CommandBufferSurface {
        CommandBufferSurface::new(Viewport::new(100.0, 100.0).expect("viewport"))
    }

    #[test]
    fn projection_needs_a_region() {
        let mut surface = surface();
        assert!(surface
            .project_screen_point(ScreenPoint::new(50.0, 50.0))
            .is_none());

        let center = Coordinate::new(10.0, 20.0).expect("valid coordinate");
        let region = MapRegion::new(center, 1.0, 1.0).expect("region");
        surface.set_region(&region, true);
        assert_eq!(
            surface.project_screen_point(ScreenPoint::new(50.0, 50.0)),
            Some(center)
        );
    }

    #[test]
    fn drain_empties_the_buffer_in_order() {
        let mut surface = surface();
        surface.remove_all_annotations();
        surface.remove_all_overlays();

        let drained = surface.drain_commands();
        assert_eq!(
            drained,
            vec![
                SurfaceCommand::RemoveAllAnnotations,
                SurfaceCommand::RemoveAllOverlays
            ]
        );
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let mut surface = surface();
        surface.remove_all_overlays();
        let json = serde_json::to_value(surface.commands()).expect("serialize");
        assert_eq!(json[0]["op"], "remove_all_overlays");
    }
}
