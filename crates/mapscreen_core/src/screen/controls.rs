//! Overlay control buttons and their placement.
//!
//! # Invariants
//! - The layout is built once per screen and never recomputed.
//! - Overlay buttons stack at the top-trailing edge in `ZoomIn`, `ZoomOut`,
//!   `ClearAll` order; `Search` lives in the navigation bar.

use crate::screen::render::Rgba;
use serde::{Deserialize, Serialize};

/// Inset from the trailing edge for stacked buttons.
pub const CONTROL_TRAILING_INSET: f32 = 10.0;
/// Vertical gap between stacked buttons.
pub const CONTROL_SPACING: f32 = 10.0;

/// User command bound to a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapControl {
    ZoomIn,
    ZoomOut,
    ClearAll,
    Search,
}

/// Where a button is anchored vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "anchor", content = "control")]
pub enum VerticalAnchor {
    /// Top of the safe area.
    SafeAreaTop,
    /// Below another button, separated by [`CONTROL_SPACING`].
    Below(MapControl),
    /// Right-hand item of the navigation bar.
    NavigationBar,
}

/// One visual control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlButton {
    pub control: MapControl,
    /// System symbol name, when the button is icon-only.
    pub icon: Option<String>,
    /// Text label, when the button is textual.
    pub title: Option<String>,
    pub background: Rgba,
    pub anchor: VerticalAnchor,
    pub trailing_inset: f32,
}

/// Every control wired onto the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub buttons: Vec<ControlButton>,
}

impl ScreenLayout {
    pub fn build() -> Self {
        let icon_button = |control, icon: &str, background, anchor| ControlButton {
            control,
            icon: Some(icon.to_string()),
            title: None,
            background,
            anchor,
            trailing_inset: CONTROL_TRAILING_INSET,
        };

        Self {
            buttons: vec![
                icon_button(
                    MapControl::ZoomIn,
                    "plus",
                    Rgba::TRANSLUCENT_LIGHT_GRAY,
                    VerticalAnchor::SafeAreaTop,
                ),
                icon_button(
                    MapControl::ZoomOut,
                    "minus",
                    Rgba::TRANSLUCENT_LIGHT_GRAY,
                    VerticalAnchor::Below(MapControl::ZoomIn),
                ),
                icon_button(
                    MapControl::ClearAll,
                    "clear",
                    Rgba::CLEAR,
                    VerticalAnchor::Below(MapControl::ZoomOut),
                ),
                ControlButton {
                    control: MapControl::Search,
                    icon: None,
                    title: Some("Search".to_string()),
                    background: Rgba::CLEAR,
                    anchor: VerticalAnchor::NavigationBar,
                    trailing_inset: 0.0,
                },
            ],
        }
    }

    pub fn button(&self, control: MapControl) -> Option<&ControlButton> {
        self.buttons.iter().find(|button| button.control == control)
    }

    /// Top offset of a stacked button from the safe-area top, given a uniform
    /// button height. `None` for navigation-bar items.
    pub fn stacked_offset(&self, control: MapControl, button_height: f32) -> Option<f32> {
        match self.button(control)?.anchor {
            VerticalAnchor::SafeAreaTop => Some(0.0),
            VerticalAnchor::Below(above) => self
                .stacked_offset(above, button_height)
                .map(|offset| offset + button_height + CONTROL_SPACING),
            VerticalAnchor::NavigationBar => None,
        }
    }
}
