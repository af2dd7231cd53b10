//! Screen configuration loading and validation.
//!
//! # Responsibility
//! - Hold every tunable of the map screen with its default value.
//! - Load overrides from JSON text or a file and reject invalid values.
//!
//! # Invariants
//! - A config returned by `from_json_str`/`from_file` has passed `validate()`.
//! - Unknown keys are rejected so typos do not silently fall back to defaults.

use crate::model::geo::Coordinate;
use crate::model::route::TransportMode;
use crate::screen::render::OverlayStyle;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "MAPSCREEN_CONFIG";

pub const DEFAULT_HOME_LATITUDE: f64 = 57.92149;
pub const DEFAULT_HOME_LONGITUDE: f64 = 59.98162;
pub const DEFAULT_HOME_TITLE: &str = "I live here";
pub const DEFAULT_HOME_HALF_EXTENT_M: f64 = 100_000.0;
pub const DEFAULT_SEARCH_HALF_EXTENT_M: f64 = 100_000.0;
pub const DEFAULT_LOCATION_HALF_EXTENT_M: f64 = 1_000_000.0;
pub const DEFAULT_ZOOM_IN_FACTOR: f64 = 0.5;
pub const DEFAULT_ZOOM_OUT_FACTOR: f64 = 1.5;
pub const DEFAULT_ROUTE_FIT_PADDING: f64 = 0.05;

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables of one map screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapScreenConfig {
    /// Fixed home location shown at startup.
    pub home: Coordinate,
    /// Callout title of the home pin.
    pub home_title: String,
    /// Half-extent of the startup region, in meters.
    pub home_half_extent_m: f64,
    /// Half-extent of the region shown around a search match, in meters.
    pub search_half_extent_m: f64,
    /// Half-extent of the region shown around a live location, in meters.
    pub location_half_extent_m: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Extra margin around a fitted route, as a ratio of its span per side.
    pub route_fit_padding: f64,
    pub transport_mode: TransportMode,
    /// Live location tracking; off by default.
    pub location_tracking_enabled: bool,
    pub route_style: OverlayStyle,
}

impl Default for MapScreenConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            home_title: DEFAULT_HOME_TITLE.to_string(),
            home_half_extent_m: DEFAULT_HOME_HALF_EXTENT_M,
            search_half_extent_m: DEFAULT_SEARCH_HALF_EXTENT_M,
            location_half_extent_m: DEFAULT_LOCATION_HALF_EXTENT_M,
            zoom_in_factor: DEFAULT_ZOOM_IN_FACTOR,
            zoom_out_factor: DEFAULT_ZOOM_OUT_FACTOR,
            route_fit_padding: DEFAULT_ROUTE_FIT_PADDING,
            transport_mode: TransportMode::Automobile,
            location_tracking_enabled: false,
            route_style: OverlayStyle::default(),
        }
    }
}

impl MapScreenConfig {
    /// Parses and validates a JSON document; missing keys take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Loads the file at `explicit`, else at `$MAPSCREEN_CONFIG`, else
    /// returns defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("home_half_extent_m", self.home_half_extent_m)?;
        require_positive("search_half_extent_m", self.search_half_extent_m)?;
        require_positive("location_half_extent_m", self.location_half_extent_m)?;
        require_positive("zoom_in_factor", self.zoom_in_factor)?;
        require_positive("zoom_out_factor", self.zoom_out_factor)?;
        if !self.route_fit_padding.is_finite() || self.route_fit_padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "route_fit_padding",
                reason: format!("must be finite and >= 0, got {}", self.route_fit_padding),
            });
        }
        let width = self.route_style.line_width;
        if !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "route_style.line_width",
                reason: format!("must be finite and > 0, got {width}"),
            });
        }
        Ok(())
    }
}

const DEFAULT_HOME: Coordinate =
    Coordinate::new_unchecked(DEFAULT_HOME_LATITUDE, DEFAULT_HOME_LONGITUDE);

fn default_home() -> Coordinate {
    DEFAULT_HOME
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let raw = std::env::var(CONFIG_PATH_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, MapScreenConfig, DEFAULT_HOME, DEFAULT_HOME_LATITUDE, DEFAULT_HOME_LONGITUDE,
    };
    use crate::model::geo::Coordinate;
    use crate::model::route::TransportMode;

    #[test]
    fn default_home_passes_coordinate_validation() {
        let validated = Coordinate::new(DEFAULT_HOME_LATITUDE, DEFAULT_HOME_LONGITUDE)
            .expect("default home is in range");
        assert_eq!(DEFAULT_HOME, validated);
    }

    #[test]
    fn defaults_describe_the_home_screen() {
        let config = MapScreenConfig::default();
        assert_eq!(config.home.latitude(), DEFAULT_HOME_LATITUDE);
        assert_eq!(config.home.longitude(), DEFAULT_HOME_LONGITUDE);
        assert_eq!(config.home_title, "I live here");
        assert_eq!(config.transport_mode, TransportMode::Automobile);
        assert!(!config.location_tracking_enabled);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = MapScreenConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, MapScreenConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = MapScreenConfig::from_json_str(
            r#"{"home": {"latitude": 48.8566, "longitude": 2.3522}, "zoom_in_factor": 0.25}"#,
        )
        .expect("parse");
        assert_eq!(config.home.latitude(), 48.8566);
        assert_eq!(config.zoom_in_factor, 0.25);
        assert_eq!(config.zoom_out_factor, 1.5);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_coordinates() {
        let unknown = MapScreenConfig::from_json_str(r#"{"zoom": 2}"#).unwrap_err();
        assert!(matches!(unknown, ConfigError::Parse(_)));

        let bad_home = MapScreenConfig::from_json_str(
            r#"{"home": {"latitude": 123.0, "longitude": 0.0}}"#,
        )
        .unwrap_err();
        assert!(bad_home.to_string().contains("latitude"));
    }

    #[test]
    fn rejects_non_positive_extents() {
        let err =
            MapScreenConfig::from_json_str(r#"{"search_half_extent_m": 0}"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "search_half_extent_m"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_explicit_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mapscreen.json");
        std::fs::write(&path, r#"{"home_title": "Base camp", "transport_mode": "walking"}"#)
            .expect("write config");

        let config = MapScreenConfig::load(Some(&path)).expect("load config");
        assert_eq!(config.home_title, "Base camp");
        assert_eq!(config.transport_mode, TransportMode::Walking);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let err = MapScreenConfig::from_file(&path).unwrap_err();
        match &err {
            ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("absent.json"));
    }
}
