//! Viewer configuration.

use rpyview_core::history::DEFAULT_HISTORY_LEN;
use rpyview_core::path::{DEFAULT_LAT_RANGE, DEFAULT_LON_RANGE, DEFAULT_MAX_POINTS};
use rpyview_core::{GeoPoint, TracerConfig};
use rpyview_env::{DEFAULT_DATA_FILE, DEFAULT_FRAME_INTERVAL};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Which components run each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Rotating cube from a 3-field line
    Cube,

    /// Lat/lon trace from a 6-field line
    Path,

    /// Both components, each reading the file on its own. A line in one
    /// layout is skipped quietly by the other component.
    Both,
}

impl ViewMode {
    pub fn all() -> Vec<ViewMode> {
        vec![ViewMode::Cube, ViewMode::Path, ViewMode::Both]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Cube => "cube",
            ViewMode::Path => "path",
            ViewMode::Both => "both",
        }
    }

    pub fn shows_cube(&self) -> bool {
        matches!(self, ViewMode::Cube | ViewMode::Both)
    }

    pub fn shows_path(&self) -> bool {
        matches!(self, ViewMode::Path | ViewMode::Both)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cube" | "orientation" | "rpy" => Ok(ViewMode::Cube),
            "path" | "position" | "trace" => Ok(ViewMode::Path),
            "both" | "all" => Ok(ViewMode::Both),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Frame interval must be greater than zero")]
    ZeroInterval,

    #[error("{0} must be at least 1")]
    ZeroCapacity(&'static str),

    #[error("{name} must be a positive finite number, got {value}")]
    InvalidRange { name: &'static str, value: f64 },

    #[error("Initial view needs both --initial-lon and --initial-lat")]
    PartialInitialView,
}

/// Configuration for a viewer run.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Data file polled every tick
    pub data_path: PathBuf,

    /// Components to run
    pub mode: ViewMode,

    /// Tick period
    pub interval: Duration,

    /// Path trace window length
    pub max_points: usize,

    /// Full longitude range of the path view (degrees)
    pub lon_range: f64,

    /// Full latitude range of the path view (degrees)
    pub lat_range: f64,

    /// Initial longitude of the path view center
    pub initial_lon: Option<f64>,

    /// Initial latitude of the path view center
    pub initial_lat: Option<f64>,

    /// Attitude time-series window length
    pub history_len: usize,

    /// Stop after this many ticks (`None` = until interrupted)
    pub max_frames: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            mode: ViewMode::Cube,
            interval: DEFAULT_FRAME_INTERVAL,
            max_points: DEFAULT_MAX_POINTS,
            lon_range: DEFAULT_LON_RANGE,
            lat_range: DEFAULT_LAT_RANGE,
            initial_lon: None,
            initial_lat: None,
            history_len: DEFAULT_HISTORY_LEN,
            max_frames: None,
        }
    }
}

impl ViewerConfig {
    /// Checks the values a run cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.max_points == 0 {
            return Err(ConfigError::ZeroCapacity("max points"));
        }
        if self.history_len == 0 {
            return Err(ConfigError::ZeroCapacity("history length"));
        }
        for (name, value) in [("lon range", self.lon_range), ("lat range", self.lat_range)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidRange { name, value });
            }
        }
        if self.initial_lon.is_some() != self.initial_lat.is_some() {
            return Err(ConfigError::PartialInitialView);
        }
        Ok(())
    }

    /// Center of the initial path view, when both coordinates are given.
    pub fn initial_center(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.initial_lon?, self.initial_lat?))
    }

    pub fn tracer_config(&self) -> TracerConfig {
        TracerConfig {
            max_points: self.max_points,
            lon_range: self.lon_range,
            lat_range: self.lat_range,
            initial_center: self.initial_center(),
        }
    }
}
