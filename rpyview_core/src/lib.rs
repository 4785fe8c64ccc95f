//! rpyview Core - frame logic for the live attitude and position plotter
//!
//! Everything here is pure and synchronous, so each update can be tested
//! without a display:
//! 1. **Orientation**: `Rz · Ry · Rx` rotation of a ±1 cube from pitch/roll/yaw
//! 2. **Path**: a 7-point trailing window of lon/lat fixes with jump auto-scaling
//! 3. **History**: a rolling attitude window for time-series panels

pub mod error;
pub mod history;
pub mod orientation;
pub mod path;
pub mod sample;

// Re-export key types for convenience
pub use error::SampleError;
pub use history::{AttitudeHistory, Axis};
pub use orientation::{CubeAnimator, CubeFrame, CubeModel, EdgeSegment};
pub use path::{AxisRange, GeoPoint, PathBuffer, PathTracer, TraceUpdate, TracerConfig, ViewBounds};
pub use sample::{OrientationSample, PositionSample};
