//! Rerun visualization for the live viewer.
//!
//! Visualization is optional and only available with the `visualization`
//! feature. Without it every drawing call is a no-op and the runner only logs.
//!
//! # What Gets Logged
//!
//! - `world/cube`: the 12 rotated cube edges and vertices inside the fixed ±2 box
//! - `cube_xy`: the same edges projected onto the x/y plane
//! - `trace`: the lon/lat path, its points and the current view bounds
//! - `attitude`: rolling pitch/roll/yaw time series
//! - `metrics`: latest attitude angles and height as scalars
//! - `logs`: skipped-frame diagnostics

#[cfg(feature = "visualization")]
use rerun::{RecordingStream, RecordingStreamBuilder};
use rpyview_core::{AttitudeHistory, CubeFrame, PathTracer};
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "visualization")]
use rpyview_core::orientation::ORIENTATION_AXIS_LIMIT;
#[cfg(feature = "visualization")]
use rpyview_core::Axis;

/// Rerun logger for the cube, trace and attitude panels.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    /// Creates a new logger with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Spawns a Rerun viewer window and streams to it.
    #[cfg(feature = "visualization")]
    pub fn spawn(app_id: &str) -> Self {
        match RecordingStreamBuilder::new(app_id).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun viewer spawned");
                Self::with_stream(rec)
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self::disabled()
            }
        }
    }

    /// Records to an `.rrd` file instead of a live window.
    #[cfg(feature = "visualization")]
    pub fn save(app_id: &str, path: &Path) -> Self {
        match RecordingStreamBuilder::new(app_id).save(path) {
            Ok(rec) => {
                tracing::info!("Recording to {}", path.display());
                Self::with_stream(rec)
            }
            Err(e) => {
                tracing::warn!("Failed to open Rerun recording {}: {:?}", path.display(), e);
                Self::disabled()
            }
        }
    }

    #[cfg(feature = "visualization")]
    fn with_stream(rec: RecordingStream) -> Self {
        Self {
            rec: Some(rec),
            enabled: true,
        }
    }

    /// Returns disabled if visualization feature not enabled.
    #[cfg(not(feature = "visualization"))]
    pub fn spawn(_app_id: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    #[cfg(not(feature = "visualization"))]
    pub fn save(_app_id: &str, _path: &Path) -> Self {
        tracing::info!("Rerun recording not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "visualization")]
    fn emit<E: std::fmt::Debug>(what: &str, result: Result<(), E>) {
        if let Err(e) = result {
            tracing::warn!("Rerun failed to log {}: {:?}", what, e);
        }
    }

    /// Sets the frame number and elapsed time for subsequent logs.
    #[cfg(feature = "visualization")]
    pub fn set_frame(&self, frame: u64, elapsed: Duration) {
        if let Some(ref rec) = self.rec {
            rec.set_time_sequence("frame", frame as i64);
            rec.set_duration_secs("elapsed", elapsed.as_secs_f64());
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn set_frame(&self, _frame: u64, _elapsed: Duration) {}

    /// Logs the static parts of the scene: coordinates and the fixed cube limits.
    #[cfg(feature = "visualization")]
    pub fn log_scene_setup(&self) {
        if let Some(ref rec) = self.rec {
            Self::emit(
                "view coordinates",
                rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP()),
            );

            let limit = ORIENTATION_AXIS_LIMIT as f32;
            Self::emit(
                "cube limits",
                rec.log_static(
                    "world/limits",
                    &rerun::Boxes3D::from_half_sizes([[limit, limit, limit]])
                        .with_colors([[90, 90, 90, 120]]), // Gray
                ),
            );
            Self::emit(
                "projection limits",
                rec.log_static(
                    "cube_xy/limits",
                    &rerun::Boxes2D::from_mins_and_sizes([[-limit, -limit]], [[2.0 * limit, 2.0 * limit]])
                        .with_colors([[90, 90, 90, 120]]),
                ),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_scene_setup(&self) {}

    /// Redraws the cube edges in 3D and their x/y projection.
    #[cfg(feature = "visualization")]
    pub fn log_cube(&self, frame: &CubeFrame) {
        if let Some(ref rec) = self.rec {
            let edges: Vec<[[f32; 3]; 2]> = frame
                .segments()
                .iter()
                .map(|s| {
                    let [a, b] = s.endpoints();
                    [
                        [a[0] as f32, a[1] as f32, a[2] as f32],
                        [b[0] as f32, b[1] as f32, b[2] as f32],
                    ]
                })
                .collect();

            Self::emit(
                "cube edges",
                rec.log(
                    "world/cube/edges",
                    &rerun::LineStrips3D::new(edges).with_colors([[0, 0, 255, 255]]), // Blue
                ),
            );

            let vertices: Vec<[f32; 3]> = frame
                .vertices
                .iter()
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect();
            Self::emit(
                "cube vertices",
                rec.log(
                    "world/cube/vertices",
                    &rerun::Points3D::new(vertices)
                        .with_colors([[0, 0, 255, 255]])
                        .with_radii([0.05]),
                ),
            );

            let projected: Vec<Vec<[f32; 2]>> = frame
                .segments()
                .iter()
                .map(|s| {
                    s.projected()
                        .iter()
                        .map(|p| [p[0] as f32, p[1] as f32])
                        .collect()
                })
                .collect();
            Self::emit(
                "cube projection",
                rec.log(
                    "cube_xy/edges",
                    &rerun::LineStrips2D::new(projected).with_colors([[0, 0, 255, 255]]),
                ),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_cube(&self, _frame: &CubeFrame) {}

    /// Redraws the path trace and the current view bounds.
    #[cfg(feature = "visualization")]
    pub fn log_path(&self, tracer: &PathTracer) {
        if let Some(ref rec) = self.rec {
            let points: Vec<[f32; 2]> = tracer
                .buffer()
                .iter()
                .map(|p| [p.longitude as f32, p.latitude as f32])
                .collect();

            Self::emit(
                "path line",
                rec.log(
                    "trace/path",
                    &rerun::LineStrips2D::new([points.clone()])
                        .with_colors([[255, 0, 0, 255]]) // Red
                        .with_radii([rerun::Radius::new_ui_points(2.0)]),
                ),
            );
            Self::emit(
                "path points",
                rec.log(
                    "trace/points",
                    &rerun::Points2D::new(points)
                        .with_colors([[255, 0, 0, 255]])
                        .with_radii([rerun::Radius::new_ui_points(3.0)]),
                ),
            );

            if let Some(bounds) = tracer.bounds() {
                Self::emit(
                    "view bounds",
                    rec.log(
                        "trace/bounds",
                        &rerun::Boxes2D::from_mins_and_sizes(
                            [[bounds.x.min as f32, bounds.y.min as f32]],
                            [[bounds.x.span() as f32, bounds.y.span() as f32]],
                        )
                        .with_colors([[120, 120, 120, 255]])
                        .with_labels(["Longitude × Latitude"]),
                    ),
                );
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_path(&self, _tracer: &PathTracer) {}

    /// Redraws the rolling attitude panel and logs the latest angles.
    #[cfg(feature = "visualization")]
    pub fn log_attitude(&self, history: &AttitudeHistory) {
        if let Some(ref rec) = self.rec {
            for axis in Axis::all() {
                let series: Vec<[f32; 2]> = history
                    .series(axis)
                    .iter()
                    .map(|p| [p[0] as f32, p[1] as f32])
                    .collect();

                let color = match axis {
                    Axis::Roll => [255, 100, 100, 255],  // Red
                    Axis::Pitch => [100, 255, 100, 255], // Green
                    Axis::Yaw => [100, 100, 255, 255],   // Blue
                };

                Self::emit(
                    "attitude series",
                    rec.log(
                        format!("attitude/{}", axis),
                        &rerun::LineStrips2D::new([series]).with_colors([color]),
                    ),
                );
            }

            if let Some((_, sample)) = history.latest() {
                for (axis, value) in [
                    (Axis::Roll, sample.roll),
                    (Axis::Pitch, sample.pitch),
                    (Axis::Yaw, sample.yaw),
                ] {
                    Self::emit(
                        "attitude scalar",
                        rec.log(format!("metrics/{}", axis), &rerun::Scalars::new([value])),
                    );
                }
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_attitude(&self, _history: &AttitudeHistory) {}

    /// Logs the height from the position line.
    #[cfg(feature = "visualization")]
    pub fn log_height(&self, height: f64) {
        if let Some(ref rec) = self.rec {
            Self::emit(
                "height",
                rec.log("metrics/height", &rerun::Scalars::new([height])),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_height(&self, _height: f64) {}

    /// Logs a text diagnostic (e.g., a skipped frame).
    #[cfg(feature = "visualization")]
    pub fn log_event(&self, path: &str, message: &str) {
        if let Some(ref rec) = self.rec {
            Self::emit(
                "event",
                rec.log(
                    path,
                    &rerun::TextLog::new(message).with_level(rerun::TextLogLevel::WARN),
                ),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_event(&self, _path: &str, _message: &str) {}
}
