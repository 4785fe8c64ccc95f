//! Trailing-window path trace with jump-style auto-scaling.
//!
//! # Auto-scaling
//!
//! The view only moves when a freshly appended point lands outside it. When it
//! does, each axis is recomputed from the buffered points as
//! `[min - half_range, max + half_range]`. There is no interpolation, so the
//! zoom visibly jumps.

use crate::error::SampleError;
use crate::sample::PositionSample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of points kept in the trace.
pub const DEFAULT_MAX_POINTS: usize = 7;

/// Default full longitude range of the view, in degrees.
pub const DEFAULT_LON_RANGE: f64 = 0.1;

/// Default full latitude range of the view, in degrees.
pub const DEFAULT_LAT_RANGE: f64 = 0.1;

/// A trace point: longitude on x, latitude on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Degrees, plotted on x
    pub longitude: f64,

    /// Degrees, plotted on y
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a point from longitude and latitude.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

/// Fixed-capacity FIFO of trace points.
#[derive(Debug, Clone)]
pub struct PathBuffer {
    points: VecDeque<GeoPoint>,
    capacity: usize,
}

impl PathBuffer {
    /// Creates an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a point, returning the evicted oldest point when over capacity.
    pub fn push(&mut self, point: GeoPoint) -> Option<GeoPoint> {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// Number of points currently held.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True before the first point arrives.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of points kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&GeoPoint> {
        self.points.back()
    }

    /// The x data of the trace.
    pub fn longitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.longitude).collect()
    }

    /// The y data of the trace.
    pub fn latitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.latitude).collect()
    }

    /// Tight bounds around the buffered points, or `None` when empty.
    pub fn extent(&self) -> Option<ViewBounds> {
        let first = self.points.front()?;
        let mut x = AxisRange::new(first.longitude, first.longitude);
        let mut y = AxisRange::new(first.latitude, first.latitude);
        for p in self.points.iter().skip(1) {
            x = AxisRange::new(x.min.min(p.longitude), x.max.max(p.longitude));
            y = AxisRange::new(y.min.min(p.latitude), y.max.max(p.latitude));
        }
        Some(ViewBounds { x, y })
    }
}

/// Visible interval of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[center - half_range, center + half_range]`
    pub fn centered(center: f64, half_range: f64) -> Self {
        Self::new(center - half_range, center + half_range)
    }

    /// Widens `[min, max]` by `half_range` on both sides.
    pub fn around(min: f64, max: f64, half_range: f64) -> Self {
        Self::new(min - half_range, max + half_range)
    }

    /// Inclusive containment.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// The visible rectangle of the path view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    /// Longitude
    pub x: AxisRange,

    /// Latitude
    pub y: AxisRange,
}

impl ViewBounds {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.x.contains(point.longitude) && self.y.contains(point.latitude)
    }
}

/// Tracer settings.
#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Trailing window length
    pub max_points: usize,

    /// Full longitude range; half of it is the rescale margin
    pub lon_range: f64,

    /// Full latitude range; half of it is the rescale margin
    pub lat_range: f64,

    /// Center of the initial view (unset view when `None`)
    pub initial_center: Option<GeoPoint>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            lon_range: DEFAULT_LON_RANGE,
            lat_range: DEFAULT_LAT_RANGE,
            initial_center: None,
        }
    }
}

/// Result of appending one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceUpdate {
    /// The appended point
    pub point: GeoPoint,

    /// Point dropped from the front of the window
    pub evicted: Option<GeoPoint>,

    /// Whether the view bounds were recomputed
    pub rescaled: bool,
}

/// Path buffer plus the current view.
#[derive(Debug, Clone)]
pub struct PathTracer {
    buffer: PathBuffer,
    bounds: Option<ViewBounds>,
    lon_half_range: f64,
    lat_half_range: f64,
    rescale_count: u64,
}

impl PathTracer {
    pub fn new(config: TracerConfig) -> Self {
        let lon_half_range = config.lon_range / 2.0;
        let lat_half_range = config.lat_range / 2.0;
        let bounds = config.initial_center.map(|c| ViewBounds {
            x: AxisRange::centered(c.longitude, lon_half_range),
            y: AxisRange::centered(c.latitude, lat_half_range),
        });

        Self {
            buffer: PathBuffer::new(config.max_points),
            bounds,
            lon_half_range,
            lat_half_range,
            rescale_count: 0,
        }
    }

    /// Appends `point` and rescales the view if the point is out of sight.
    pub fn push(&mut self, point: GeoPoint) -> TraceUpdate {
        let evicted = self.buffer.push(point);

        let visible = self.bounds.map_or(false, |b| b.contains(&point));
        if !visible {
            self.rescale();
        }

        TraceUpdate {
            point,
            evicted,
            rescaled: !visible,
        }
    }

    /// Parses a 6-field line and appends its point.
    ///
    /// On error the buffer and bounds are left untouched.
    pub fn update_from_line(&mut self, line: &str) -> Result<TraceUpdate, SampleError> {
        let sample = PositionSample::parse_line(line)?;
        Ok(self.push(sample.point()))
    }

    fn rescale(&mut self) {
        if let Some(extent) = self.buffer.extent() {
            self.bounds = Some(ViewBounds {
                x: AxisRange::around(extent.x.min, extent.x.max, self.lon_half_range),
                y: AxisRange::around(extent.y.min, extent.y.max, self.lat_half_range),
            });
            self.rescale_count += 1;
        }
    }

    pub fn buffer(&self) -> &PathBuffer {
        &self.buffer
    }

    /// Current view, `None` until the first point when no initial center is set.
    pub fn bounds(&self) -> Option<ViewBounds> {
        self.bounds
    }

    pub fn rescale_count(&self) -> u64 {
        self.rescale_count
    }
}

impl Default for PathTracer {
    fn default() -> Self {
        Self::new(TracerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_buffer_keeps_most_recent() {
        let mut buffer = PathBuffer::new(7);
        for i in 0..10 {
            buffer.push(GeoPoint::new(i as f64, -(i as f64)));
        }

        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.longitudes(), vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(buffer.latitudes(), vec![-3.0, -4.0, -5.0, -6.0, -7.0, -8.0, -9.0]);
    }

    #[test]
    fn test_buffer_reports_evictions() {
        let mut buffer = PathBuffer::new(2);
        assert_eq!(buffer.push(GeoPoint::new(1.0, 1.0)), None);
        assert_eq!(buffer.push(GeoPoint::new(2.0, 2.0)), None);
        assert_eq!(buffer.push(GeoPoint::new(3.0, 3.0)), Some(GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut buffer = PathBuffer::new(0);
        buffer.push(GeoPoint::new(1.0, 1.0));
        buffer.push(GeoPoint::new(2.0, 2.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.last(), Some(&GeoPoint::new(2.0, 2.0)));
    }

    #[test]
    fn test_first_line_sets_bounds_with_margin() {
        let mut tracer = PathTracer::default();
        let update = tracer.update_from_line("0,0,0,13.5,121.0,0").unwrap();

        assert!(update.rescaled);
        assert_eq!(tracer.buffer().iter().copied().collect::<Vec<_>>(), vec![GeoPoint::new(121.0, 13.5)]);

        let bounds = tracer.bounds().unwrap();
        assert!(bounds.contains(&GeoPoint::new(121.0, 13.5)));
        assert_relative_eq!(bounds.x.min, 120.95, epsilon = 1e-9);
        assert_relative_eq!(bounds.x.max, 121.05, epsilon = 1e-9);
        assert_relative_eq!(bounds.y.min, 13.45, epsilon = 1e-9);
        assert_relative_eq!(bounds.y.max, 13.55, epsilon = 1e-9);
    }

    #[test]
    fn test_point_inside_view_does_not_rescale() {
        let mut tracer = PathTracer::default();
        tracer.push(GeoPoint::new(121.0, 13.5));
        let before = tracer.bounds();

        let update = tracer.push(GeoPoint::new(121.01, 13.52));
        assert!(!update.rescaled);
        assert_eq!(tracer.bounds(), before);
        assert_eq!(tracer.rescale_count(), 1);
    }

    #[test]
    fn test_point_outside_view_recomputes_from_buffer() {
        let mut tracer = PathTracer::default();
        tracer.push(GeoPoint::new(121.0, 13.5));
        let update = tracer.push(GeoPoint::new(121.2, 13.5));
        assert!(update.rescaled);

        let bounds = tracer.bounds().unwrap();
        assert_relative_eq!(bounds.x.min, 120.95, epsilon = 1e-9);
        assert_relative_eq!(bounds.x.max, 121.25, epsilon = 1e-9);
        assert_relative_eq!(bounds.y.min, 13.45, epsilon = 1e-9);
        assert_relative_eq!(bounds.y.max, 13.55, epsilon = 1e-9);
        for p in tracer.buffer().iter() {
            assert!(bounds.contains(p));
        }
    }

    #[test]
    fn test_boundary_point_counts_as_visible() {
        let mut tracer = PathTracer::new(TracerConfig {
            initial_center: Some(GeoPoint::new(0.0, 0.0)),
            lon_range: 2.0,
            lat_range: 2.0,
            ..Default::default()
        });
        let update = tracer.push(GeoPoint::new(1.0, -1.0));
        assert!(!update.rescaled);
        assert_eq!(tracer.bounds().unwrap().x, AxisRange::new(-1.0, 1.0));
    }

    #[test]
    fn test_initial_center_view() {
        let tracer = PathTracer::new(TracerConfig {
            initial_center: Some(GeoPoint::new(120.0004, 14.0)),
            ..Default::default()
        });
        let bounds = tracer.bounds().unwrap();
        assert_relative_eq!(bounds.x.span(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(bounds.y.min, 13.95, epsilon = 1e-9);
        assert!(tracer.buffer().is_empty());
    }

    #[test]
    fn test_malformed_line_leaves_state() {
        let mut tracer = PathTracer::default();
        tracer.push(GeoPoint::new(121.0, 13.5));
        let bounds = tracer.bounds();

        assert!(tracer.update_from_line("0,0,0,13.5,oops,0").is_err());
        assert!(tracer.update_from_line("13.5,121.0").is_err());

        assert_eq!(tracer.buffer().len(), 1);
        assert_eq!(tracer.bounds(), bounds);
    }

    #[test]
    fn test_eight_reads_cap_at_seven() {
        let mut tracer = PathTracer::default();
        for i in 0..8 {
            let line = format!("0,0,0,{},{},0", 13.5 + i as f64 * 0.001, 121.0 + i as f64 * 0.001);
            tracer.update_from_line(&line).unwrap();
            assert!(tracer.buffer().len() <= 7);
        }
        assert_eq!(tracer.buffer().len(), 7);
        assert_relative_eq!(tracer.buffer().iter().next().unwrap().longitude, 121.001, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_buffer_never_exceeds_capacity(
            capacity in 1usize..20,
            lons in proptest::collection::vec(-180.0f64..180.0, 0..50),
        ) {
            let mut buffer = PathBuffer::new(capacity);
            for (i, lon) in lons.iter().enumerate() {
                buffer.push(GeoPoint::new(*lon, i as f64));
                prop_assert!(buffer.len() <= capacity);
            }
            let start = lons.len().saturating_sub(capacity);
            prop_assert_eq!(buffer.longitudes(), lons[start..].to_vec());
        }

        #[test]
        fn prop_bounds_cover_buffer_after_rescale(
            points in proptest::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..30),
        ) {
            let mut tracer = PathTracer::default();
            for (lon, lat) in points {
                let update = tracer.push(GeoPoint::new(lon, lat));
                let bounds = tracer.bounds().unwrap();
                prop_assert!(bounds.contains(&update.point));
                if update.rescaled {
                    for p in tracer.buffer().iter() {
                        prop_assert!(bounds.contains(p));
                    }
                }
            }
        }
    }
}
