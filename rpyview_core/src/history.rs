//! Rolling window of recent attitude samples for time-series plots.

use crate::sample::OrientationSample;
use std::collections::VecDeque;

/// Default number of samples kept for the attitude plot.
pub const DEFAULT_HISTORY_LEN: usize = 100;

/// Attitude axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

impl Axis {
    pub fn all() -> [Axis; 3] {
        [Axis::Roll, Axis::Pitch, Axis::Yaw]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Roll => "roll",
            Axis::Pitch => "pitch",
            Axis::Yaw => "yaw",
        }
    }

    fn pick(&self, sample: &OrientationSample) -> f64 {
        match self {
            Axis::Roll => sample.roll,
            Axis::Pitch => sample.pitch,
            Axis::Yaw => sample.yaw,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timestamped attitude samples, oldest erased first.
#[derive(Debug, Clone)]
pub struct AttitudeHistory {
    samples: VecDeque<(f64, OrientationSample)>,
    capacity: usize,
}

impl AttitudeHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Records `sample` at `time_secs` elapsed seconds.
    pub fn record(&mut self, time_secs: f64, sample: OrientationSample) {
        self.samples.push_back((time_secs, sample));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `[time, angle]` pairs for one axis, oldest first.
    pub fn series(&self, axis: Axis) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|(t, s)| [*t, axis.pick(s)])
            .collect()
    }

    pub fn latest(&self) -> Option<&(f64, OrientationSample)> {
        self.samples.back()
    }
}

impl Default for AttitudeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
