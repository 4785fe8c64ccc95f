//! Parsing of the comma-separated data line.
//!
//! The data file holds a single line of ASCII floats. Two layouts exist:
//!
//! - **Orientation** (3 fields): `pitch,roll,yaw` in radians
//! - **Position** (6 fields): `pitch,roll,yaw,latitude,longitude,height`

use crate::error::SampleError;
use crate::path::GeoPoint;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Field count of an orientation line.
pub const ORIENTATION_FIELDS: usize = 3;

/// Field count of a position line.
pub const POSITION_FIELDS: usize = 6;

/// Index of the latitude field in a position line.
pub const LATITUDE_INDEX: usize = 3;

/// Index of the longitude field in a position line.
pub const LONGITUDE_INDEX: usize = 4;

/// Splits `line` on commas and parses exactly `expected` finite floats.
///
/// Surrounding whitespace on the line and on each field is ignored.
pub fn parse_fields(line: &str, expected: usize) -> Result<Vec<f64>, SampleError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != expected {
        return Err(SampleError::field_count(expected, fields.len()));
    }

    fields
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.trim();
            let value = raw.parse::<f64>().map_err(|source| SampleError::InvalidNumber {
                index,
                value: raw.to_string(),
                source,
            })?;
            if !value.is_finite() {
                return Err(SampleError::NonFinite { index, value });
            }
            Ok(value)
        })
        .collect()
}

/// Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Rotation about X
    pub roll: f64,

    /// Rotation about Y
    pub pitch: f64,

    /// Rotation about Z
    pub yaw: f64,
}

impl OrientationSample {
    /// Creates a sample from roll, pitch and yaw.
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Parses a 3-field line. Fields are read in `pitch,roll,yaw` order.
    pub fn parse_line(line: &str) -> Result<Self, SampleError> {
        let values = parse_fields(line, ORIENTATION_FIELDS)?;
        Ok(Self::from_pitch_roll_yaw(&values))
    }

    fn from_pitch_roll_yaw(values: &[f64]) -> Self {
        Self {
            pitch: values[0],
            roll: values[1],
            yaw: values[2],
        }
    }
}

impl FromStr for OrientationSample {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

/// A full navigation line: attitude, geodetic position and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Rotation about Y (field 0)
    pub pitch: f64,

    /// Rotation about X (field 1)
    pub roll: f64,

    /// Rotation about Z (field 2)
    pub yaw: f64,

    /// Latitude in degrees (field 3)
    pub latitude: f64,

    /// Longitude in degrees (field 4)
    pub longitude: f64,

    /// Height in meters (field 5)
    pub height: f64,
}

impl PositionSample {
    /// Parses a 6-field line.
    pub fn parse_line(line: &str) -> Result<Self, SampleError> {
        let v = parse_fields(line, POSITION_FIELDS)?;
        Ok(Self {
            pitch: v[0],
            roll: v[1],
            yaw: v[2],
            latitude: v[LATITUDE_INDEX],
            longitude: v[LONGITUDE_INDEX],
            height: v[5],
        })
    }

    /// Returns the trace point (longitude on x, latitude on y).
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Returns the attitude carried in the first three fields.
    pub fn attitude(&self) -> OrientationSample {
        OrientationSample::new(self.roll, self.pitch, self.yaw)
    }
}

impl FromStr for PositionSample {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}
