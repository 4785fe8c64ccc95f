//! Cube rotation driven by roll/pitch/yaw.
//!
//! The rotation is composed as `R = Rz(yaw) · Ry(pitch) · Rx(roll)` and applied
//! to every vertex as `v' = R v` (row vectors times `Rᵀ`). Changing the order
//! changes the rendered attitude.

use crate::error::SampleError;
use crate::sample::OrientationSample;
use nalgebra::{Matrix3, Vector3};

/// Fixed axis limit of the cube view (all three axes span `[-2, 2]`).
pub const ORIENTATION_AXIS_LIMIT: f64 = 2.0;

/// Vertices of the canonical ±1 cube.
pub const CUBE_VERTICES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Vertex index pairs of the 12 cube edges.
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Rotation about X by `roll` radians.
pub fn roll_matrix(roll: f64) -> Matrix3<f64> {
    let (s, c) = roll.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, c, -s,
        0.0, s, c,
    )
}

/// Rotation about Y by `pitch` radians.
pub fn pitch_matrix(pitch: f64) -> Matrix3<f64> {
    let (s, c) = pitch.sin_cos();
    Matrix3::new(
        c, 0.0, s,
        0.0, 1.0, 0.0,
        -s, 0.0, c,
    )
}

/// Rotation about Z by `yaw` radians.
pub fn yaw_matrix(yaw: f64) -> Matrix3<f64> {
    let (s, c) = yaw.sin_cos();
    Matrix3::new(
        c, -s, 0.0,
        s, c, 0.0,
        0.0, 0.0, 1.0,
    )
}

/// Composes `Rz · Ry · Rx` for the sample.
pub fn rotation_matrix(sample: &OrientationSample) -> Matrix3<f64> {
    yaw_matrix(sample.yaw) * (pitch_matrix(sample.pitch) * roll_matrix(sample.roll))
}

/// Applies `rotation` to every vertex.
pub fn rotate_vertices(vertices: &[Vector3<f64>], rotation: &Matrix3<f64>) -> Vec<Vector3<f64>> {
    vertices.iter().map(|v| rotation * v).collect()
}

/// Immutable cube geometry.
#[derive(Debug, Clone)]
pub struct CubeModel {
    vertices: Vec<Vector3<f64>>,
    edges: Vec<(usize, usize)>,
}

impl CubeModel {
    /// The canonical ±1 cube with its 12 edges.
    pub fn unit() -> Self {
        Self {
            vertices: CUBE_VERTICES
                .iter()
                .map(|v| Vector3::new(v[0], v[1], v[2]))
                .collect(),
            edges: CUBE_EDGES.to_vec(),
        }
    }

    /// Vertices in `CUBE_VERTICES` order.
    pub fn vertices(&self) -> &[Vector3<f64>] {
        &self.vertices
    }

    /// Vertex index pairs, one per edge.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

impl Default for CubeModel {
    fn default() -> Self {
        Self::unit()
    }
}

/// One drawn cube edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
}

impl EdgeSegment {
    /// The (x, y) projection of the segment endpoints.
    pub fn projected(&self) -> [[f64; 2]; 2] {
        [[self.start.x, self.start.y], [self.end.x, self.end.y]]
    }

    /// Endpoints as `[x, y, z]` arrays.
    pub fn endpoints(&self) -> [[f64; 3]; 2] {
        [
            [self.start.x, self.start.y, self.start.z],
            [self.end.x, self.end.y, self.end.z],
        ]
    }
}

/// A rotated cube, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeFrame {
    /// The attitude this frame was built from
    pub sample: OrientationSample,

    /// Rotated vertices, same order as the model
    pub vertices: Vec<Vector3<f64>>,

    segments: Vec<EdgeSegment>,
}

impl CubeFrame {
    /// Rotates `model` by `sample`.
    pub fn build(model: &CubeModel, sample: OrientationSample) -> Self {
        let rotation = rotation_matrix(&sample);
        let vertices = rotate_vertices(model.vertices(), &rotation);
        let segments = model
            .edges()
            .iter()
            .map(|&(a, b)| EdgeSegment {
                start: vertices[a],
                end: vertices[b],
            })
            .collect();

        Self {
            sample,
            vertices,
            segments,
        }
    }

    /// Edge segments in model edge order.
    pub fn segments(&self) -> &[EdgeSegment] {
        &self.segments
    }
}

/// Keeps the last successfully drawn cube frame.
///
/// A failed update never touches the current frame, so the previous drawing
/// stays on screen until the next good sample arrives.
#[derive(Debug, Clone, Default)]
pub struct CubeAnimator {
    model: CubeModel,
    current: Option<CubeFrame>,
    frames_drawn: u64,
}

impl CubeAnimator {
    /// Creates an animator with nothing drawn yet.
    pub fn new(model: CubeModel) -> Self {
        Self {
            model,
            current: None,
            frames_drawn: 0,
        }
    }

    /// Rotates the model by `sample` and makes it the current frame.
    pub fn apply(&mut self, sample: OrientationSample) -> &CubeFrame {
        self.frames_drawn += 1;
        self.current.insert(CubeFrame::build(&self.model, sample))
    }

    /// Parses a 3-field line and applies it.
    pub fn update_from_line(&mut self, line: &str) -> Result<&CubeFrame, SampleError> {
        let sample = OrientationSample::parse_line(line)?;
        Ok(self.apply(sample))
    }

    /// The last drawn frame, if any.
    pub fn current(&self) -> Option<&CubeFrame> {
        self.current.as_ref()
    }

    /// Number of frames applied so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// The geometry being rotated.
    pub fn model(&self) -> &CubeModel {
        &self.model
    }
}
