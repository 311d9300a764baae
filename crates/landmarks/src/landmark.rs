//! Landmark and triangle types

use serde::{Deserialize, Serialize};

/// Normalized keypoint in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0-1, fraction of frame width)
    pub x: f64,
    /// Vertical position (0-1, fraction of frame height)
    pub y: f64,
    /// Relative depth, more negative is closer to the camera
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    /// Create a landmark without depth
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Create a landmark with depth
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance in the image plane (depth ignored)
    pub fn distance(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint in the image plane; depth is averaged only when both sides have it
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: match (self.z, other.z) {
                (Some(a), Some(b)) => Some((a + b) / 2.0),
                _ => None,
            },
        }
    }
}

/// Pose landmark indices used by the posture proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseIndex {
    Nose = 0,
    LeftShoulder = 11,
    RightShoulder = 12,
}

impl PoseIndex {
    /// Index into the pose landmark array
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Nose + left shoulder + right shoulder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub nose: Landmark,
    pub left_shoulder: Landmark,
    pub right_shoulder: Landmark,
}

impl Triangle {
    pub fn new(nose: Landmark, left_shoulder: Landmark, right_shoulder: Landmark) -> Self {
        Self {
            nose,
            left_shoulder,
            right_shoulder,
        }
    }

    /// Extract the triangle from a pose landmark array.
    ///
    /// Returns `None` when any of the three indices is missing.
    pub fn from_pose(pose: &[Landmark]) -> Option<Self> {
        Some(Self {
            nose: *pose.get(PoseIndex::Nose.index())?,
            left_shoulder: *pose.get(PoseIndex::LeftShoulder.index())?,
            right_shoulder: *pose.get(PoseIndex::RightShoulder.index())?,
        })
    }

    /// Iterate the three vertices in nose, left, right order
    pub fn vertices(&self) -> [Landmark; 3] {
        [self.nose, self.left_shoulder, self.right_shoulder]
    }
}
