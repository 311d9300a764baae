//! Calibrated reference pose

use crate::geometry::{average_depth, head_tilt_delta, triangle_ratio};
use crate::Triangle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Baseline triangle the live posture is compared against.
///
/// The ratio is always derived from the stored landmarks, never supplied by
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredReference")]
pub struct ReferencePose {
    triangle: Triangle,
    ratio: f64,
    captured_at: DateTime<Utc>,
}

/// Loaded form; a stored `ratio` is ignored and re-derived
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReference {
    triangle: Triangle,
    captured_at: DateTime<Utc>,
}

impl From<StoredReference> for ReferencePose {
    fn from(stored: StoredReference) -> Self {
        ReferencePose::new(stored.triangle, stored.captured_at)
    }
}

impl ReferencePose {
    /// Build a reference from an (already averaged) triangle
    pub fn new(triangle: Triangle, captured_at: DateTime<Utc>) -> Self {
        let ratio = triangle_ratio(&triangle.nose, &triangle.left_shoulder, &triangle.right_shoulder);
        Self {
            triangle,
            ratio,
            captured_at,
        }
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Shoulder-triangle ratio of the baseline
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Baseline nose height above the shoulder midpoint
    pub fn head_tilt_delta(&self) -> f64 {
        let t = &self.triangle;
        head_tilt_delta(&t.nose, &t.left_shoulder, &t.right_shoulder)
    }

    /// Baseline mean depth, if the capture had depth data
    pub fn average_depth(&self) -> Option<f64> {
        average_depth(&self.triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Landmark;

    #[test]
    fn test_ratio_derived_from_triangle() {
        let triangle = Triangle::new(
            Landmark::new(0.5, 0.2),
            Landmark::new(0.3, 0.6),
            Landmark::new(0.7, 0.6),
        );
        let reference = ReferencePose::new(triangle, Utc::now());
        // width 0.4 / neck 0.4
        assert!((reference.ratio() - 1.0).abs() < 1e-9);
        assert!((reference.head_tilt_delta() - 0.4).abs() < 1e-9);
        assert_eq!(reference.average_depth(), None);
    }

    #[test]
    fn test_serde_round_trip_keeps_timestamp() {
        let triangle = Triangle::new(
            Landmark::with_depth(0.5, 0.2, -0.3),
            Landmark::with_depth(0.3, 0.6, -0.1),
            Landmark::with_depth(0.7, 0.6, -0.1),
        );
        let reference = ReferencePose::new(triangle, Utc::now());
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("capturedAt"));
        let back: ReferencePose = serde_json::from_str(&json).unwrap();
        assert_eq!(back.captured_at(), reference.captured_at());
        assert!((back.ratio() - reference.ratio()).abs() < 1e-12);
    }

    #[test]
    fn test_loaded_ratio_is_rederived() {
        let reference = ReferencePose::new(
            Triangle::new(
                Landmark::new(0.5, 0.2),
                Landmark::new(0.3, 0.6),
                Landmark::new(0.7, 0.6),
            ),
            Utc::now(),
        );
        let mut value = serde_json::to_value(&reference).unwrap();
        value["ratio"] = serde_json::json!(42.0);

        let loaded: ReferencePose = serde_json::from_value(value).unwrap();
        assert!((loaded.ratio() - 1.0).abs() < 1e-9);
        assert_eq!(loaded.captured_at(), reference.captured_at());
    }

    #[test]
    fn test_load_without_ratio() {
        let json = r#"{
            "triangle": {
                "nose": {"x": 0.5, "y": 0.2},
                "left_shoulder": {"x": 0.3, "y": 0.6},
                "right_shoulder": {"x": 0.7, "y": 0.6}
            },
            "capturedAt": "2026-01-05T09:30:00Z"
        }"#;
        let loaded: ReferencePose = serde_json::from_str(json).unwrap();
        assert!((loaded.ratio() - 1.0).abs() < 1e-9);
    }
}
