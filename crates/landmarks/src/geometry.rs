//! Shoulder-triangle and face-region geometry
//!
//! Pure functions over normalized landmarks. None of them fail: degenerate
//! input maps to a neutral value (`0.0` or `None`) the caller can branch on.

use crate::{Landmark, Triangle};
use serde::{Deserialize, Serialize};

/// Shoulder width divided by the shoulder-midpoint-to-nose distance.
///
/// Scaling all three points about any center leaves the ratio unchanged, so
/// it is stable as the user moves toward or away from the camera. Returns
/// `0.0` when the nose sits exactly on the shoulder midpoint.
pub fn triangle_ratio(nose: &Landmark, left_shoulder: &Landmark, right_shoulder: &Landmark) -> f64 {
    let shoulder_width = left_shoulder.distance(right_shoulder);
    let neck_length = left_shoulder.midpoint(right_shoulder).distance(nose);

    if neck_length == 0.0 {
        return 0.0;
    }
    shoulder_width / neck_length
}

/// Vertical offset of the nose above the shoulder midpoint (`mid.y - nose.y`).
///
/// Only a confidence signal: a dropped head also shrinks this value.
pub fn head_tilt_delta(nose: &Landmark, left_shoulder: &Landmark, right_shoulder: &Landmark) -> f64 {
    left_shoulder.midpoint(right_shoulder).y - nose.y
}

/// Mean depth of the triangle, `None` unless all three vertices carry `z`
pub fn average_depth(triangle: &Triangle) -> Option<f64> {
    let [a, b, c] = triangle.vertices();
    Some((a.z? + b.z? + c.z?) / 3.0)
}

/// Mean depth over the landmarks that carry `z`, `None` if none do
pub fn mean_depth(points: &[Landmark]) -> Option<f64> {
    let (sum, count) = points
        .iter()
        .filter_map(|p| p.z)
        .fold((0.0, 0usize), |(sum, count), z| (sum + z, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Axis-aligned bounding rectangle of a landmark set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl FaceRect {
    /// Bounding rectangle of all points, `None` for an empty set
    pub fn from_landmarks(points: &[Landmark]) -> Option<Self> {
        let first = points.first()?;
        let seed = FaceRect {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        Some(points.iter().skip(1).fold(seed, |rect, p| FaceRect {
            min_x: rect.min_x.min(p.x),
            min_y: rect.min_y.min(p.y),
            max_x: rect.max_x.max(p.x),
            max_y: rect.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Normalization scale: the larger of width and height
    pub fn size(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Distance from a point to the rectangle, `0.0` inside or on the edge
    pub fn distance_to(&self, point: &Landmark) -> f64 {
        let dx = (self.min_x - point.x).max(0.0).max(point.x - self.max_x);
        let dy = (self.min_y - point.y).max(0.0).max(point.y - self.max_y);
        dx.hypot(dy)
    }

    /// Smallest distance from any of the points, `None` for an empty set
    pub fn min_distance(&self, points: &[Landmark]) -> Option<f64> {
        points
            .iter()
            .map(|p| self.distance_to(p))
            .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn upright() -> Triangle {
        Triangle::new(
            Landmark::new(0.5, 0.3),
            Landmark::new(0.35, 0.6),
            Landmark::new(0.65, 0.6),
        )
    }

    #[test]
    fn test_ratio_known_triangle() {
        let t = upright();
        // width 0.3, neck 0.3
        let ratio = triangle_ratio(&t.nose, &t.left_shoulder, &t.right_shoulder);
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_degenerate_is_zero() {
        let nose = Landmark::new(0.5, 0.6);
        let ratio = triangle_ratio(&nose, &Landmark::new(0.35, 0.6), &Landmark::new(0.65, 0.6));
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_head_tilt_delta() {
        let t = upright();
        let delta = head_tilt_delta(&t.nose, &t.left_shoulder, &t.right_shoulder);
        assert!((delta - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_average_depth_needs_all_three() {
        let mut t = upright();
        assert_eq!(average_depth(&t), None);

        t.nose.z = Some(-0.3);
        t.left_shoulder.z = Some(-0.1);
        assert_eq!(average_depth(&t), None);

        t.right_shoulder.z = Some(-0.2);
        assert!((average_depth(&t).unwrap() + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_average_depth_zero_is_not_missing() {
        let t = Triangle::new(
            Landmark::with_depth(0.5, 0.3, 0.0),
            Landmark::with_depth(0.3, 0.6, 0.0),
            Landmark::with_depth(0.7, 0.6, 0.0),
        );
        assert_eq!(average_depth(&t), Some(0.0));
    }

    #[test]
    fn test_mean_depth_skips_missing() {
        let points = [
            Landmark::with_depth(0.0, 0.0, -0.2),
            Landmark::new(0.0, 0.0),
            Landmark::with_depth(0.0, 0.0, -0.4),
        ];
        assert!((mean_depth(&points).unwrap() + 0.3).abs() < 1e-12);
        assert_eq!(mean_depth(&[Landmark::new(0.1, 0.1)]), None);
        assert_eq!(mean_depth(&[]), None);
    }

    #[test]
    fn test_face_rect_bounds_and_size() {
        let rect = FaceRect::from_landmarks(&[
            Landmark::new(0.4, 0.2),
            Landmark::new(0.6, 0.25),
            Landmark::new(0.5, 0.45),
        ])
        .unwrap();
        assert!((rect.width() - 0.2).abs() < 1e-12);
        assert!((rect.height() - 0.25).abs() < 1e-12);
        assert!((rect.size() - 0.25).abs() < 1e-12);
        assert!(FaceRect::from_landmarks(&[]).is_none());
    }

    #[test]
    fn test_distance_to_rect() {
        let rect = FaceRect {
            min_x: 0.4,
            min_y: 0.2,
            max_x: 0.6,
            max_y: 0.4,
        };
        // Inside
        assert_eq!(rect.distance_to(&Landmark::new(0.5, 0.3)), 0.0);
        // Straight left of the left edge
        assert!((rect.distance_to(&Landmark::new(0.3, 0.3)) - 0.1).abs() < 1e-12);
        // Diagonal from the bottom-right corner
        let d = rect.distance_to(&Landmark::new(0.63, 0.44));
        assert!((d - 0.05).abs() < 1e-9);

        let nearest = rect
            .min_distance(&[Landmark::new(0.9, 0.3), Landmark::new(0.65, 0.3)])
            .unwrap();
        assert!((nearest - 0.05).abs() < 1e-9);
        assert_eq!(rect.min_distance(&[]), None);
    }

    fn scale_about(p: &Landmark, cx: f64, cy: f64, k: f64) -> Landmark {
        Landmark::new(cx + k * (p.x - cx), cy + k * (p.y - cy))
    }

    proptest! {
        #[test]
        fn ratio_is_scale_invariant(
            nx in 0.0f64..1.0, ny in 0.0f64..1.0,
            lx in 0.0f64..1.0, ly in 0.0f64..1.0,
            rx in 0.0f64..1.0, ry in 0.0f64..1.0,
            cx in 0.0f64..1.0, cy in 0.0f64..1.0,
            k in 0.2f64..5.0,
        ) {
            let nose = Landmark::new(nx, ny);
            let left = Landmark::new(lx, ly);
            let right = Landmark::new(rx, ry);
            prop_assume!(left.midpoint(&right).distance(&nose) > 0.05);

            let before = triangle_ratio(&nose, &left, &right);
            let after = triangle_ratio(
                &scale_about(&nose, cx, cy, k),
                &scale_about(&left, cx, cy, k),
                &scale_about(&right, cx, cy, k),
            );
            prop_assert!((before - after).abs() <= 1e-6 * before.max(1.0));
        }

        #[test]
        fn degenerate_ratio_is_exactly_zero(
            lx in 0.0f64..1.0, ly in 0.0f64..1.0,
            rx in 0.0f64..1.0, ry in 0.0f64..1.0,
        ) {
            let left = Landmark::new(lx, ly);
            let right = Landmark::new(rx, ry);
            let nose = left.midpoint(&right);
            let ratio = triangle_ratio(&nose, &left, &right);
            prop_assert_eq!(ratio, 0.0);
        }
    }
}
