//! Landmark averaging

use landmarks::{Landmark, Triangle};

fn average_landmark(points: impl Iterator<Item = Landmark>) -> Option<Landmark> {
    let mut count = 0usize;
    let mut with_depth = 0usize;
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);

    for p in points {
        count += 1;
        x += p.x;
        y += p.y;
        // Missing depth counts as zero
        if let Some(depth) = p.z {
            z += depth;
            with_depth += 1;
        }
    }

    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Landmark {
        x: x / n,
        y: y / n,
        z: (with_depth > 0).then(|| z / n),
    })
}

/// Average every vertex coordinate independently across the buffered triangles.
///
/// `z` stays `None` only when no frame carried depth for that vertex.
pub fn average_triangle(triangles: &[Triangle]) -> Option<Triangle> {
    Some(Triangle::new(
        average_landmark(triangles.iter().map(|t| t.nose))?,
        average_landmark(triangles.iter().map(|t| t.left_shoulder))?,
        average_landmark(triangles.iter().map(|t| t.right_shoulder))?,
    ))
}
