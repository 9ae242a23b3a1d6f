//! Point-level helpers: nearest segment point and tangent/normal offsets.
use crate::error::GeometryError;
use crate::types::SegmentPoints;
use nalgebra::{distance, Point3, Vector2};

const EPS: f32 = 1e-6;

/// Index of the segment point closest to `point` in 3D.
///
/// Linear scan; ties keep the earliest index. `None` only for an empty segment.
pub fn closest_point_index(point: &Point3<f32>, segment: &SegmentPoints) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in segment.points.iter().enumerate() {
        let d = distance(point, p);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

#[inline]
pub fn distance2d(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Unit vector from `from` to `to`.
pub fn unit_direction(from: [f32; 2], to: [f32; 2]) -> Result<Vector2<f32>, GeometryError> {
    let v = Vector2::new(to[0] - from[0], to[1] - from[1]);
    let n = v.norm();
    if !n.is_finite() || n < EPS {
        return Err(GeometryError::ZeroLengthDirection);
    }
    Ok(v / n)
}

/// Offset of magnitude `length` along the direction `prev → next`, as `(dy, dx)`.
pub fn direction_offset(
    prev: [f32; 2],
    next: [f32; 2],
    length: f32,
) -> Result<(f32, f32), GeometryError> {
    unit_direction(prev, next)?;
    let angle = (next[1] - prev[1]).atan2(next[0] - prev[0]);
    Ok((angle.sin() * length, angle.cos() * length))
}

/// Offset of magnitude `length` perpendicular to `prev → next`, as `(dy, dx)`.
///
/// The direction angle is rotated by +90° (x axis towards y axis). With image
/// y pointing down this lands on the walker's right as seen on screen: a
/// left-to-right segment gets `dy = +length`, below the line. The "left"
/// naming used by the ROI code refers to this rotated side.
pub fn tangent_offset(
    prev: [f32; 2],
    next: [f32; 2],
    length: f32,
) -> Result<(f32, f32), GeometryError> {
    unit_direction(prev, next)?;
    let angle = (next[1] - prev[1]).atan2(next[0] - prev[0]) + std::f32::consts::FRAC_PI_2;
    Ok((angle.sin() * length, angle.cos() * length))
}

/// Left/right points at distance `length` perpendicular to the segment at `index`.
///
/// Left is `center + tangent_offset`, i.e. below a left-to-right segment on screen.
///
/// Uses the neighbours `index - 1` and `index + 1`, falling back to one-sided
/// differences at the segment ends.
pub fn radius_points(
    segment: &SegmentPoints,
    index: usize,
    length: f32,
) -> Result<([f32; 2], [f32; 2]), GeometryError> {
    let center = segment.xy(index).ok_or(GeometryError::EmptySegment)?;
    let prev = segment.xy(index.saturating_sub(1)).unwrap_or(center);
    let next = segment.xy(index + 1).unwrap_or(center);
    let (dy, dx) = tangent_offset(prev, next, length)?;
    let left = [center[0] + dx, center[1] + dy];
    let right = [center[0] - dx, center[1] - dy];
    Ok((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(n: usize, spacing: f32) -> SegmentPoints {
        let xyz: Vec<_> = (0..n).map(|i| (i as f32 * spacing, 0.0, 0.0)).collect();
        SegmentPoints::from_xyz(1, &xyz)
    }

    #[test]
    fn closest_index_prefers_first_on_tie() {
        let seg = horizontal(10, 10.0);
        let idx = closest_point_index(&Point3::new(45.0, 5.0, 0.0), &seg);
        assert_eq!(idx, Some(4));
    }

    #[test]
    fn closest_index_stays_in_range() {
        let seg = horizontal(5, 3.0);
        for p in [
            Point3::new(-100.0, 0.0, 0.0),
            Point3::new(100.0, 4.0, 2.0),
            Point3::new(6.1, -1.0, 0.0),
        ] {
            let idx = closest_point_index(&p, &seg).unwrap();
            assert!(idx < seg.len());
        }
        assert_eq!(
            closest_point_index(&Point3::new(100.0, 0.0, 0.0), &seg),
            Some(4)
        );
    }

    #[test]
    fn closest_index_empty_segment() {
        let seg = SegmentPoints::new(0, Vec::new());
        assert_eq!(closest_point_index(&Point3::origin(), &seg), None);
    }

    #[test]
    fn tangent_offset_is_perpendicular() {
        let (dy, dx) = tangent_offset([0.0, 0.0], [10.0, 0.0], 2.0).unwrap();
        assert!(dx.abs() < 1e-5);
        assert!((dy - 2.0).abs() < 1e-5);

        let (dy, dx) = direction_offset([0.0, 0.0], [10.0, 0.0], 2.0).unwrap();
        assert!((dx - 2.0).abs() < 1e-5);
        assert!(dy.abs() < 1e-5);
    }

    #[test]
    fn coincident_points_have_no_direction() {
        assert_eq!(
            tangent_offset([1.0, 1.0], [1.0, 1.0], 3.0),
            Err(GeometryError::ZeroLengthDirection)
        );
    }

    #[test]
    fn radius_points_use_one_sided_ends() {
        let seg = horizontal(3, 5.0);
        let (left, right) = radius_points(&seg, 0, 2.0).unwrap();
        assert!((left[1] - 2.0).abs() < 1e-5);
        assert!((right[1] + 2.0).abs() < 1e-5);
        let single = horizontal(1, 1.0);
        assert!(radius_points(&single, 0, 2.0).is_err());
    }

    #[test]
    fn left_point_lies_below_left_to_right_tracing_on_screen() {
        let seg = horizontal(5, 1.0);
        let (left, right) = radius_points(&seg, 2, 3.0).unwrap();
        assert!(left[1] > 0.0, "left {left:?} should have larger y");
        assert!(right[1] < 0.0);

        // reversing the tracing swaps the sides
        let reversed = SegmentPoints::from_xyz(1, &[(4.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 0.0, 0.0)]);
        let (left, _) = radius_points(&reversed, 1, 3.0).unwrap();
        assert!(left[1] < 0.0);
    }
}
