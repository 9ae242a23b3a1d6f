//! Polygon value type and the two ROI outlines built from segment geometry.
use super::points::{radius_points, unit_direction};
use crate::error::GeometryError;
use crate::types::SegmentPoints;
use serde::{Deserialize, Serialize};

/// Ordered `(x, y)` vertices; implicitly closed when rasterized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<[f32; 2]>,
}

impl Polygon {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the polygon moved by `(dx, dy)`.
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        Self {
            points: self.points.iter().map(|p| [p[0] + dx, p[1] + dy]).collect(),
        }
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        let init = (first[0], first[1], first[0], first[1]);
        Some(self.points.iter().fold(init, |(x0, y0, x1, y1), p| {
            (x0.min(p[0]), y0.min(p[1]), x1.max(p[0]), y1.max(p[1]))
        }))
    }

    /// Shoelace area (absolute value).
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0f32;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a[0] * b[1] - b[0] * a[1];
        }
        0.5 * acc.abs()
    }
}

/// Rectangle whose long axis runs from `line_point` towards `spine_point`.
///
/// The head end sits `extend_head` beyond the spine point and the tail end
/// `extend_tail` behind the line point; both long sides are `width` away from
/// the axis. Vertices are head-left, head-right, tail-right, tail-left, so the
/// first two vertices are always the head corners.
pub fn rectangle_polygon(
    spine_point: [f32; 2],
    line_point: [f32; 2],
    width: f32,
    extend_head: f32,
    extend_tail: f32,
) -> Result<Polygon, GeometryError> {
    let u = unit_direction(line_point, spine_point)?;
    let n = [-u.y * width, u.x * width];
    let head = [
        spine_point[0] + u.x * extend_head,
        spine_point[1] + u.y * extend_head,
    ];
    let tail = [
        line_point[0] - u.x * extend_tail,
        line_point[1] - u.y * extend_tail,
    ];
    Ok(Polygon::new(vec![
        [head[0] + n[0], head[1] + n[1]],
        [head[0] - n[0], head[1] - n[1]],
        [tail[0] - n[0], tail[1] - n[1]],
        [tail[0] + n[0], tail[1] + n[1]],
    ]))
}

/// Band of half-width `radius` around the segment, centred on `line_index`.
///
/// Only interior points (with both neighbours) inside
/// `[line_index - radius, line_index + radius]` contribute; the left offsets
/// in order followed by the right offsets reversed form the outline.
pub fn band_polygon(
    line_index: usize,
    radius: f32,
    segment: &SegmentPoints,
) -> Result<Polygon, GeometryError> {
    if segment.is_empty() {
        return Err(GeometryError::EmptySegment);
    }
    let span = radius.max(0.0).round() as usize;
    let first = line_index.saturating_sub(span).max(1);
    let last = line_index
        .saturating_add(span)
        .min(segment.len().saturating_sub(2));

    let mut left = Vec::new();
    let mut right = Vec::new();
    if first <= last {
        for i in first..=last {
            let (l, r) = radius_points(segment, i, radius)?;
            left.push(l);
            right.push(r);
        }
    }
    if left.len() < 2 {
        return Err(GeometryError::EmptyBand {
            line_index,
            interior: left.len(),
        });
    }
    left.extend(right.into_iter().rev());
    Ok(Polygon::new(left))
}

/// Full left and right offset polylines of a segment, for display.
pub fn radius_lines(
    segment: &SegmentPoints,
    radius: f32,
) -> Result<(Vec<[f32; 2]>, Vec<[f32; 2]>), GeometryError> {
    if segment.is_empty() {
        return Err(GeometryError::EmptySegment);
    }
    let mut left = Vec::with_capacity(segment.len());
    let mut right = Vec::with_capacity(segment.len());
    for i in 0..segment.len() {
        let (l, r) = radius_points(segment, i, radius)?;
        left.push(l);
        right.push(r);
    }
    Ok((left, right))
}
