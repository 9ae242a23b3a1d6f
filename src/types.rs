//! Typed records exchanged between the annotation layer and the analysis core.
use crate::analysis::SpineParams;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub type SegmentId = usize;
pub type SpineId = usize;

/// Ordered tracing of one segment; the position of a point is its line index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentPoints {
    pub id: SegmentId,
    pub points: Vec<Point3<f32>>,
}

impl SegmentPoints {
    pub fn new(id: SegmentId, points: Vec<Point3<f32>>) -> Self {
        Self { id, points }
    }

    /// Convenience constructor from `(x, y, z)` tuples.
    pub fn from_xyz(id: SegmentId, xyz: &[(f32, f32, f32)]) -> Self {
        let points = xyz.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
        Self { id, points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Planar `(x, y)` of the point at `index`.
    #[inline]
    pub fn xy(&self, index: usize) -> Option<[f32; 2]> {
        self.points.get(index).map(|p| [p.x, p.y])
    }
}

/// One spine annotation together with its editable analysis parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpineRecord {
    pub id: SpineId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub segment_id: SegmentId,
    /// Manually fixed connection index; `None` asks for a fresh search.
    #[serde(default)]
    pub brightest_index: Option<usize>,
    #[serde(flatten)]
    pub params: SpineParams,
}

impl SpineRecord {
    pub fn new(id: SpineId, segment_id: SegmentId, x: f32, y: f32, z: f32) -> Self {
        Self {
            id,
            x,
            y,
            z,
            segment_id,
            brightest_index: None,
            params: SpineParams::default(),
        }
    }

    #[inline]
    pub fn point(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn xy(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Nearest plane index for the spine's z position.
    #[inline]
    pub fn plane(&self) -> usize {
        self.z.round().max(0.0) as usize
    }
}

/// Side of the segment the spine leaves from, relative to the tracing direction.
///
/// `Left` is the side of the +90° perpendicular from [`tangent_offset`]. In
/// image coordinates (y down) that is the tracing walker's right on screen, so
/// for a segment traced left to right `Left` is below it and `Right` above.
///
/// [`tangent_offset`]: crate::geometry::tangent_offset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionSide {
    Left,
    Right,
}
