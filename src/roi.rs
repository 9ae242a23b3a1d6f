//! ROI construction for one spine.
//!
//! Outlines ([`Polygon`]) are kept in full-image coordinates; masks live in the
//! pixel grid of the spine's [`ImageTile`]. The spine-head ROI is the spine
//! rectangle with the segment band carved out, dilated by one pixel and
//! reduced to the component that contains (or lies nearest to) the spine.
use crate::analysis::SpineParams;
use crate::error::{AnalysisError, GeometryError};
use crate::geometry::{
    band_polygon, distance2d, radius_points, rasterize, rectangle_polygon,
    select_nearest_component, trace_boundary, Mask, Polygon,
};
use crate::image::ImageTile;
use crate::types::{ConnectionSide, SegmentPoints, SpineRecord};

/// All ROI geometry derived for one spine.
#[derive(Clone, Debug, PartialEq)]
pub struct SpineRois {
    pub connection_index: usize,
    pub line_point: [f32; 2],
    pub rectangle: Polygon,
    pub band: Polygon,
    pub spine_mask: Mask,
    pub band_mask: Mask,
    pub side: ConnectionSide,
    /// Closed display outline of the spine mask.
    pub jagged: Polygon,
}

/// Segment point at `index`, or an index error naming the segment.
pub fn line_point(segment: &SegmentPoints, index: usize) -> Result<[f32; 2], AnalysisError> {
    segment.xy(index).ok_or(AnalysisError::IndexOutOfRange {
        index,
        segment_id: segment.id,
        len: segment.len(),
    })
}

pub fn spine_rectangle(
    spine: [f32; 2],
    line_point: [f32; 2],
    params: &SpineParams,
) -> Result<Polygon, GeometryError> {
    rectangle_polygon(
        spine,
        line_point,
        params.width,
        params.extend_head,
        params.extend_tail,
    )
}

pub fn segment_band(
    connection_index: usize,
    segment: &SegmentPoints,
    params: &SpineParams,
) -> Result<Polygon, GeometryError> {
    band_polygon(connection_index, params.radius, segment)
}

/// Rasterize a full-image polygon into the tile grid.
pub fn tile_mask(polygon: &Polygon, tile: &ImageTile) -> Mask {
    let local = polygon.shifted(-(tile.origin_x as f32), -(tile.origin_y as f32));
    rasterize(&local, tile.width(), tile.height())
}

/// Spine-head and band masks in tile coordinates.
///
/// Fails only when nothing of the rectangle survives the band cut.
pub fn carve_spine_mask(
    spine: [f32; 2],
    rectangle: &Polygon,
    band: &Polygon,
    tile: &ImageTile,
) -> Result<(Mask, Mask), GeometryError> {
    let band_mask = tile_mask(band, tile);
    let raw = tile_mask(rectangle, tile).difference(&band_mask);
    // a spine closer to the segment than `radius` sits inside the band; its
    // head is then the carved piece nearest to it
    let spine_mask = select_nearest_component(&raw.dilate(), tile.to_local(spine))?;
    Ok((spine_mask, band_mask))
}

/// Side whose radius-line point at `index` is closer to the spine; ties go left.
pub fn connection_side(
    spine: [f32; 2],
    segment: &SegmentPoints,
    index: usize,
    radius: f32,
) -> Result<ConnectionSide, GeometryError> {
    let (left, right) = radius_points(segment, index, radius)?;
    if distance2d(spine, left) <= distance2d(spine, right) {
        Ok(ConnectionSide::Left)
    } else {
        Ok(ConnectionSide::Right)
    }
}

/// Closed display outline of `spine_mask` snapped to the rectangle's head.
///
/// The traced boundary is rotated to begin at the boundary point nearest the
/// midpoint of the two head corners; the corners are appended (the one nearer
/// the last boundary point first) and the first point repeated to close it.
pub fn jagged_polygon(spine_mask: &Mask, rectangle: &Polygon, tile: &ImageTile) -> Polygon {
    let contour: Vec<[f32; 2]> = trace_boundary(spine_mask)
        .into_iter()
        .map(|(x, y)| tile.to_global([x as f32, y as f32]))
        .collect();
    let (Some(&a), Some(&b)) = (rectangle.points.first(), rectangle.points.get(1)) else {
        return Polygon::new(contour);
    };
    if contour.is_empty() {
        return Polygon::default();
    }
    let mid = [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5];
    let mut start = 0;
    let mut best = f32::INFINITY;
    for (i, p) in contour.iter().enumerate() {
        let d = distance2d(*p, mid);
        if d < best {
            best = d;
            start = i;
        }
    }
    let mut points: Vec<[f32; 2]> = contour[start..]
        .iter()
        .chain(&contour[..start])
        .copied()
        .collect();
    let last = points[points.len() - 1];
    let (near, far) = if distance2d(last, a) <= distance2d(last, b) {
        (a, b)
    } else {
        (b, a)
    };
    let first = points[0];
    points.extend([near, far, first]);
    Polygon::new(points)
}

/// Build every ROI for `spine` anchored at `connection_index`.
pub fn build(
    spine: &SpineRecord,
    connection_index: usize,
    segment: &SegmentPoints,
    tile: &ImageTile,
) -> Result<SpineRois, AnalysisError> {
    let params = &spine.params;
    let line_point = line_point(segment, connection_index)?;
    let rectangle = spine_rectangle(spine.xy(), line_point, params)?;
    let band = segment_band(connection_index, segment, params)?;
    let (spine_mask, band_mask) = carve_spine_mask(spine.xy(), &rectangle, &band, tile)?;
    let side = connection_side(spine.xy(), segment, connection_index, params.radius)?;
    let jagged = jagged_polygon(&spine_mask, &rectangle, tile);
    Ok(SpineRois {
        connection_index,
        line_point,
        rectangle,
        band,
        spine_mask,
        band_mask,
        side,
        jagged,
    })
}
