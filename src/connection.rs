//! Brightest-path connection search.
//!
//! A spine is anchored to the segment point it is most brightly connected to.
//! Starting from the segment point nearest the spine in 3D, a window of
//! candidates is scored by the integrated intensity along the straight line
//! from the spine to each candidate, sampled on the projected tile.
use crate::error::GeometryError;
use crate::geometry::{closest_point_index, distance2d};
use crate::image::ImageTile;
use crate::types::SegmentPoints;
use log::debug;
use nalgebra::Point3;

/// Intensity samples along `p0 → p1` (full-image coordinates).
///
/// `ceil(length) + 1` evenly spaced bilinear samples including both endpoints;
/// a zero-length line yields one sample. Positions outside the tile are
/// clamped to its border.
pub fn line_profile(tile: &ImageTile, p0: [f32; 2], p1: [f32; 2]) -> Vec<f32> {
    let a = tile.to_local(p0);
    let b = tile.to_local(p1);
    let len = distance2d(a, b);
    let steps = if len.is_finite() { len.ceil() as usize } else { 0 };
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = if steps == 0 {
            0.0
        } else {
            i as f32 / steps as f32
        };
        let x = a[0] + t * (b[0] - a[0]);
        let y = a[1] + t * (b[1] - a[1]);
        if let Some(v) = tile.image.sample_bilinear(x, y) {
            out.push(v);
        }
    }
    out
}

/// Sum of [`line_profile`] samples, accumulated in f64.
pub fn line_integral(tile: &ImageTile, p0: [f32; 2], p1: [f32; 2]) -> f64 {
    line_profile(tile, p0, p1).iter().map(|&v| v as f64).sum()
}

/// Inclusive candidate window `[closest - window, closest + window]` clipped
/// to the segment.
pub fn candidate_window(closest: usize, window: usize, len: usize) -> (usize, usize) {
    let lo = closest.saturating_sub(window);
    let hi = closest.saturating_add(window).min(len.saturating_sub(1));
    (lo, hi)
}

/// Segment index whose straight path from the spine carries the most intensity.
///
/// Ties keep the earliest candidate in window order.
pub fn locate(
    spine: &Point3<f32>,
    segment: &SegmentPoints,
    tile: &ImageTile,
    window: usize,
) -> Result<usize, GeometryError> {
    let closest = closest_point_index(spine, segment).ok_or(GeometryError::EmptySegment)?;
    let (lo, hi) = candidate_window(closest, window, segment.len());
    let origin = [spine.x, spine.y];

    let mut best = closest;
    let mut best_score = f64::NEG_INFINITY;
    for (i, p) in segment.points[lo..=hi].iter().enumerate() {
        let score = line_integral(tile, origin, [p.x, p.y]);
        if score > best_score {
            best_score = score;
            best = lo + i;
        }
    }
    debug!(
        "locate: segment={} closest={} window=[{}, {}] best={} score={:.3}",
        segment.id, closest, lo, hi, best, best_score
    );
    Ok(best)
}
