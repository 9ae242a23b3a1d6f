//! Placement of background ROIs next to the foreground.
//!
//! The combined foreground (spine ∪ segment band) is translated to a nearby
//! dark spot. Candidate translations lie on a circle around the original
//! position; each candidate must keep the whole mask inside the tile and must
//! not overlap the foreground. The candidate with the lowest mean intensity
//! wins.
//!
//! When every circle candidate is rejected the search falls back to square
//! rings of growing Chebyshev radius, scanned in a fixed order, and the first
//! acceptable offset is returned flagged as degraded. If even that fails the
//! zero offset is returned, also degraded; this is the only case in which
//! background and foreground overlap.
use crate::geometry::Mask;
use crate::image::ImageF32;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Search parameters for [`find_offset`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundParams {
    /// Distance (px) of the circle candidates from the original position.
    pub search_radius: f32,
    /// Number of evenly spaced candidate angles.
    pub num_samples: usize,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            search_radius: 12.0,
            num_samples: 16,
        }
    }
}

/// Chosen background translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundOffset {
    pub dy: i32,
    pub dx: i32,
    /// Mean intensity under the translated mask (NaN only for an empty mask).
    pub mean: f64,
    /// Set when the circle search was exhausted and the fallback was used.
    pub degraded: bool,
}

/// Circle candidates `(dy, dx)` at angles `2πk/n`, rounded and deduplicated in order.
pub fn circle_candidates(search_radius: f32, num_samples: usize) -> Vec<(i32, i32)> {
    let mut out: Vec<(i32, i32)> = Vec::with_capacity(num_samples);
    for k in 0..num_samples {
        let theta = std::f32::consts::TAU * k as f32 / num_samples as f32;
        let dy = (search_radius * theta.sin()).round() as i32;
        let dx = (search_radius * theta.cos()).round() as i32;
        if (dy, dx) != (0, 0) && !out.contains(&(dy, dx)) {
            out.push((dy, dx));
        }
    }
    out
}

/// Offsets on the square ring of Chebyshev radius `r`.
///
/// Order: top row left to right, right column top to bottom, bottom row right
/// to left, left column bottom to top.
pub fn ring_offsets(r: i32) -> Vec<(i32, i32)> {
    if r <= 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(8 * r as usize);
    for dx in -r..=r {
        out.push((-r, dx));
    }
    for dy in -r + 1..=r {
        out.push((dy, r));
    }
    for dx in (-r..r).rev() {
        out.push((r, dx));
    }
    for dy in (-r + 1..r).rev() {
        out.push((dy, -r));
    }
    out
}

fn mean_under(mask: &Mask, image: &ImageF32) -> f64 {
    let mut n = 0usize;
    let mut sum = 0.0f64;
    for (x, y) in mask.pixels() {
        sum += image.get(x, y) as f64;
        n += 1;
    }
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Mean intensity under the translated mask when the candidate is acceptable.
fn score(combined: &Mask, image: &ImageF32, dy: i32, dx: i32) -> Option<f64> {
    let moved = combined.translate_within(dy, dx)?;
    if moved.is_clear() || moved.intersects(combined) {
        return None;
    }
    Some(mean_under(&moved, image))
}

/// Lowest-intensity non-overlapping translation of `combined` within `image`.
///
/// `origin` is the reference point of the foreground (the spine position in
/// tile coordinates) and is only used for logging; candidates are relative
/// translations.
pub fn find_offset(
    combined: &Mask,
    image: &ImageF32,
    origin: [f32; 2],
    params: &BackgroundParams,
) -> BackgroundOffset {
    let mut best: Option<(i32, i32, f64)> = None;
    for (dy, dx) in circle_candidates(params.search_radius, params.num_samples) {
        let Some(mean) = score(combined, image, dy, dx) else {
            continue;
        };
        match best {
            Some((_, _, m)) if mean >= m => {}
            _ => best = Some((dy, dx, mean)),
        }
    }
    if let Some((dy, dx, mean)) = best {
        debug!(
            "background: origin=({:.1}, {:.1}) offset=({dy}, {dx}) mean={mean:.4}",
            origin[0], origin[1]
        );
        return BackgroundOffset {
            dy,
            dx,
            mean,
            degraded: false,
        };
    }

    let max_r = image.w.max(image.h) as i32;
    for r in 1..=max_r {
        for (dy, dx) in ring_offsets(r) {
            if let Some(mean) = score(combined, image, dy, dx) {
                warn!(
                    "background: circle search exhausted at origin=({:.1}, {:.1}), fallback offset=({dy}, {dx})",
                    origin[0], origin[1]
                );
                return BackgroundOffset {
                    dy,
                    dx,
                    mean,
                    degraded: true,
                };
            }
        }
    }

    warn!(
        "background: no non-overlapping placement at origin=({:.1}, {:.1}); using zero offset",
        origin[0], origin[1]
    );
    BackgroundOffset {
        dy: 0,
        dx: 0,
        mean: mean_under(combined, image),
        degraded: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(w: usize, h: usize, x0: usize, y0: usize, size: usize) -> Mask {
        let mut m = Mask::new(w, h);
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                m.set(x, y, true);
            }
        }
        m
    }

    #[test]
    fn circle_candidates_start_east() {
        let c = circle_candidates(5.0, 4);
        assert_eq!(c, vec![(0, 5), (5, 0), (0, -5), (-5, 0)]);
    }

    #[test]
    fn ring_offsets_cover_perimeter() {
        let ring = ring_offsets(1);
        assert_eq!(ring.len(), 8);
        assert_eq!(ring[0], (-1, -1));
        assert!(!ring.contains(&(0, 0)));
        assert_eq!(ring_offsets(2).len(), 16);
    }

    #[test]
    fn picks_darkest_side() {
        let mut img = ImageF32::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                img.set(x, y, if x < 20 { 10.0 } else { 1.0 });
            }
        }
        let fg = block(40, 40, 18, 18, 4);
        let params = BackgroundParams {
            search_radius: 8.0,
            num_samples: 8,
        };
        let off = find_offset(&fg, &img, [20.0, 20.0], &params);
        assert!(!off.degraded);
        assert_eq!((off.dy, off.dx), (0, 8));
        let moved = fg.translate_within(off.dy, off.dx).unwrap();
        assert!(!moved.intersects(&fg));
        assert_eq!(off.mean, 1.0);
    }

    #[test]
    fn falls_back_deterministically_when_circle_is_blocked() {
        let img = ImageF32::new(12, 12);
        let fg = block(12, 12, 2, 2, 4);
        let params = BackgroundParams {
            search_radius: 2.0,
            num_samples: 8,
        };
        let a = find_offset(&fg, &img, [4.0, 4.0], &params);
        let b = find_offset(&fg, &img, [4.0, 4.0], &params);
        assert!(a.degraded);
        assert_eq!(a, b);
        let moved = fg.translate_within(a.dy, a.dx).unwrap();
        assert!(!moved.intersects(&fg));
        assert_eq!((a.dy, a.dx), (-2, 4));
    }

    #[test]
    fn full_mask_degrades_to_zero_offset() {
        let img = ImageF32::new(4, 4);
        let fg = block(4, 4, 0, 0, 4);
        let off = find_offset(&fg, &img, [2.0, 2.0], &BackgroundParams::default());
        assert!(off.degraded);
        assert_eq!((off.dy, off.dx), (0, 0));
    }
}
