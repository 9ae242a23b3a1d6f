//! Binary raster masks and polygon rasterization.
//!
//! Pixel `(x, y)` covers the unit square centred on integer coordinates, the
//! same convention [`crate::image::ImageF32::sample_bilinear`] uses. Masks are
//! stored row-major as `u8` (1 = inside) to keep the layout identical to the
//! image they are applied to.
use super::polygon::Polygon;

pub(crate) const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[self.idx(x, y)] != 0
    }

    /// Like [`Mask::get`] but `false` for coordinates outside the raster.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h && {
            self.get(x as usize, y as usize)
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, inside: bool) {
        let i = self.idx(x, y);
        self.data[i] = inside as u8;
    }

    /// Number of pixels inside the mask.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True when no pixel is set.
    pub fn is_clear(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// `(x, y)` of every set pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.w.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// `self AND NOT other`.
    pub fn difference(&self, other: &Mask) -> Mask {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| (a != 0 && b == 0) as u8)
            .collect();
        Mask {
            w: self.w,
            h: self.h,
            data,
        }
    }

    /// `self OR other`.
    pub fn union(&self, other: &Mask) -> Mask {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| (a != 0 || b != 0) as u8)
            .collect();
        Mask {
            w: self.w,
            h: self.h,
            data,
        }
    }

    /// True when any pixel is set in both masks.
    pub fn intersects(&self, other: &Mask) -> bool {
        self.data
            .iter()
            .zip(&other.data)
            .any(|(&a, &b)| a != 0 && b != 0)
    }

    /// One-pixel binary dilation with the 3×3 (8-connected) structuring element.
    pub fn dilate(&self) -> Mask {
        let mut out = self.clone();
        for (x, y) in self.pixels() {
            for (dx, dy) in NEIGH_OFFSETS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx >= 0 && ny >= 0 && (nx as usize) < self.w && (ny as usize) < self.h {
                    out.set(nx as usize, ny as usize, true);
                }
            }
        }
        out
    }

    /// Move every set pixel by `(dy, dx)`.
    ///
    /// Returns `None` when any set pixel would leave the raster, so a
    /// translated mask always keeps its full pixel count.
    pub fn translate_within(&self, dy: i32, dx: i32) -> Option<Mask> {
        let mut out = Mask::new(self.w, self.h);
        for (x, y) in self.pixels() {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= self.w as i64 || ny >= self.h as i64 {
                return None;
            }
            out.set(nx as usize, ny as usize, true);
        }
        Some(out)
    }
}

/// Fill `polygon` (given in raster coordinates) into a `w × h` mask.
///
/// Scanline fill at pixel centres with the half-open crossing rule
/// (`(y0 > y) != (y1 > y)`), so shared vertices are counted once. Every pixel
/// whose centre is strictly inside the outline is set; centres exactly on a
/// left/right edge are set as well.
pub fn rasterize(polygon: &Polygon, w: usize, h: usize) -> Mask {
    let mut mask = Mask::new(w, h);
    let n = polygon.len();
    if n < 3 || w == 0 || h == 0 {
        return mask;
    }
    let Some((_, min_y, _, max_y)) = polygon.bounds() else {
        return mask;
    };
    if !min_y.is_finite() || !max_y.is_finite() {
        return mask;
    }
    let y_start = min_y.ceil().max(0.0) as usize;
    let y_end = max_y.floor().min((h - 1) as f32);
    if y_end < 0.0 {
        return mask;
    }
    let y_end = y_end as usize;

    let mut xs: Vec<f32> = Vec::with_capacity(n);
    for y in y_start..=y_end {
        let yc = y as f32;
        xs.clear();
        for i in 0..n {
            let a = polygon.points[i];
            let b = polygon.points[(i + 1) % n];
            if (a[1] > yc) != (b[1] > yc) {
                let t = (yc - a[1]) / (b[1] - a[1]);
                xs.push(a[0] + t * (b[0] - a[0]));
            }
        }
        xs.sort_by(f32::total_cmp);
        for pair in xs.chunks_exact(2) {
            let x0 = pair[0].ceil().max(0.0);
            let x1 = pair[1].floor().min((w - 1) as f32);
            if x1 < x0 {
                continue;
            }
            for x in x0 as usize..=x1 as usize {
                mask.set(x, y, true);
            }
        }
    }
    mask
}
