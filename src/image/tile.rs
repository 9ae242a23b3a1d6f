//! Cropped image window that remembers where it came from.
//!
//! Per-spine work never sees the full stack. Each task receives an
//! [`ImageTile`]: a small projected crop plus the `(origin_x, origin_y)` of
//! its top-left pixel in full-image coordinates. Geometry stays in full-image
//! coordinates and is shifted into tile space with [`ImageTile::to_local`].
use super::ImageF32;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageTile {
    /// Left/top origin of the tile within the full-resolution plane.
    pub origin_x: usize,
    pub origin_y: usize,
    pub image: ImageF32,
}

impl ImageTile {
    /// Tile covering a whole plane (origin at zero).
    pub fn full(image: ImageF32) -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            image,
        }
    }

    /// Square window of `half_size` pixels around `center`, clipped to `plane`.
    pub fn around(plane: &ImageF32, center: [f32; 2], half_size: usize) -> Self {
        let (x0, y0, w, h) = Self::window(plane.w, plane.h, center, half_size);
        Self {
            origin_x: x0,
            origin_y: y0,
            image: plane.crop(x0, y0, w, h),
        }
    }

    /// `(x0, y0, w, h)` of the window [`ImageTile::around`] cuts from a
    /// `plane_w × plane_h` plane.
    pub fn window(
        plane_w: usize,
        plane_h: usize,
        center: [f32; 2],
        half_size: usize,
    ) -> (usize, usize, usize, usize) {
        let cx = center[0].round().max(0.0) as usize;
        let cy = center[1].round().max(0.0) as usize;
        let x0 = cx.saturating_sub(half_size).min(plane_w);
        let y0 = cy.saturating_sub(half_size).min(plane_h);
        let x1 = (cx + half_size + 1).min(plane_w);
        let y1 = (cy + half_size + 1).min(plane_h);
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.image.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image.h
    }

    /// Full-image → tile coordinates.
    #[inline]
    pub fn to_local(&self, p: [f32; 2]) -> [f32; 2] {
        [p[0] - self.origin_x as f32, p[1] - self.origin_y as f32]
    }

    /// Tile → full-image coordinates.
    #[inline]
    pub fn to_global(&self, p: [f32; 2]) -> [f32; 2] {
        [p[0] + self.origin_x as f32, p[1] + self.origin_y as f32]
    }

    /// Nearest tile pixel for a full-image position, if it falls inside.
    pub fn local_pixel(&self, p: [f32; 2]) -> Option<(usize, usize)> {
        let l = self.to_local(p);
        let x = l[0].round();
        let y = l[1].round();
        if x < 0.0 || y < 0.0 || x >= self.width() as f32 || y >= self.height() as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn around_clips_at_image_border() {
        let plane = ImageF32::new(20, 10);
        let tile = ImageTile::around(&plane, [2.0, 8.0], 4);
        assert_eq!((tile.origin_x, tile.origin_y), (0, 4));
        assert_eq!((tile.width(), tile.height()), (7, 6));
    }

    #[test]
    fn local_and_global_round_trip() {
        let plane = ImageF32::new(50, 50);
        let tile = ImageTile::around(&plane, [25.0, 30.0], 5);
        let p = [27.5, 31.0];
        assert_eq!(tile.to_global(tile.to_local(p)), p);
        assert_eq!(tile.local_pixel([25.0, 30.0]), Some((5, 5)));
        assert_eq!(tile.local_pixel([0.0, 0.0]), None);
    }
}
