//! Z-stack of same-sized planes and the max-intensity projection used to
//! produce per-spine images.
use super::{ImageF32, ImageTile, ImageView, ImageViewMut};

#[derive(Clone, Debug)]
pub struct ImageStack {
    pub w: usize,
    pub h: usize,
    planes: Vec<ImageF32>,
}

impl ImageStack {
    /// Build a stack from planes that all share the same size.
    pub fn new(planes: Vec<ImageF32>) -> Result<Self, String> {
        let (w, h) = planes.first().map(|p| (p.w, p.h)).unwrap_or((0, 0));
        if let Some((z, p)) = planes
            .iter()
            .enumerate()
            .find(|(_, p)| p.w != w || p.h != h)
        {
            return Err(format!(
                "plane {z} is {}x{}, expected {w}x{h}",
                p.w, p.h
            ));
        }
        Ok(Self { w, h, planes })
    }

    /// Single-plane stack, e.g. an already projected image.
    pub fn single(plane: ImageF32) -> Self {
        Self {
            w: plane.w,
            h: plane.h,
            planes: vec![plane],
        }
    }

    pub fn depth(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, z: usize) -> Option<&ImageF32> {
        self.planes.get(z)
    }

    /// Planes `[z - up, z + down]` clipped to the stack, with `z` clamped.
    fn z_range(&self, z: usize, up: usize, down: usize) -> Option<(usize, usize)> {
        let last = self.planes.len().checked_sub(1)?;
        let z = z.min(last);
        Some((z.saturating_sub(up), (z + down).min(last)))
    }

    /// Max-intensity projection over `[z - up, z + down]`, clipped to the stack.
    ///
    /// `z` outside the stack is clamped to the nearest plane. An empty stack
    /// yields an empty image.
    pub fn max_projection(&self, z: usize, up: usize, down: usize) -> ImageF32 {
        let Some((z0, z1)) = self.z_range(z, up, down) else {
            return ImageF32::new(0, 0);
        };
        let mut out = self.planes[z0].clone();
        for plane in &self.planes[z0 + 1..=z1] {
            max_into(&mut out, plane, 0, 0);
        }
        out
    }

    /// Projection around `z` cropped to a square window around `center`.
    ///
    /// Only the window is read from each plane; the result equals cropping
    /// [`ImageStack::max_projection`] with [`ImageTile::around`].
    pub fn cropped_projection(
        &self,
        center: [f32; 2],
        z: usize,
        z_plus_minus: usize,
        half_size: usize,
    ) -> ImageTile {
        let (x0, y0, w, h) = ImageTile::window(self.w, self.h, center, half_size);
        let image = match self.z_range(z, z_plus_minus, z_plus_minus) {
            Some((z0, z1)) => {
                let mut out = self.planes[z0].crop(x0, y0, w, h);
                for plane in &self.planes[z0 + 1..=z1] {
                    max_into(&mut out, plane, x0, y0);
                }
                out
            }
            None => ImageF32::new(0, 0),
        };
        ImageTile {
            origin_x: x0,
            origin_y: y0,
            image,
        }
    }
}

/// `out = max(out, plane)` over the window of `plane` starting at `(x0, y0)`.
fn max_into(out: &mut ImageF32, plane: &ImageF32, x0: usize, y0: usize) {
    let w = out.w;
    for y in 0..out.h {
        let src = &plane.row(y0 + y)[x0..x0 + w];
        for (d, &s) in out.row_mut(y).iter_mut().zip(src) {
            if s > *d {
                *d = s;
            }
        }
    }
}
