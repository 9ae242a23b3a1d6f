//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Projections, crops and intensity statistics all operate on this type.
//! Provides row access and a contiguous slice when `stride == width`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` on a size mismatch.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Copy the window `[x0, x0 + w) × [y0, y0 + h)`, clipped to the image.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> Self {
        let x0 = x0.min(self.w);
        let y0 = y0.min(self.h);
        let w = w.min(self.w - x0);
        let h = h.min(self.h - y0);
        let mut out = Self::new(w, h);
        for y in 0..h {
            let src = self.idx(x0, y0 + y);
            out.data[y * w..(y + 1) * w].copy_from_slice(&self.data[src..src + w]);
        }
        out
    }

    /// Bilinear sample at a sub-pixel position with edge clamping.
    ///
    /// Pixel centers sit on integer coordinates. Returns `None` only for an
    /// empty image or a non-finite position.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Option<f32> {
        if self.is_empty() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let max_x = (self.w - 1) as f32;
        let max_y = (self.h - 1) as f32;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);
        let xf = x.floor();
        let yf = y.floor();
        let x0 = xf as usize;
        let y0 = yf as usize;
        let x1 = (x0 + 1).min(self.w - 1);
        let y1 = (y0 + 1).min(self.h - 1);
        let tx = x - xf;
        let ty = y - yf;

        let v00 = self.get(x0, y0);
        let v10 = self.get(x1, y0);
        let v01 = self.get(x0, y1);
        let v11 = self.get(x1, y1);
        let top = v00 * (1.0 - tx) + v10 * tx;
        let bottom = v01 * (1.0 - tx) + v11 * tx;
        Some(top * (1.0 - ty) + bottom * ty)
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
