/// Intensity levels used by the synthetic dendrite images.
pub const BACKGROUND: f32 = 0.05;
pub const DENDRITE: f32 = 0.6;
pub const NECK: f32 = 0.8;
pub const HEAD: f32 = 1.0;

/// Horizontal dendrite at row `dendrite_y` (5 px thick) with one spine per
/// entry of `spines`: a head disk of radius 3 joined to the dendrite by a
/// vertical neck.
pub fn dendrite_with_spines(
    width: usize,
    height: usize,
    dendrite_y: usize,
    spines: &[(usize, usize)],
) -> Vec<f32> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = vec![BACKGROUND; width * height];
    for y in dendrite_y.saturating_sub(2)..=(dendrite_y + 2).min(height - 1) {
        for x in 0..width {
            img[y * width + x] = DENDRITE;
        }
    }
    for &(sx, sy) in spines {
        let (y0, y1) = if sy < dendrite_y {
            (sy, dendrite_y)
        } else {
            (dendrite_y, sy)
        };
        for y in y0..=y1 {
            img[y * width + sx] = img[y * width + sx].max(NECK);
        }
        for y in sy.saturating_sub(3)..=(sy + 3).min(height - 1) {
            for x in sx.saturating_sub(3)..=(sx + 3).min(width - 1) {
                let dx = x as f32 - sx as f32;
                let dy = y as f32 - sy as f32;
                if dx * dx + dy * dy <= 9.0 {
                    img[y * width + x] = HEAD;
                }
            }
        }
    }
    img
}

/// Segment tracing along row `y` with one point per column.
pub fn horizontal_tracing(width: usize, y: f32, z: f32) -> Vec<(f32, f32, f32)> {
    (0..width).map(|x| (x as f32, y, z)).collect()
}
