//! I/O helpers for grayscale planes and JSON.
//!
//! - `load_grayscale_plane`: read a PNG/JPEG/TIFF into an `ImageF32` in [0, 1].
//! - `save_mask_png`: write a binary mask as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageF32;
use crate::geometry::Mask;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk, convert to 8-bit grayscale and scale to [0, 1].
pub fn load_grayscale_plane(path: &Path) -> Result<ImageF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    ImageF32::from_vec(width, height, data)
        .ok_or_else(|| format!("Unexpected buffer size for {}", path.display()))
}

/// Save a mask as an 8-bit PNG (0 outside, 255 inside).
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for y in 0..mask.h {
        for x in 0..mask.w {
            let v = if mask.get(x, y) { 255u8 } else { 0u8 };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
