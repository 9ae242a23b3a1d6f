//! Parameter types configuring the per-spine analysis.
//!
//! Geometry knobs travel with each spine ([`SpineParams`]) so an edited spine
//! can be re-run on its own; batch-wide settings live in [`AnalysisParams`].
//! Both deserialize with defaults for every missing field.

use crate::background::BackgroundParams;
use serde::{Deserialize, Serialize};

/// Per-spine ROI parameters (pixels unless noted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpineParams {
    /// Perpendicular distance of each long side of the spine rectangle from its axis.
    pub width: f32,
    /// Extension of the rectangle past the spine point.
    pub extend_head: f32,
    /// Extension of the rectangle behind the segment connection point.
    pub extend_tail: f32,
    /// Half-width of the segment band; also its half-span in line indices.
    pub radius: f32,
    /// Half-size of the candidate window for the brightest connection search.
    pub num_pts_for_brightest: usize,
    /// Planes above and below the spine used for the max projection.
    pub z_plus_minus: usize,
}

impl Default for SpineParams {
    fn default() -> Self {
        Self {
            width: 3.0,
            extend_head: 3.0,
            extend_tail: 3.0,
            radius: 5.0,
            num_pts_for_brightest: 5,
            z_plus_minus: 1,
        }
    }
}

/// Batch-wide analysis settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisParams {
    pub background: BackgroundParams,
    /// Half-size of the square tile cropped around each spine.
    pub crop_half_size: usize,
    /// Channel number used when naming intensity columns.
    pub channel: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            background: BackgroundParams::default(),
            crop_half_size: 48,
            channel: 1,
        }
    }
}
