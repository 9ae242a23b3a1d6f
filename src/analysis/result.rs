use crate::error::AnalysisError;
use crate::geometry::Polygon;
use crate::intensity::{intensity_columns, IntensityStats, RoiKind};
use crate::types::{ConnectionSide, SegmentId, SpineId, SpineRecord};
use serde::Serialize;

/// Steps of the per-spine pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpineStage {
    Start,
    LocateConnection,
    BuildSpineRoi,
    BuildBandRoi,
    ComputeBackgroundOffset,
    AggregateAll,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    Done,
    Aborted {
        stage: SpineStage,
        error: AnalysisError,
    },
}

/// Everything computed for one spine in one analysis call.
///
/// On abort every ROI and statistic field is `None`; `brightest_index` keeps
/// whatever was resolved before the failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpineAnalysisResult {
    pub spine_id: SpineId,
    pub segment_id: SegmentId,
    pub brightest_index: Option<usize>,
    /// True when `brightest_index` was searched rather than supplied.
    pub brightest_computed: bool,
    pub connection_side: Option<ConnectionSide>,
    pub spine_roi_polygon: Option<Polygon>,
    pub segment_roi_polygon: Option<Polygon>,
    pub spine_background_polygon: Option<Polygon>,
    pub segment_background_polygon: Option<Polygon>,
    /// Background translation `(dy, dx)` in pixels.
    pub background_offset: Option<(i32, i32)>,
    pub background_degraded: bool,
    pub spine_stats: Option<IntensityStats>,
    pub spine_background_stats: Option<IntensityStats>,
    pub segment_stats: Option<IntensityStats>,
    pub segment_background_stats: Option<IntensityStats>,
    pub status: AnalysisStatus,
}

impl SpineAnalysisResult {
    pub(crate) fn pending(spine: &SpineRecord) -> Self {
        Self {
            spine_id: spine.id,
            segment_id: spine.segment_id,
            brightest_index: None,
            brightest_computed: false,
            connection_side: None,
            spine_roi_polygon: None,
            segment_roi_polygon: None,
            spine_background_polygon: None,
            segment_background_polygon: None,
            background_offset: None,
            background_degraded: false,
            spine_stats: None,
            spine_background_stats: None,
            segment_stats: None,
            segment_background_stats: None,
            status: AnalysisStatus::Done,
        }
    }

    pub(crate) fn aborted(
        spine: &SpineRecord,
        brightest: Option<(usize, bool)>,
        stage: SpineStage,
        error: AnalysisError,
    ) -> Self {
        let mut out = Self::pending(spine);
        if let Some((index, computed)) = brightest {
            out.brightest_index = Some(index);
            out.brightest_computed = computed;
        }
        out.status = AnalysisStatus::Aborted { stage, error };
        out
    }

    pub fn is_done(&self) -> bool {
        self.status == AnalysisStatus::Done
    }

    /// Statistics of one ROI kind.
    pub fn stats(&self, kind: RoiKind) -> Option<&IntensityStats> {
        match kind {
            RoiKind::Spine => self.spine_stats.as_ref(),
            RoiKind::SpineBackground => self.spine_background_stats.as_ref(),
            RoiKind::Segment => self.segment_stats.as_ref(),
            RoiKind::SegmentBackground => self.segment_background_stats.as_ref(),
        }
    }

    /// Intensity columns for all four ROIs, e.g. `sSum_ch1 … segbMax_ch1`.
    pub fn columns(&self, channel: usize) -> Vec<(String, f64)> {
        RoiKind::ALL
            .into_iter()
            .flat_map(|kind| intensity_columns(kind, self.stats(kind), channel))
            .collect()
    }
}
