//! Per-spine pipeline.
//!
//! `Start → LocateConnection → BuildSpineRoi → BuildBandRoi →
//! ComputeBackgroundOffset → AggregateAll → Done`. Any failing step ends in an
//! aborted result tagged with the stage it failed in. The pipeline only reads
//! its inputs, so running it twice on the same task gives identical results.
use super::params::AnalysisParams;
use super::result::{AnalysisStatus, SpineAnalysisResult, SpineStage};
use crate::background::find_offset;
use crate::connection::locate;
use crate::error::{AnalysisError, GeometryError};
use crate::geometry::Mask;
use crate::image::ImageTile;
use crate::intensity::aggregate;
use crate::roi::{
    carve_spine_mask, connection_side, jagged_polygon, line_point, segment_band, spine_rectangle,
};
use crate::types::{SegmentPoints, SpineRecord};
use log::{debug, warn};

/// Inputs of one spine task: the spine row and its cropped projection.
#[derive(Clone, Debug)]
pub struct SpineTask {
    pub spine: SpineRecord,
    pub tile: ImageTile,
}

impl SpineTask {
    pub fn new(spine: SpineRecord, tile: ImageTile) -> Self {
        Self { spine, tile }
    }
}

/// Run the whole pipeline for one spine; failures become aborted results.
pub fn analyze_spine(
    task: &SpineTask,
    segment: &SegmentPoints,
    params: &AnalysisParams,
) -> SpineAnalysisResult {
    let mut run = SpineRun::new(task, segment, params);
    match run.execute() {
        Ok(result) => result,
        Err(error) => {
            warn!(
                "spine {} (segment {}): aborted at {:?}: {error}",
                task.spine.id, segment.id, run.stage
            );
            SpineAnalysisResult::aborted(&task.spine, run.brightest, run.stage, error)
        }
    }
}

struct SpineRun<'a> {
    task: &'a SpineTask,
    segment: &'a SegmentPoints,
    params: &'a AnalysisParams,
    stage: SpineStage,
    /// Resolved connection index and whether it was computed.
    brightest: Option<(usize, bool)>,
}

impl<'a> SpineRun<'a> {
    fn new(task: &'a SpineTask, segment: &'a SegmentPoints, params: &'a AnalysisParams) -> Self {
        Self {
            task,
            segment,
            params,
            stage: SpineStage::Start,
            brightest: None,
        }
    }

    fn enter(&mut self, stage: SpineStage) {
        debug!("spine {}: {:?} -> {:?}", self.task.spine.id, self.stage, stage);
        self.stage = stage;
    }

    fn execute(&mut self) -> Result<SpineAnalysisResult, AnalysisError> {
        let (task, segment, params) = (self.task, self.segment, self.params);
        let spine = &task.spine;
        let tile = &task.tile;
        let sp = &spine.params;
        let xy = spine.xy();

        self.enter(SpineStage::LocateConnection);
        let (index, computed) = self.resolve_connection()?;
        self.brightest = Some((index, computed));

        self.enter(SpineStage::BuildSpineRoi);
        let anchor = line_point(segment, index)?;
        let rectangle = spine_rectangle(xy, anchor, sp)?;

        self.enter(SpineStage::BuildBandRoi);
        let band = segment_band(index, segment, sp)?;
        let (spine_mask, band_mask) = carve_spine_mask(xy, &rectangle, &band, tile)?;
        let side = connection_side(xy, segment, index, sp.radius)?;
        let jagged = jagged_polygon(&spine_mask, &rectangle, tile);

        self.enter(SpineStage::ComputeBackgroundOffset);
        let combined = spine_mask.union(&band_mask);
        let offset = find_offset(
            &combined,
            &tile.image,
            tile.to_local(xy),
            &params.background,
        );
        let spine_bg = shifted(&spine_mask, offset.dy, offset.dx);
        let band_bg = shifted(&band_mask, offset.dy, offset.dx);

        self.enter(SpineStage::AggregateAll);
        let spine_stats = aggregate(&spine_mask, &tile.image)?;
        let spine_background_stats = aggregate(&spine_bg, &tile.image)?;
        let segment_stats = aggregate(&band_mask, &tile.image)?;
        let segment_background_stats = aggregate(&band_bg, &tile.image)?;

        self.enter(SpineStage::Done);
        let (dxf, dyf) = (offset.dx as f32, offset.dy as f32);
        let mut result = SpineAnalysisResult::pending(spine);
        result.brightest_index = Some(index);
        result.brightest_computed = computed;
        result.connection_side = Some(side);
        result.spine_background_polygon = Some(jagged.shifted(dxf, dyf));
        result.segment_background_polygon = Some(band.shifted(dxf, dyf));
        result.spine_roi_polygon = Some(jagged);
        result.segment_roi_polygon = Some(band);
        result.background_offset = Some((offset.dy, offset.dx));
        result.background_degraded = offset.degraded;
        result.spine_stats = Some(spine_stats);
        result.spine_background_stats = Some(spine_background_stats);
        result.segment_stats = Some(segment_stats);
        result.segment_background_stats = Some(segment_background_stats);
        result.status = AnalysisStatus::Done;
        Ok(result)
    }

    /// Manual index when supplied (validated), otherwise the brightest search.
    fn resolve_connection(&self) -> Result<(usize, bool), AnalysisError> {
        let spine = &self.task.spine;
        if self.segment.is_empty() {
            return Err(GeometryError::EmptySegment.into());
        }
        match spine.brightest_index {
            Some(index) if index < self.segment.len() => Ok((index, false)),
            Some(index) => {
                warn!(
                    "spine {}: brightest index {index} outside segment {} ({} points)",
                    spine.id,
                    self.segment.id,
                    self.segment.len()
                );
                Err(AnalysisError::IndexOutOfRange {
                    index,
                    segment_id: self.segment.id,
                    len: self.segment.len(),
                })
            }
            None => {
                let window = spine.params.num_pts_for_brightest;
                let index = locate(&spine.point(), self.segment, &self.task.tile, window)?;
                Ok((index, true))
            }
        }
    }
}

/// Mask moved by the background offset; a move that leaves the tile yields an
/// empty mask so aggregation reports it instead of measuring clipped pixels.
fn shifted(mask: &Mask, dy: i32, dx: i32) -> Mask {
    mask.translate_within(dy, dx)
        .unwrap_or_else(|| Mask::new(mask.w, mask.h))
}
