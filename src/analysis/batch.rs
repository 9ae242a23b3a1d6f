//! Batch orchestration: group spines by segment, prepare one task per spine
//! and map the pipeline over the tasks with an [`Executor`].
use super::executor::{Executor, SequentialExecutor};
use super::params::AnalysisParams;
use super::pipeline::{analyze_spine, SpineTask};
use super::result::SpineAnalysisResult;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::TimingBreakdown;
use crate::image::ImageStack;
use crate::types::{SegmentId, SegmentPoints, SpineRecord};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Outcome of [`analyze_stack`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// One result per input spine, in input order.
    pub results: Vec<SpineAnalysisResult>,
    pub timing: TimingBreakdown,
    pub aborted: usize,
    pub degraded: usize,
}

/// Positions of `spines` grouped by segment id, ascending.
pub fn group_by_segment(spines: &[SpineRecord]) -> BTreeMap<SegmentId, Vec<usize>> {
    let mut groups: BTreeMap<SegmentId, Vec<usize>> = BTreeMap::new();
    for (i, spine) in spines.iter().enumerate() {
        groups.entry(spine.segment_id).or_default().push(i);
    }
    groups
}

/// One task per spine with the tile cropped from the max projection around
/// the spine's plane.
pub fn prepare_tasks<'a, I>(stack: &ImageStack, spines: I, params: &AnalysisParams) -> Vec<SpineTask>
where
    I: IntoIterator<Item = &'a SpineRecord>,
{
    spines
        .into_iter()
        .map(|spine| {
            let tile = stack.cropped_projection(
                spine.xy(),
                spine.plane(),
                spine.params.z_plus_minus,
                params.crop_half_size,
            );
            SpineTask::new(spine.clone(), tile)
        })
        .collect()
}

/// Analyse the spines of one segment; results come back in task order.
pub fn analyze_segment<E: Executor>(
    executor: &E,
    segment: &SegmentPoints,
    tasks: Vec<SpineTask>,
    params: &AnalysisParams,
) -> Vec<SpineAnalysisResult> {
    executor.map(tasks, |task| analyze_spine(&task, segment, params))
}

/// Sequential variant of [`analyze_segment`] that reports each result as soon
/// as it is computed.
pub fn analyze_segment_streaming<C>(
    segment: &SegmentPoints,
    tasks: Vec<SpineTask>,
    params: &AnalysisParams,
    on_result: C,
) -> Vec<SpineAnalysisResult>
where
    C: FnMut(&SpineAnalysisResult),
{
    SequentialExecutor.map_streaming(tasks, |task| analyze_spine(&task, segment, params), on_result)
}

/// Analyse every spine against its segment in `segments`.
///
/// A spine whose segment is missing is analysed against an empty point list
/// and therefore aborts with `EmptySegment`; it never affects other spines.
pub fn analyze_stack<E: Executor>(
    executor: &E,
    stack: &ImageStack,
    segments: &[SegmentPoints],
    spines: &[SpineRecord],
    params: &AnalysisParams,
) -> BatchReport {
    let start = Instant::now();
    let mut timing = TimingBreakdown::default();
    let mut by_id: BTreeMap<SegmentId, &SegmentPoints> = BTreeMap::new();
    for seg in segments {
        by_id.entry(seg.id).or_insert(seg);
    }

    let mut slots: Vec<Option<SpineAnalysisResult>> = vec![None; spines.len()];
    for (segment_id, positions) in group_by_segment(spines) {
        let missing;
        let segment = match by_id.get(&segment_id) {
            Some(seg) => *seg,
            None => {
                warn!(
                    "segment {segment_id} not found; {} spine(s) will abort",
                    positions.len()
                );
                missing = SegmentPoints::new(segment_id, Vec::new());
                &missing
            }
        };
        let tasks = timing.measure(format!("prepare segment {segment_id}"), positions.len(), || {
            prepare_tasks(stack, positions.iter().map(|&i| &spines[i]), params)
        });
        let results = timing.measure(format!("analyze segment {segment_id}"), positions.len(), || {
            analyze_segment(executor, segment, tasks, params)
        });
        for (pos, result) in positions.into_iter().zip(results) {
            slots[pos] = Some(result);
        }
    }

    let results: Vec<SpineAnalysisResult> = slots.into_iter().flatten().collect();
    let aborted = results.iter().filter(|r| !r.is_done()).count();
    let degraded = results.iter().filter(|r| r.background_degraded).count();
    timing.total_ms = elapsed_ms(start);
    debug!(
        "batch: {} spine(s), {aborted} aborted, {degraded} degraded, {:.2} ms",
        results.len(),
        timing.total_ms
    );
    BatchReport {
        results,
        timing,
        aborted,
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_keeps_input_positions() {
        let spines = vec![
            SpineRecord::new(0, 2, 0.0, 0.0, 0.0),
            SpineRecord::new(1, 1, 0.0, 0.0, 0.0),
            SpineRecord::new(2, 2, 0.0, 0.0, 0.0),
        ];
        let groups = group_by_segment(&spines);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(groups[&2], vec![0, 2]);
        assert_eq!(groups[&1], vec![1]);
    }

    #[test]
    fn tasks_are_cropped_around_each_spine() {
        let stack = ImageStack::single(crate::image::ImageF32::new(100, 80));
        let spines = vec![SpineRecord::new(0, 0, 50.0, 40.0, 0.0)];
        let params = AnalysisParams {
            crop_half_size: 10,
            ..Default::default()
        };
        let tasks = prepare_tasks(&stack, &spines, &params);
        assert_eq!(tasks.len(), 1);
        assert_eq!((tasks[0].tile.origin_x, tasks[0].tile.origin_y), (40, 30));
        assert_eq!(tasks[0].tile.width(), 21);
    }
}
