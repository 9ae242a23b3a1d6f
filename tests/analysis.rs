mod common;

use common::synthetic_image::{dendrite_with_spines, horizontal_tracing};
use spine_roi::analysis::{
    analyze_segment_streaming, analyze_stack, prepare_tasks, AnalysisParams, AnalysisStatus,
    ParallelOptions, PoolExecutor, SequentialExecutor, SpineStage,
};
use spine_roi::geometry::rasterize;
use spine_roi::image::{ImageF32, ImageStack};
use spine_roi::{AnalysisError, ConnectionSide, GeometryError, SegmentPoints, SpineRecord};

const W: usize = 120;
const H: usize = 80;
const DENDRITE_Y: usize = 40;

fn plane() -> ImageF32 {
    let data = dendrite_with_spines(W, H, DENDRITE_Y, &[(40, 20), (80, 60)]);
    ImageF32::from_vec(W, H, data).expect("buffer matches size")
}

fn segment(id: usize) -> SegmentPoints {
    SegmentPoints::from_xyz(id, &horizontal_tracing(W, DENDRITE_Y as f32, 0.0))
}

fn spines() -> Vec<SpineRecord> {
    vec![
        SpineRecord::new(0, 1, 40.0, 20.0, 0.0),
        SpineRecord::new(1, 1, 80.0, 60.0, 0.0),
    ]
}

#[test]
fn synthetic_spines_get_connection_side_and_contrast() {
    let _ = env_logger::builder().is_test(true).try_init();
    let stack = ImageStack::single(plane());
    let report = analyze_stack(
        &SequentialExecutor,
        &stack,
        &[segment(1)],
        &spines(),
        &AnalysisParams::default(),
    );
    assert_eq!(report.aborted, 0, "results: {:?}", report.results);
    let above = &report.results[0];
    let below = &report.results[1];

    assert_eq!(above.brightest_index, Some(40));
    assert_eq!(below.brightest_index, Some(80));
    assert!(above.brightest_computed && below.brightest_computed);
    assert_eq!(above.connection_side, Some(ConnectionSide::Right));
    assert_eq!(below.connection_side, Some(ConnectionSide::Left));

    for r in &report.results {
        let s = r.spine_stats.expect("spine stats");
        let sb = r.spine_background_stats.expect("spine background stats");
        let seg = r.segment_stats.expect("segment stats");
        let segb = r.segment_background_stats.expect("segment background stats");
        assert!(s.mean > sb.mean, "spine {}: {} <= {}", r.spine_id, s.mean, sb.mean);
        assert!(seg.mean >= segb.mean);
        assert!(s.min <= s.mean && s.mean <= s.max);
        assert_eq!(r.columns(1).len(), 20);
    }
}

#[test]
fn background_rois_do_not_overlap_foreground() {
    let stack = ImageStack::single(plane());
    let report = analyze_stack(
        &SequentialExecutor,
        &stack,
        &[segment(1)],
        &spines(),
        &AnalysisParams::default(),
    );
    for r in &report.results {
        if r.background_degraded && r.background_offset == Some((0, 0)) {
            continue;
        }
        let fg = rasterize(r.spine_roi_polygon.as_ref().unwrap(), W, H)
            .union(&rasterize(r.segment_roi_polygon.as_ref().unwrap(), W, H));
        let bg = rasterize(r.spine_background_polygon.as_ref().unwrap(), W, H)
            .union(&rasterize(r.segment_background_polygon.as_ref().unwrap(), W, H));
        assert!(bg.count() > 0);
        assert!(!fg.intersects(&bg), "spine {} background overlaps", r.spine_id);
    }
}

#[test]
fn pooled_and_sequential_results_match() {
    let stack = ImageStack::single(plane());
    let mut many = Vec::new();
    for i in 0..12 {
        let (x, y) = if i % 2 == 0 { (40.0, 20.0) } else { (80.0, 60.0) };
        many.push(SpineRecord::new(i, 1, x, y, 0.0));
    }
    let params = AnalysisParams::default();
    let seq = analyze_stack(&SequentialExecutor, &stack, &[segment(1)], &many, &params);
    let pool = PoolExecutor::new(3, ParallelOptions::new(true, 1)).unwrap();
    let par = analyze_stack(&pool, &stack, &[segment(1)], &many, &params);
    assert_eq!(seq.results, par.results);
    assert_eq!(seq.aborted, par.aborted);
}

#[test]
fn failing_spine_does_not_affect_siblings() {
    let stack = ImageStack::single(plane());
    let params = AnalysisParams::default();
    let alone = analyze_stack(&SequentialExecutor, &stack, &[segment(1)], &spines()[..1], &params);

    let mut bad = SpineRecord::new(9, 1, 80.0, 60.0, 0.0);
    bad.brightest_index = Some(10_000);
    let mixed_spines = vec![bad, spines()[0].clone()];
    let mixed = analyze_stack(&SequentialExecutor, &stack, &[segment(1)], &mixed_spines, &params);

    assert_eq!(mixed.aborted, 1);
    assert_eq!(
        mixed.results[0].status,
        AnalysisStatus::Aborted {
            stage: SpineStage::LocateConnection,
            error: AnalysisError::IndexOutOfRange {
                index: 10_000,
                segment_id: 1,
                len: W,
            },
        }
    );
    assert_eq!(mixed.results[1], alone.results[0]);
}

#[test]
fn missing_segment_aborts_only_its_spines() {
    let stack = ImageStack::single(plane());
    let mut list = spines();
    list.insert(1, SpineRecord::new(5, 77, 40.0, 20.0, 0.0));
    let report = analyze_stack(
        &SequentialExecutor,
        &stack,
        &[segment(1)],
        &list,
        &AnalysisParams::default(),
    );
    let ids: Vec<_> = report.results.iter().map(|r| r.spine_id).collect();
    assert_eq!(ids, vec![0, 5, 1]);
    assert_eq!(report.aborted, 1);
    assert_eq!(
        report.results[1].status,
        AnalysisStatus::Aborted {
            stage: SpineStage::LocateConnection,
            error: AnalysisError::Geometry(GeometryError::EmptySegment),
        }
    );
    assert!(report.results[0].is_done() && report.results[2].is_done());
}

#[test]
fn projection_window_follows_spine_plane() {
    let empty = ImageF32::new(W, H);
    let stack = ImageStack::new(vec![empty.clone(), empty, plane()]).unwrap();
    let mut on_signal = SpineRecord::new(0, 1, 40.0, 20.0, 2.0);
    on_signal.params.z_plus_minus = 0;
    let mut off_signal = SpineRecord::new(1, 1, 40.0, 20.0, 0.0);
    off_signal.params.z_plus_minus = 0;

    let report = analyze_stack(
        &SequentialExecutor,
        &stack,
        &[segment(1)],
        &[on_signal, off_signal],
        &AnalysisParams::default(),
    );
    let lit = report.results[0].spine_stats.unwrap();
    let dark = report.results[1].spine_stats.unwrap();
    assert!(lit.max > 0.9);
    assert_eq!(dark.max, 0.0);
}

#[test]
fn streaming_reports_every_spine_in_order() {
    let stack = ImageStack::single(plane());
    let params = AnalysisParams::default();
    let list = spines();
    let tasks = prepare_tasks(&stack, &list, &params);
    let mut seen = Vec::new();
    let results = analyze_segment_streaming(&segment(1), tasks, &params, |r| seen.push(r.spine_id));
    assert_eq!(seen, vec![0, 1]);
    assert!(results.iter().all(|r| r.is_done()));
}

#[test]
fn report_serializes_to_json() {
    let stack = ImageStack::single(plane());
    let report = analyze_stack(
        &SequentialExecutor,
        &stack,
        &[segment(1)],
        &spines(),
        &AnalysisParams::default(),
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["results"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(json["results"][0]["spineId"], 0);
    assert!(json["results"][0]["spineStats"]["mean"].is_number());
    assert!(json["timing"]["totalMs"].is_number());
}
