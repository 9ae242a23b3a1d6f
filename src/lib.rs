#![doc = include_str!("../README.md")]

// Public modules
pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Building blocks of the per-spine pipeline, usable on their own.
pub mod background;
pub mod connection;
pub mod geometry;
pub mod intensity;
pub mod roi;

// --- High-level re-exports -------------------------------------------------

pub use crate::analysis::{
    analyze_spine, analyze_stack, AnalysisParams, AnalysisStatus, BatchReport, Executor,
    PoolExecutor, SequentialExecutor, SpineAnalysisResult, SpineParams, SpineStage, SpineTask,
};
pub use crate::error::{AggregationError, AnalysisError, GeometryError};
pub use crate::intensity::{IntensityStats, RoiKind};
pub use crate::types::{ConnectionSide, SegmentPoints, SpineRecord};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use spine_roi::prelude::*;
///
/// # fn main() {
/// let plane = ImageF32::new(128, 128);
/// let stack = ImageStack::single(plane);
/// let xyz: Vec<_> = (0..128).map(|i| (i as f32, 64.0, 0.0)).collect();
/// let segment = SegmentPoints::from_xyz(0, &xyz);
/// let spines = vec![SpineRecord::new(0, 0, 60.0, 50.0, 0.0)];
///
/// let report = analyze_stack(
///     &SequentialExecutor,
///     &stack,
///     &[segment],
///     &spines,
///     &AnalysisParams::default(),
/// );
/// println!("aborted={} total_ms={:.3}", report.aborted, report.timing.total_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageStack, ImageTile};
    pub use crate::{
        analyze_spine, analyze_stack, AnalysisParams, SegmentPoints, SequentialExecutor,
        SpineAnalysisResult, SpineRecord, SpineTask,
    };
}
