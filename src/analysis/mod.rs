//! Per-spine analysis pipeline and its batch drivers.
//!
//! [`analyze_spine`] runs one spine through connection search, ROI
//! construction, background placement and aggregation. Failures never
//! propagate past the spine: they become [`AnalysisStatus::Aborted`] results
//! tagged with the failing [`SpineStage`]. The batch helpers fan tasks out
//! through an [`Executor`]; sequential and pooled execution give identical
//! results.

pub mod batch;
pub mod executor;
pub mod params;
pub mod pipeline;
pub mod result;

pub use batch::{
    analyze_segment, analyze_segment_streaming, analyze_stack, group_by_segment, prepare_tasks,
    BatchReport,
};
pub use executor::{
    default_pool_size, AnyExecutor, Executor, ParallelOptions, PoolExecutor, SequentialExecutor,
};
pub use params::{AnalysisParams, SpineParams};
pub use pipeline::{analyze_spine, SpineTask};
pub use result::{AnalysisStatus, SpineAnalysisResult, SpineStage};
