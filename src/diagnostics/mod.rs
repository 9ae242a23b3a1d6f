//! Run diagnostics attached to batch reports.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
