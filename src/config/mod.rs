//! JSON configuration for the `spine_demo` tool.
use crate::analysis::AnalysisParams;
use crate::types::{SegmentPoints, SpineRecord};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Image planes in z order; one entry analyses a single 2D image.
    pub input: Vec<PathBuf>,
    pub segments: Vec<SegmentPoints>,
    pub spines: Vec<SpineRecord>,
    #[serde(default)]
    pub params: AnalysisParams,
    /// Run spines on the worker pool; defaults to the `parallel` feature.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub result_json: PathBuf,
    /// When set, the spine ROI of every finished spine is written here as a PNG mask.
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
}

fn default_parallel() -> bool {
    cfg!(feature = "parallel")
}

pub fn load_config(path: &Path) -> Result<AnalysisConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<AnalysisConfig, serde_json::Error> {
    serde_json::from_str(data)
}
