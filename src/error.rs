//! Error types shared by the per-spine pipeline.
//!
//! Every failure is recovered at single-spine granularity: the orchestrator
//! turns an [`AnalysisError`] into an aborted result and moves on.
use serde::Serialize;

/// Failures of the geometric primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometryError {
    /// The segment has no points.
    EmptySegment,
    /// Two points that should define a direction coincide.
    ZeroLengthDirection,
    /// Too few interior segment points around the connection to form a band.
    EmptyBand { line_index: usize, interior: usize },
    /// The seed pixel does not belong to any foreground component.
    SeedOutsideMask { x: i64, y: i64 },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::EmptySegment => write!(f, "segment has no points"),
            GeometryError::ZeroLengthDirection => {
                write!(f, "direction undefined for coincident points")
            }
            GeometryError::EmptyBand {
                line_index,
                interior,
            } => write!(
                f,
                "empty band at line index {line_index} ({interior} interior points, need ≥2)"
            ),
            GeometryError::SeedOutsideMask { x, y } => {
                write!(f, "seed ({x}, {y}) is outside the mask")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Statistics requested over a mask that selects no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationError {
    EmptyMask,
}

impl std::fmt::Display for AggregationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationError::EmptyMask => write!(f, "mask selects no pixels"),
        }
    }
}

impl std::error::Error for AggregationError {}

/// Any reason a single spine's analysis was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisError {
    Geometry(GeometryError),
    /// A connection index that does not address a point of the segment.
    IndexOutOfRange {
        index: usize,
        segment_id: usize,
        len: usize,
    },
    Aggregation(AggregationError),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Geometry(e) => write!(f, "geometry: {e}"),
            AnalysisError::IndexOutOfRange {
                index,
                segment_id,
                len,
            } => write!(
                f,
                "index {index} out of range for segment {segment_id} ({len} points)"
            ),
            AnalysisError::Aggregation(e) => write!(f, "aggregation: {e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Geometry(e) => Some(e),
            AnalysisError::Aggregation(e) => Some(e),
            AnalysisError::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<GeometryError> for AnalysisError {
    fn from(e: GeometryError) -> Self {
        AnalysisError::Geometry(e)
    }
}

impl From<AggregationError> for AnalysisError {
    fn from(e: AggregationError) -> Self {
        AnalysisError::Aggregation(e)
    }
}
