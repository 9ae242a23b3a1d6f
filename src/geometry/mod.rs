//! Geometry kernel for spine ROIs.
//!
//! - [`points`]: nearest segment point, direction and tangent offsets.
//! - [`polygon`]: the [`Polygon`] value plus rectangle/band outlines.
//! - [`mask`]: binary rasters, polygon fill and mask algebra.
//! - [`components`]: 8-connected labeling and boundary tracing.
//!
//! Everything here is pure and works in whatever coordinate frame the caller
//! supplies; the ROI builder shifts polygons into tile space before filling.

pub mod components;
pub mod mask;
pub mod points;
pub mod polygon;

pub use components::{
    label_components, select_connected_component, select_nearest_component, trace_boundary,
};
pub use mask::{rasterize, Mask};
pub use points::{closest_point_index, direction_offset, distance2d, radius_points, tangent_offset};
pub use polygon::{band_polygon, radius_lines, rectangle_polygon, Polygon};
