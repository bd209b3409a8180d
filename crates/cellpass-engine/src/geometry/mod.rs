//! Fixed cell geometry and its vertex layout.
//!
//! Positions are already in clip space; the vertex stage passes them through
//! with z = 0, w = 1.

mod color;
mod quad;
mod vertex;

pub use color::ColorRgba;
pub use quad::{bounds, cell_quad_bytes, quad, CELL_HALF_EXTENT, CELL_QUAD};
pub use vertex::{format_scalar_kind, CellVertex, ScalarKind, VertexLayout};
