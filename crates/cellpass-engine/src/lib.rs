//! cellpass engine crate.
//!
//! Acquires a GPU device, uploads a fixed quad, builds one render pipeline and
//! submits a single frame that clears the host surface and draws the quad.

pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod surface;

mod core;

pub use crate::core::{render_once, CellQuad};
pub use error::{RenderError, Result};
