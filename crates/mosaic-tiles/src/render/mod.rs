//! Page rendering for tiles
//!
//! This module handles all raster output:
//! - The `Surface` drawing capability and its in-memory `PageCanvas`
//! - Registration marks
//! - The embedded label font and label placement
//! - Composing a tile into a full paper-sized page

mod compositor;
mod font;
pub mod marks;
mod surface;

pub use compositor::{LabelLayout, TileLabel, composite_tile, render_tile};
pub use surface::{PageCanvas, Stroke, Surface, TextStyle};
