//! Layout calculation modules for tiling
//!
//! This module handles all the geometric calculations ahead of rendering:
//! - Placement of the source image on the output canvas
//! - Grid planning (tile rectangles with overlap strides)
//! - Elimination of tiles that would print nothing but background

mod grid;
mod placement;
mod types;
mod visibility;

pub use grid::*;
pub use placement::*;
pub use types::*;
pub use visibility::*;
