//! Grid layout calculation
//!
//! This module splits the output canvas into page-sized tiles. Consecutive
//! tiles start one stride apart, where the stride is the printable size
//! minus the overlap, so neighbours share an `overlap_px` wide strip.

use crate::types::{MosaicError, Result, Stage};

use super::{TileDescriptor, TileGrid};

// =============================================================================
// Grid Creation
// =============================================================================

/// Horizontal and vertical overlap strides; both must be positive
pub fn strides(printable_w: u32, printable_h: u32, overlap_px: u32) -> Result<(u32, u32)> {
    let positive = |printable: u32| printable.checked_sub(overlap_px).filter(|s| *s > 0);
    match (positive(printable_w), positive(printable_h)) {
        (Some(stride_x), Some(stride_y)) => Ok((stride_x, stride_y)),
        _ => Err(MosaicError::config(
            Stage::Plan,
            format!(
                "overlap exceeds printable area (printable {}x{}px, overlap {}px)",
                printable_w, printable_h, overlap_px
            ),
        )),
    }
}

/// Plan the tile grid for an output canvas.
///
/// # Arguments
/// * `output_w` - Output canvas width in pixels
/// * `output_h` - Output canvas height in pixels
/// * `printable_w` - Printable width of one page in pixels
/// * `printable_h` - Printable height of one page in pixels
/// * `overlap_px` - Overlap between neighbouring tiles in pixels
///
/// # Returns
/// A `TileGrid` whose candidates are in row-major order. Edge tiles are
/// clipped to the canvas and may be smaller than the printable area.
pub fn plan(
    output_w: u32,
    output_h: u32,
    printable_w: u32,
    printable_h: u32,
    overlap_px: u32,
) -> Result<TileGrid> {
    let (stride_x, stride_y) = strides(printable_w, printable_h, overlap_px)?;

    let cols = output_w.div_ceil(stride_x) as usize;
    let rows = output_h.div_ceil(stride_y) as usize;

    let mut candidates = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let source_y = row as u32 * stride_y;
        let height = printable_h.min(output_h - source_y);

        for col in 0..cols {
            let source_x = col as u32 * stride_x;
            let width = printable_w.min(output_w - source_x);

            candidates.push(TileDescriptor {
                row: row + 1,
                col: col + 1,
                source_x_px: source_x,
                source_y_px: source_y,
                width_px: width,
                height_px: height,
            });
        }
    }

    log::debug!(
        "Planned {}x{} grid ({} tiles) for {}x{}px output, stride {}x{}px",
        rows,
        cols,
        candidates.len(),
        output_w,
        output_h,
        stride_x,
        stride_y
    );

    Ok(TileGrid {
        rows,
        cols,
        stride_x_px: stride_x,
        stride_y_px: stride_y,
        candidates,
    })
}

// =============================================================================
// Tests
// =============================================================================
