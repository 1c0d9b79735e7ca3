//! Empty tile elimination
//!
//! With letterbox fitting whole rows or columns of the grid can fall in the
//! padding. Those pages would print nothing but background and are dropped.

use super::{FitResult, TileDescriptor};

/// Whether the tile overlaps the placed image (half-open intervals)
pub fn intersects(tile: &TileDescriptor, fit: &FitResult) -> bool {
    let left = f64::from(tile.source_x_px);
    let top = f64::from(tile.source_y_px);
    let right = left + f64::from(tile.width_px);
    let bottom = top + f64::from(tile.height_px);

    left < fit.right() && fit.offset_x_px < right && top < fit.bottom() && fit.offset_y_px < bottom
}

/// Keep the candidates that intersect the placed image, preserving order
pub fn filter(candidates: &[TileDescriptor], fit: &FitResult) -> Vec<TileDescriptor> {
    let survivors: Vec<TileDescriptor> = candidates
        .iter()
        .filter(|tile| intersects(tile, fit))
        .copied()
        .collect();

    if survivors.len() < candidates.len() {
        log::debug!(
            "Dropped {} of {} tiles outside the placed image",
            candidates.len() - survivors.len(),
            candidates.len()
        );
    }

    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan;

    #[test]
    fn test_flush_placement_keeps_everything() {
        let grid = plan(7200, 5400, 2400, 3150, 75).unwrap();
        let fit = FitResult {
            scaled_width_px: 7200.0,
            scaled_height_px: 5400.0,
            offset_x_px: 0.0,
            offset_y_px: 0.0,
        };
        assert_eq!(filter(&grid.candidates, &fit), grid.candidates);
    }

    #[test]
    fn test_letterbox_drops_padding_column() {
        // Image occupies only the left 50px of a 200px wide canvas
        let grid = plan(200, 50, 60, 60, 10).unwrap();
        assert_eq!(grid.cols, 4);
        let fit = FitResult {
            scaled_width_px: 50.0,
            scaled_height_px: 50.0,
            offset_x_px: 0.0,
            offset_y_px: 0.0,
        };
        let survivors = filter(&grid.candidates, &fit);
        let cols: Vec<usize> = survivors.iter().map(|t| t.col).collect();
        assert_eq!(cols, vec![1]);
    }

    #[test]
    fn test_touching_edge_does_not_intersect() {
        let tile = TileDescriptor {
            row: 1,
            col: 2,
            source_x_px: 100,
            source_y_px: 0,
            width_px: 50,
            height_px: 50,
        };
        let fit = FitResult {
            scaled_width_px: 100.0,
            scaled_height_px: 50.0,
            offset_x_px: 0.0,
            offset_y_px: 0.0,
        };
        assert!(!intersects(&tile, &fit));
    }
}
