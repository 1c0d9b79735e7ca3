//! Layout data types for tiling
//!
//! These types carry the intermediate results between fitting,
//! grid planning and raster compositing. All coordinates are in
//! output-canvas pixels with the origin at the top-left.

/// Placement of the source image inside the output canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub scaled_width_px: f64,
    pub scaled_height_px: f64,
    pub offset_x_px: f64,
    pub offset_y_px: f64,
}

impl FitResult {
    /// Right edge (exclusive)
    pub fn right(&self) -> f64 {
        self.offset_x_px + self.scaled_width_px
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f64 {
        self.offset_y_px + self.scaled_height_px
    }

    /// Whether the image covers the whole `width` x `height` canvas
    pub fn is_flush(&self, width: f64, height: f64) -> bool {
        self.offset_x_px == 0.0
            && self.offset_y_px == 0.0
            && self.scaled_width_px == width
            && self.scaled_height_px == height
    }

    /// Whole-pixel rectangle for rasterizing, clamped to the canvas
    pub fn pixel_rect(&self, canvas_width: u32, canvas_height: u32) -> PixelRect {
        let x = (self.offset_x_px.round().max(0.0) as u32).min(canvas_width);
        let y = (self.offset_y_px.round().max(0.0) as u32).min(canvas_height);
        let width = (self.scaled_width_px.round().max(0.0) as u32).min(canvas_width - x);
        let height = (self.scaled_height_px.round().max(0.0) as u32).min(canvas_height - y);
        PixelRect::new(x, y, width, height)
    }
}

/// An integer pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether this rectangle lies entirely inside a `width` x `height` area
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// One cell of the tile grid
///
/// `row` and `col` are 1-based, matching the labels printed on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDescriptor {
    pub row: usize,
    pub col: usize,
    pub source_x_px: u32,
    pub source_y_px: u32,
    pub width_px: u32,
    pub height_px: u32,
}

impl TileDescriptor {
    /// The region of the output canvas this tile prints
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(
            self.source_x_px,
            self.source_y_px,
            self.width_px,
            self.height_px,
        )
    }
}

/// Result of grid planning
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub rows: usize,
    pub cols: usize,
    pub stride_x_px: u32,
    pub stride_y_px: u32,
    /// Row-major candidate tiles
    pub candidates: Vec<TileDescriptor>,
}

impl TileGrid {
    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&TileDescriptor> {
        self.candidates
            .iter()
            .find(|tile| tile.row == row && tile.col == col)
    }
}
