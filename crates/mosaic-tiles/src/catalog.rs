//! Output catalog of rendered pages
//!
//! A catalog is assembled once per generation run by a `CatalogBuilder`
//! and is read-only afterwards. Callers replace the whole catalog on the
//! next run rather than editing it.

use crate::constants::{THUMBNAIL_HEIGHT_PX, THUMBNAIL_WIDTH_PX};
use crate::layout::TileDescriptor;
use crate::render::TileLabel;
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// File name for the page at `row`, `col` (both 1-based)
pub fn segment_filename(prefix: &str, row: usize, col: usize) -> String {
    format!("{}_{}-{}.png", prefix, row, col)
}

/// One rendered page
#[derive(Debug, Clone)]
pub struct Segment {
    pub tile: TileDescriptor,
    pub page: RgbaImage,
    pub filename: String,
    pub label: TileLabel,
}

impl Segment {
    pub fn row(&self) -> usize {
        self.tile.row
    }

    pub fn col(&self) -> usize {
        self.tile.col
    }

    /// Encode the page as PNG
    pub fn encode_png(&self) -> std::result::Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        self.page
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Downscaled preview that fits in `max_w` x `max_h`, keeping the page aspect
    pub fn thumbnail(&self, max_w: u32, max_h: u32) -> RgbaImage {
        let (w, h) = self.page.dimensions();
        if w == 0 || h == 0 {
            return RgbaImage::new(0, 0);
        }
        let scale = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
        let thumb_w = ((f64::from(w) * scale).round() as u32).max(1);
        let thumb_h = ((f64::from(h) * scale).round() as u32).max(1);
        imageops::resize(&self.page, thumb_w, thumb_h, FilterType::Triangle)
    }

    /// Thumbnail at the default preview size
    pub fn default_thumbnail(&self) -> RgbaImage {
        self.thumbnail(THUMBNAIL_WIDTH_PX, THUMBNAIL_HEIGHT_PX)
    }
}

/// Ordered, immutable set of pages from one generation run
#[derive(Debug, Clone, Default)]
pub struct OutputCatalog {
    prefix: String,
    rows: usize,
    cols: usize,
    segments: Vec<Arc<Segment>>,
}

impl OutputCatalog {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Grid size the pages were cut from
    pub fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pages in row-major order
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Segment>> {
        self.segments.iter()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Arc<Segment>> {
        self.segments
            .iter()
            .find(|segment| segment.row() == row && segment.col() == col)
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.segments
            .iter()
            .map(|segment| segment.filename.as_str())
            .collect()
    }
}

/// Accumulates pages during a generation run
#[derive(Debug)]
pub struct CatalogBuilder {
    prefix: String,
    rows: usize,
    cols: usize,
    segments: Vec<Arc<Segment>>,
}

impl CatalogBuilder {
    pub fn new(prefix: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            prefix: prefix.into(),
            rows,
            cols,
            segments: Vec::new(),
        }
    }

    /// Add the next page; pages must arrive in row-major order
    pub fn push(&mut self, tile: TileDescriptor, page: RgbaImage, label: TileLabel) -> Result<()> {
        if let Some(last) = self.segments.last() {
            if (tile.row, tile.col) <= (last.row(), last.col()) {
                return Err(MosaicError::resource(
                    Stage::Catalog,
                    format!(
                        "segment {}-{} arrived after {}-{}",
                        tile.row,
                        tile.col,
                        last.row(),
                        last.col()
                    ),
                ));
            }
        }

        let filename = segment_filename(&self.prefix, tile.row, tile.col);
        self.segments.push(Arc::new(Segment {
            tile,
            page,
            filename,
            label,
        }));
        Ok(())
    }

    /// Freeze the catalog
    pub fn finish(self) -> OutputCatalog {
        OutputCatalog {
            prefix: self.prefix,
            rows: self.rows,
            cols: self.cols,
            segments: self.segments,
        }
    }
}
