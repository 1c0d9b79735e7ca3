//! Per-tile page compositing
//!
//! A page is produced in four steps: white background, the tile's crop of
//! the placed image at the margin origin, corner registration marks, and a
//! two-line label in the top margin beside the top-left mark. Each tile is independent of
//! every other tile, so pages can be rendered in any order or in parallel.

use crate::constants::{LABEL_FONT_PX, LABEL_LINE_HEIGHT, LABEL_PADDING_PX, MIN_LABEL_FONT_PX};
use crate::layout::TileDescriptor;
use crate::options::{OutputSpec, PagingProfile};
use crate::raster::{BLACK, RasterImage, WHITE, allocate};
use crate::types::{MosaicError, Result, Stage};
use image::RgbaImage;
use std::fmt;

use super::marks::draw_registration_marks;
use super::surface::{PageCanvas, Surface, TextStyle};

/// Text printed on each page to identify it during assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLabel {
    pub title: String,
    pub subtitle: String,
}

impl TileLabel {
    pub fn new(tile: &TileDescriptor, rows: usize, cols: usize, output: &OutputSpec) -> Self {
        Self {
            title: format!("Segment {}-{} ({}x{})", tile.row, tile.col, rows, cols),
            subtitle: format!(
                "{}\" x {}\" artwork",
                output.target_width_in, output.target_height_in
            ),
        }
    }

    pub fn lines(&self) -> [&str; 2] {
        [&self.title, &self.subtitle]
    }
}

impl fmt::Display for TileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.subtitle)
    }
}

/// Where the label goes on a page
///
/// Both lines sit in the band between the top paper edge and the content
/// origin, starting just right of the top-left mark, so the label never
/// covers artwork. The text shrinks to fit thin margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub x: i64,
    /// Top of each line box
    pub tops: [i64; 2],
    pub size_px: f32,
}

impl LabelLayout {
    /// `None` when the margin cannot hold a readable label
    pub fn for_profile(profile: &PagingProfile) -> Option<Self> {
        let margin = f64::from(profile.margin_px());
        let line_cap = (margin - 2.0 * LABEL_PADDING_PX) / 2.0;
        let requested = LABEL_FONT_PX * f64::from(profile.label_scale) * LABEL_LINE_HEIGHT;
        let line_height = requested.min(line_cap).floor();
        let size = line_height / LABEL_LINE_HEIGHT;
        if size < MIN_LABEL_FONT_PX {
            return None;
        }

        let first = margin - LABEL_PADDING_PX - 2.0 * line_height;
        let x = f64::from(profile.mark_inset_px())
            + f64::from(profile.mark_size_px) / 2.0
            + LABEL_PADDING_PX;

        Some(Self {
            x: x.round() as i64,
            tops: [first.floor() as i64, (first + line_height).floor() as i64],
            size_px: size as f32,
        })
    }
}

/// Compose one page onto any drawing surface.
///
/// The surface is expected to be paper-sized for `profile`. Fails without
/// drawing anything if the tile does not lie inside `placed`.
pub fn composite_tile<S: Surface + ?Sized>(
    surface: &mut S,
    tile: &TileDescriptor,
    placed: &RasterImage,
    profile: &PagingProfile,
    label: &TileLabel,
) -> Result<()> {
    let rect = tile.rect();
    if !rect.fits_within(placed.width(), placed.height()) {
        return Err(MosaicError::resource(
            Stage::Composite,
            format!(
                "tile {}-{} ({}x{} at {},{}) lies outside the {}x{} placed image",
                tile.row,
                tile.col,
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                placed.width(),
                placed.height()
            ),
        ));
    }

    // 1. Background
    surface.fill(WHITE);

    // 2. Content, pixel-exact at the margin origin
    let margin = profile.margin_px();
    surface.blit(placed.as_rgba(), rect, margin, margin);

    // 3. Registration marks
    let inset = profile.mark_inset_px();
    draw_registration_marks(surface, inset, profile.mark_size_px);

    // 4. Label in the top margin
    match LabelLayout::for_profile(profile) {
        Some(layout) => {
            let style = TextStyle {
                size_px: layout.size_px,
                color: BLACK,
            };
            for (line, top) in label.lines().into_iter().zip(layout.tops) {
                surface.draw_text(layout.x, top, line, style);
            }
        }
        None => log::debug!(
            "Margin of {}px too thin for label on tile {}-{}",
            margin,
            tile.row,
            tile.col
        ),
    }

    Ok(())
}

/// Render one tile to a new paper-sized raster
pub fn render_tile(
    tile: &TileDescriptor,
    placed: &RasterImage,
    profile: &PagingProfile,
    label: &TileLabel,
) -> Result<RgbaImage> {
    let (page_w, page_h) = profile.paper_px();
    let pixels = allocate(page_w, page_h, WHITE, Stage::Composite)?;
    let mut canvas = PageCanvas::new(pixels)?;
    composite_tile(&mut canvas, tile, placed, profile, label)?;
    Ok(canvas.into_pixels())
}
