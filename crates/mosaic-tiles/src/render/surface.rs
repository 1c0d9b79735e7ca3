//! Raster drawing capability
//!
//! The compositor only talks to a `Surface`, so it does not depend on how
//! pixels are stored. `PageCanvas` is the in-memory implementation.

use crate::layout::PixelRect;
use crate::types::Result;
use ab_glyph::{FontRef, PxScale};
use image::{GenericImageView, Rgba, RgbaImage, imageops};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;

use super::font::label_font;

/// Line style for strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgba<u8>,
}

/// Text style for labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel height of a line (ascent to descent)
    pub size_px: f32,
    pub color: Rgba<u8>,
}

/// Minimal set of drawing operations needed to compose a page
pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Paint every pixel
    fn fill(&mut self, color: Rgba<u8>);

    /// Pixel-exact copy of `src` from `source` with its top-left at `(dest_x, dest_y)`
    fn blit(&mut self, source: &RgbaImage, src: PixelRect, dest_x: u32, dest_y: u32);

    /// Straight segment with butt caps
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke);

    fn stroke_circle(&mut self, center: (f64, f64), radius: f64, stroke: Stroke);

    /// Draw one line of `text` with the top of its line box at `(x, y)`
    fn draw_text(&mut self, x: i64, y: i64, text: &str, style: TextStyle);
}

/// In-memory page backed by an RGBA8 buffer
#[derive(Clone)]
pub struct PageCanvas {
    pixels: RgbaImage,
    font: &'static FontRef<'static>,
}

impl PageCanvas {
    pub fn new(pixels: RgbaImage) -> Result<Self> {
        Ok(Self {
            pixels,
            font: label_font()?,
        })
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    fn fill_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: Rgba<u8>) {
        let (left, top) = (left.round(), top.round());
        let width = (right.round() - left).max(1.0);
        let height = (bottom.round() - top).max(1.0);
        let rect = Rect::at(left as i32, top as i32).of_size(width as u32, height as u32);
        draw_filled_rect_mut(&mut self.pixels, rect, color);
    }
}

impl Surface for PageCanvas {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    fn blit(&mut self, source: &RgbaImage, src: PixelRect, dest_x: u32, dest_y: u32) {
        let width = src.width.min(source.width().saturating_sub(src.x));
        let height = src.height.min(source.height().saturating_sub(src.y));
        if width == 0 || height == 0 {
            return;
        }
        let view = source.view(src.x, src.y, width, height);
        imageops::replace(
            &mut self.pixels,
            &*view,
            i64::from(dest_x),
            i64::from(dest_y),
        );
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        let half = stroke.width / 2.0;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        if length == 0.0 {
            return;
        }

        // Axis-aligned strokes are exact rectangles
        if dy == 0.0 {
            let y = from.1;
            self.fill_rect(from.0.min(to.0), y - half, from.0.max(to.0), y + half, stroke.color);
            return;
        }
        if dx == 0.0 {
            let x = from.0;
            self.fill_rect(x - half, from.1.min(to.1), x + half, from.1.max(to.1), stroke.color);
            return;
        }

        // One hairline per pixel of width, offset along the normal
        let (nx, ny) = (-dy / length, dx / length);
        let passes = stroke.width.ceil().max(1.0) as u32;
        for pass in 0..passes {
            let offset = f64::from(pass) - f64::from(passes - 1) / 2.0;
            let start = ((from.0 + nx * offset) as f32, (from.1 + ny * offset) as f32);
            let end = ((to.0 + nx * offset) as f32, (to.1 + ny * offset) as f32);
            draw_line_segment_mut(&mut self.pixels, start, end, stroke.color);
        }
    }

    fn stroke_circle(&mut self, center: (f64, f64), radius: f64, stroke: Stroke) {
        let half = stroke.width / 2.0;
        let inner = (radius - half).round().max(0.0) as i32;
        let outer = ((radius + half).round() as i32).max(inner + 1);
        let center = (center.0.round() as i32, center.1.round() as i32);
        for r in inner..outer {
            draw_hollow_circle_mut(&mut self.pixels, center, r, stroke.color);
        }
    }

    fn draw_text(&mut self, x: i64, y: i64, text: &str, style: TextStyle) {
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return;
        };
        draw_text_mut(
            &mut self.pixels,
            style.color,
            x,
            y,
            PxScale::from(style.size_px),
            self.font,
            text,
        );
    }
}
