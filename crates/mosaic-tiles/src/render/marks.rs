//! Registration marks for manual reassembly
//!
//! Every page carries a crosshair-plus-circle at each corner, inset from
//! the paper edge by the margin plus the mark offset. Lining up the marks
//! of neighbouring pages aligns their overlapping strips.

use crate::constants::MARK_STROKE_WIDTH_PX;
use crate::raster::BLACK;

use super::surface::{Stroke, Surface};

/// Corner of the page a mark sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Mark centers for a `page_w` x `page_h` page, in `Corner` order
pub fn registration_points(page_w: u32, page_h: u32, inset: u32) -> [(Corner, f64, f64); 4] {
    let inset = f64::from(inset);
    let right = f64::from(page_w) - inset;
    let bottom = f64::from(page_h) - inset;
    [
        (Corner::TopLeft, inset, inset),
        (Corner::TopRight, right, inset),
        (Corner::BottomLeft, inset, bottom),
        (Corner::BottomRight, right, bottom),
    ]
}

/// Draw one mark centered on `(x, y)`: a `size` long crosshair and a circle
/// of radius `size / 3`.
pub fn draw_registration_mark<S: Surface + ?Sized>(surface: &mut S, x: f64, y: f64, size: f64) {
    let stroke = Stroke {
        width: MARK_STROKE_WIDTH_PX,
        color: BLACK,
    };
    let half = size / 2.0;

    surface.stroke_line((x - half, y), (x + half, y), stroke);
    surface.stroke_line((x, y - half), (x, y + half), stroke);
    surface.stroke_circle((x, y), size / 3.0, stroke);
}

/// Draw all four corner marks
pub fn draw_registration_marks<S: Surface + ?Sized>(surface: &mut S, inset: u32, size: u32) {
    let (w, h) = surface.size();
    for (_, x, y) in registration_points(w, h, inset) {
        draw_registration_mark(surface, x, y, f64::from(size));
    }
}
