//! Placement of the source image on the output canvas
//!
//! Letterbox fitting keeps the source aspect ratio and leaves padding on
//! one axis; stretching fills the canvas and ignores the aspect ratio.

use crate::options::PlacementOptions;
use crate::types::{Anchor, MosaicError, Result, ScalingMode, Stage};

use super::FitResult;

// =============================================================================
// Fitting
// =============================================================================

/// Fit a `source_w` x `source_h` image inside a `target_w` x `target_h` canvas,
/// preserving its aspect ratio.
///
/// The image fills the canvas along the axis where it is relatively larger
/// and is positioned along the other axis according to `anchor`.
pub fn fit(
    source_w: u32,
    source_h: u32,
    target_w: f64,
    target_h: f64,
    anchor: Anchor,
) -> Result<FitResult> {
    check_target(target_w, target_h)?;
    if source_w == 0 || source_h == 0 {
        return Err(MosaicError::config(
            Stage::Fit,
            format!("source image has zero size ({}x{})", source_w, source_h),
        ));
    }

    let aspect_src = source_w as f64 / source_h as f64;
    let aspect_tgt = target_w / target_h;

    let (scaled_w, scaled_h) = if aspect_src > aspect_tgt {
        // Source relatively wider: full width, letterbox top and bottom
        (target_w, target_w / aspect_src)
    } else {
        (target_h * aspect_src, target_h)
    };

    let (offset_x, offset_y) = match anchor {
        Anchor::Center => ((target_w - scaled_w) / 2.0, (target_h - scaled_h) / 2.0),
        Anchor::TopLeft => (0.0, 0.0),
    };

    Ok(FitResult {
        scaled_width_px: scaled_w,
        scaled_height_px: scaled_h,
        offset_x_px: offset_x,
        offset_y_px: offset_y,
    })
}

/// Flush placement covering the whole canvas
pub fn stretch(target_w: f64, target_h: f64) -> Result<FitResult> {
    check_target(target_w, target_h)?;
    Ok(FitResult {
        scaled_width_px: target_w,
        scaled_height_px: target_h,
        offset_x_px: 0.0,
        offset_y_px: 0.0,
    })
}

/// Dispatch on the configured scaling mode
pub fn place(
    source_w: u32,
    source_h: u32,
    target_w: f64,
    target_h: f64,
    options: &PlacementOptions,
) -> Result<FitResult> {
    match options.scaling {
        ScalingMode::Fit => fit(source_w, source_h, target_w, target_h, options.anchor),
        ScalingMode::Stretch => {
            if source_w == 0 || source_h == 0 {
                return Err(MosaicError::config(
                    Stage::Fit,
                    format!("source image has zero size ({}x{})", source_w, source_h),
                ));
            }
            stretch(target_w, target_h)
        }
    }
}

fn check_target(target_w: f64, target_h: f64) -> Result<()> {
    // Negated comparison also rejects NaN
    if !(target_w > 0.0) || !(target_h > 0.0) {
        return Err(MosaicError::config(
            Stage::Fit,
            format!("target size must be positive (got {}x{})", target_w, target_h),
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
