//! Raster buffers and the image codec boundary
//!
//! Decoding and encoding are delegated to the `image` crate. Everything
//! past this module works on owned RGBA8 buffers.

use crate::layout::FitResult;
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A decoded, read-only RGBA8 raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Wrap a raw RGBA8 buffer
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or_else(|| {
                MosaicError::InvalidInput(format!(
                    "pixel buffer of {} bytes does not match {}x{} RGBA ({} bytes)",
                    actual, width, height, expected
                ))
            })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Short human-readable size summary
    pub fn describe(&self) -> String {
        format!("Original size: {} × {} pixels", self.width(), self.height())
    }
}

/// Allocate a `width` x `height` raster filled with `fill`.
///
/// Uses a fallible reservation so an oversized request surfaces as a
/// `Resource` error instead of aborting the process.
pub fn allocate(width: u32, height: u32, fill: Rgba<u8>, stage: Stage) -> Result<RgbaImage> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| {
            MosaicError::resource(stage, format!("raster size {}x{} overflows", width, height))
        })?;

    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        MosaicError::resource(
            stage,
            format!("cannot allocate {}x{} raster: {}", width, height, e),
        )
    })?;
    buffer.resize(len, 0);
    for pixel in buffer.chunks_exact_mut(4) {
        pixel.copy_from_slice(&fill.0);
    }

    RgbaImage::from_raw(width, height, buffer).ok_or_else(|| {
        MosaicError::resource(stage, format!("invalid raster size {}x{}", width, height))
    })
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode encoded image bytes.
///
/// The declared MIME type must start with `image/`; anything else is
/// rejected before the decoder runs.
pub fn decode_image(bytes: &[u8], mime: &str) -> Result<RasterImage> {
    if !mime.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(MosaicError::InvalidInput(format!(
            "Please upload an image file (got {:?})",
            mime
        )));
    }
    if bytes.is_empty() {
        return Err(MosaicError::InvalidInput("image file is empty".to_string()));
    }

    let decoded = image::load_from_memory(bytes).map_err(MosaicError::Decode)?;
    let raster = RasterImage::new(decoded.into_rgba8());
    log::info!("Decoded {} image: {}", mime, raster.describe());
    Ok(raster)
}

/// Guess the MIME type of a file from its extension
pub fn mime_from_path(path: impl AsRef<Path>) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Load and decode an image file
pub async fn load_image(path: impl AsRef<Path>) -> Result<RasterImage> {
    let path = path.as_ref().to_owned();
    let mime = mime_from_path(&path).ok_or_else(|| {
        MosaicError::InvalidInput(format!(
            "{} is not a recognized image file",
            path.display()
        ))
    })?;

    let bytes = tokio::fs::read(&path).await?;
    let raster = tokio::task::spawn_blocking(move || decode_image(&bytes, mime)).await??;
    Ok(raster)
}

// =============================================================================
// Placement
// =============================================================================

/// Render the source onto a white `output_w` x `output_h` canvas at the
/// fitted position. Transparent source pixels are flattened onto white.
pub fn compose_placed(
    source: &RasterImage,
    fit: &FitResult,
    output_w: u32,
    output_h: u32,
) -> Result<RasterImage> {
    let mut canvas = allocate(output_w, output_h, WHITE, Stage::Fit)?;
    let rect = fit.pixel_rect(output_w, output_h);

    if !rect.is_empty() {
        if rect.width == source.width() && rect.height == source.height() {
            imageops::overlay(&mut canvas, source.as_rgba(), rect.x.into(), rect.y.into());
        } else {
            let scaled = imageops::resize(
                source.as_rgba(),
                rect.width,
                rect.height,
                FilterType::Triangle,
            );
            imageops::overlay(&mut canvas, &scaled, rect.x.into(), rect.y.into());
        }
    }

    log::debug!(
        "Placed {}x{} source at ({}, {}) size {}x{} on {}x{} canvas",
        source.width(),
        source.height(),
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        output_w,
        output_h
    );

    Ok(RasterImage::new(canvas))
}
