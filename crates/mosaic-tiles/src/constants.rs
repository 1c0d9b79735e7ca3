//! Shared constants for tiling and compositing
//!
//! This module centralizes magic numbers used throughout the
//! layout and rendering stages.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

// =============================================================================
// Default Paging Profile (US Letter at print resolution)
// =============================================================================

pub const DEFAULT_PAPER_WIDTH_IN: f64 = 8.5;

pub const DEFAULT_PAPER_HEIGHT_IN: f64 = 11.0;

/// High enough for print quality
pub const DEFAULT_DPI: f64 = 300.0;

/// Margin from each paper edge, in inches
pub const DEFAULT_MARGIN_IN: f64 = 0.5;

/// Overlap between neighbouring tiles, in inches
pub const DEFAULT_OVERLAP_IN: f64 = 0.25;

// =============================================================================
// Output Size Bounds
// =============================================================================

pub const MIN_OUTPUT_IN: f64 = 1.0;

pub const MAX_OUTPUT_IN: f64 = 200.0;

pub const DEFAULT_OUTPUT_WIDTH_IN: f64 = 24.0;

pub const DEFAULT_OUTPUT_HEIGHT_IN: f64 = 18.0;

// =============================================================================
// Registration Marks
// =============================================================================

/// Crosshair length of a registration mark (pixels)
pub const REGISTRATION_MARK_SIZE_PX: u32 = 15;

/// Distance from the margin corner to the mark center (pixels)
pub const REGISTRATION_MARK_OFFSET_PX: u32 = 10;

/// Stroke width for crosshair and circle (pixels, independent of dpi)
pub const MARK_STROKE_WIDTH_PX: f64 = 2.0;

// =============================================================================
// Labels
// =============================================================================

/// Base label text height (pixels); multiplied by the profile's label scale
pub const LABEL_FONT_PX: f64 = 12.0;

pub const DEFAULT_LABEL_SCALE: u32 = 2;

/// Line box height relative to the text height
pub const LABEL_LINE_HEIGHT: f64 = 1.25;

/// Gap kept between the label and the paper edge, mark and content (pixels)
pub const LABEL_PADDING_PX: f64 = 4.0;

/// Below this size the margin is too thin for a readable label
pub const MIN_LABEL_FONT_PX: f64 = 6.0;

// =============================================================================
// Catalog and Export
// =============================================================================

pub const DEFAULT_FILENAME_PREFIX: &str = "artwork_segment";

/// Pause between consecutive exported files
pub const DEFAULT_EXPORT_DELAY_MS: u64 = 100;

/// Thumbnail bounds (keeps the 8.5:11 ratio)
pub const THUMBNAIL_WIDTH_PX: u32 = 120;

pub const THUMBNAIL_HEIGHT_PX: u32 = 156;
