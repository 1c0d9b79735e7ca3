use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical page description: paper, resolution, margins, overlap and marks
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PagingProfile {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    pub dpi: f64,
    pub margin_in: f64,
    pub overlap_in: f64,
    pub mark_size_px: u32,
    pub mark_offset_px: u32,
    pub label_scale: u32,
}

impl Default for PagingProfile {
    fn default() -> Self {
        Self {
            paper_width_in: DEFAULT_PAPER_WIDTH_IN,
            paper_height_in: DEFAULT_PAPER_HEIGHT_IN,
            dpi: DEFAULT_DPI,
            margin_in: DEFAULT_MARGIN_IN,
            overlap_in: DEFAULT_OVERLAP_IN,
            mark_size_px: REGISTRATION_MARK_SIZE_PX,
            mark_offset_px: REGISTRATION_MARK_OFFSET_PX,
            label_scale: DEFAULT_LABEL_SCALE,
        }
    }
}

impl PagingProfile {
    /// Profile for a paper preset, keeping the default dpi, margin and overlap
    pub fn for_paper(paper: PaperSize, orientation: Orientation) -> Self {
        let (paper_width_in, paper_height_in) = paper.dimensions_with_orientation(orientation);
        Self {
            paper_width_in,
            paper_height_in,
            ..Default::default()
        }
    }

    /// Convert inches to whole pixels at this profile's dpi
    pub fn to_px(&self, inches: f64) -> i64 {
        (inches * self.dpi).round() as i64
    }

    /// Pixel extent of `inches`; fails when it does not fit in a raster dimension
    pub fn checked_px(&self, inches: f64, what: &str) -> Result<u32> {
        let px = self.to_px(inches);
        u32::try_from(px).map_err(|_| {
            MosaicError::config(
                Stage::Plan,
                format!(
                    "{} is {}px at {} dpi, outside 0..={}px",
                    what,
                    px,
                    self.dpi,
                    u32::MAX
                ),
            )
        })
    }

    /// Full paper size in pixels, exact for a validated profile
    pub fn paper_px(&self) -> (u32, u32) {
        (
            saturate_px(self.to_px(self.paper_width_in)),
            saturate_px(self.to_px(self.paper_height_in)),
        )
    }

    pub fn margin_px(&self) -> u32 {
        saturate_px(self.to_px(self.margin_in))
    }

    pub fn overlap_px(&self) -> i64 {
        self.to_px(self.overlap_in)
    }

    /// Paper minus margins on both sides; may be non-positive for a bad profile
    pub fn printable_px(&self) -> (i64, i64) {
        (
            self.to_px(self.paper_width_in - 2.0 * self.margin_in),
            self.to_px(self.paper_height_in - 2.0 * self.margin_in),
        )
    }

    /// Printable area as raster dimensions
    pub fn printable_size_px(&self) -> Result<(u32, u32)> {
        Ok((
            self.checked_px(self.paper_width_in - 2.0 * self.margin_in, "printable width")?,
            self.checked_px(self.paper_height_in - 2.0 * self.margin_in, "printable height")?,
        ))
    }

    /// Overlap as a raster dimension
    pub fn overlap_size_px(&self) -> Result<u32> {
        self.checked_px(self.overlap_in, "overlap")
    }

    /// Distance between tile origins along each axis
    pub fn stride_px(&self) -> (i64, i64) {
        let (pw, ph) = self.printable_px();
        let overlap = self.overlap_px();
        (pw - overlap, ph - overlap)
    }

    /// Distance from each page edge to the registration mark centers
    pub fn mark_inset_px(&self) -> u32 {
        self.margin_px().saturating_add(self.mark_offset_px)
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi > 0.0) || !self.dpi.is_finite() {
            return Err(MosaicError::config(
                Stage::Plan,
                format!("dpi must be positive (got {})", self.dpi),
            ));
        }
        if !(self.paper_width_in > 0.0) || !(self.paper_height_in > 0.0) {
            return Err(MosaicError::config(
                Stage::Plan,
                format!(
                    "paper size must be positive (got {}\" x {}\")",
                    self.paper_width_in, self.paper_height_in
                ),
            ));
        }
        if !(self.margin_in >= 0.0) || !(self.overlap_in >= 0.0) {
            return Err(MosaicError::config(
                Stage::Plan,
                format!(
                    "margin and overlap must not be negative (margin {}\", overlap {}\")",
                    self.margin_in, self.overlap_in
                ),
            ));
        }

        self.checked_px(self.paper_width_in, "paper width")?;
        self.checked_px(self.paper_height_in, "paper height")?;

        let (printable_w, printable_h) = self.printable_px();
        if printable_w <= 0 || printable_h <= 0 {
            return Err(MosaicError::config(
                Stage::Plan,
                format!(
                    "margins leave no printable area ({}px x {}px)",
                    printable_w, printable_h
                ),
            ));
        }

        self.printable_size_px()?;
        self.overlap_size_px()?;

        let (stride_x, stride_y) = self.stride_px();
        if stride_x <= 0 || stride_y <= 0 {
            return Err(MosaicError::config(
                Stage::Plan,
                format!(
                    "overlap exceeds printable area (printable {}x{}px, overlap {}px)",
                    printable_w,
                    printable_h,
                    self.overlap_px()
                ),
            ));
        }

        if self.label_scale == 0 {
            return Err(MosaicError::config(
                Stage::Composite,
                "label scale must be at least 1",
            ));
        }

        Ok(())
    }
}

fn saturate_px(px: i64) -> u32 {
    u32::try_from(px.max(0)).unwrap_or(u32::MAX)
}

/// Final artwork size requested by the user
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputSpec {
    pub target_width_in: f64,
    pub target_height_in: f64,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            target_width_in: DEFAULT_OUTPUT_WIDTH_IN,
            target_height_in: DEFAULT_OUTPUT_HEIGHT_IN,
        }
    }
}

impl OutputSpec {
    pub fn new(target_width_in: f64, target_height_in: f64) -> Self {
        Self {
            target_width_in,
            target_height_in,
        }
    }

    /// Output canvas size in pixels for the given profile
    pub fn pixel_size(&self, profile: &PagingProfile) -> Result<(u32, u32)> {
        Ok((
            profile.checked_px(self.target_width_in, "output width")?,
            profile.checked_px(self.target_height_in, "output height")?,
        ))
    }

    /// Check the requested size against the supported range
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.target_width_in),
            ("height", self.target_height_in),
        ] {
            if !(MIN_OUTPUT_IN..=MAX_OUTPUT_IN).contains(&value) {
                return Err(MosaicError::config(
                    Stage::Fit,
                    format!(
                        "target {} must be between {} and {} inches (got {})",
                        name, MIN_OUTPUT_IN, MAX_OUTPUT_IN, value
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Scaling and anchoring of the source image on the output canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementOptions {
    pub scaling: ScalingMode,
    pub anchor: Anchor,
}

/// Complete generation configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MosaicConfig {
    pub profile: PagingProfile,
    pub output: OutputSpec,
    pub placement: PlacementOptions,
    pub filename_prefix: String,
    /// Composite tiles on the rayon pool instead of one by one
    pub parallel: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            profile: PagingProfile::default(),
            output: OutputSpec::default(),
            placement: PlacementOptions::default(),
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            parallel: true,
        }
    }
}

impl MosaicConfig {
    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&bytes).map_err(|e| {
            MosaicError::InvalidInput(format!("Failed to parse config: {}", e))
        })?;
        Ok(config)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            MosaicError::InvalidInput(format!("Failed to serialize config: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.profile.validate()?;
        self.output.pixel_size(&self.profile)?;

        let prefix = self.filename_prefix.trim();
        if prefix.is_empty() {
            return Err(MosaicError::config(
                Stage::Catalog,
                "filename prefix must not be empty",
            ));
        }
        if prefix.contains(['/', '\\']) {
            return Err(MosaicError::config(
                Stage::Catalog,
                format!("filename prefix must not contain path separators: {:?}", prefix),
            ));
        }

        Ok(())
    }
}
