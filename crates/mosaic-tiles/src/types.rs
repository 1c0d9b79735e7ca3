use std::fmt;
use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fit,
    Plan,
    Composite,
    Catalog,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fit => "fit",
            Stage::Plan => "plan",
            Stage::Composite => "composite",
            Stage::Catalog => "catalog",
        })
    }
}

/// Coarse classification used by callers to pick a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any pipeline stage ran
    InvalidInput,
    /// Aborted before compositing, nothing produced
    Config,
    /// Fatal for the whole batch
    Resource,
    /// Single export item failed, others unaffected
    Export,
    Internal,
}

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Invalid configuration ({stage}): {message}")]
    Config { stage: Stage, message: String },
    #[error("Resource error ({stage}): {message}")]
    Resource { stage: Stage, message: String },
    #[error("Export of {filename} failed: {source}")]
    Export {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("A generation run is already in progress")]
    Busy,
}

impl MosaicError {
    pub fn config(stage: Stage, message: impl Into<String>) -> Self {
        MosaicError::Config {
            stage,
            message: message.into(),
        }
    }

    pub fn resource(stage: Stage, message: impl Into<String>) -> Self {
        MosaicError::Resource {
            stage,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MosaicError::InvalidInput(_) | MosaicError::Decode(_) => ErrorKind::InvalidInput,
            MosaicError::Config { .. } => ErrorKind::Config,
            MosaicError::Resource { .. } => ErrorKind::Resource,
            MosaicError::Export { .. } => ErrorKind::Export,
            MosaicError::Io(_) | MosaicError::TaskJoin(_) | MosaicError::Busy => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MosaicError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    #[default]
    Letter,
    Legal,
    Tabloid,
    A4,
    A3,
    Custom { width_in: f64, height_in: f64 },
}

impl PaperSize {
    /// Get base dimensions in inches (portrait for the standard sizes)
    pub fn dimensions_in(self) -> (f64, f64) {
        use crate::constants::MM_PER_INCH;
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
            PaperSize::Tabloid => (11.0, 17.0),
            PaperSize::A4 => (210.0 / MM_PER_INCH, 297.0 / MM_PER_INCH),
            PaperSize::A3 => (297.0 / MM_PER_INCH, 420.0 / MM_PER_INCH),
            PaperSize::Custom {
                width_in,
                height_in,
            } => (width_in, height_in),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_in();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// How the source image is scaled onto the output canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Preserve aspect ratio, letterbox inside the canvas
    #[default]
    Fit,
    /// Stretch over the whole canvas (ignore aspect ratio)
    Stretch,
}

/// Where a letterboxed image sits inside the output canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
}
