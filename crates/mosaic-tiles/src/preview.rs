use crate::layout::{FitResult, place, strides};
use crate::options::MosaicConfig;
use crate::types::*;
use std::fmt;

/// Page counts for a layout, computed without compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub rows: usize,
    pub cols: usize,
    /// Pages left after empty tiles are dropped
    pub surviving: usize,
}

impl Estimate {
    pub fn candidates(&self) -> usize {
        self.rows * self.cols
    }
}

/// Count the grid and the surviving pages.
///
/// Agrees with `plan` followed by `filter`, but never materializes the
/// candidate list. A tile intersects the placed image exactly when its
/// column span and its row span both do, so survivors are counted per axis.
pub fn estimate(
    output_w: u32,
    output_h: u32,
    printable_w: u32,
    printable_h: u32,
    overlap_px: u32,
    fit: Option<&FitResult>,
) -> Result<Estimate> {
    let (stride_x, stride_y) = strides(printable_w, printable_h, overlap_px)?;

    let cols = output_w.div_ceil(stride_x) as usize;
    let rows = output_h.div_ceil(stride_y) as usize;

    let surviving = match fit {
        None => rows * cols,
        Some(fit) => {
            let live_cols = axis_hits(cols, stride_x, printable_w, output_w, fit.offset_x_px, fit.right());
            let live_rows = axis_hits(rows, stride_y, printable_h, output_h, fit.offset_y_px, fit.bottom());
            live_cols * live_rows
        }
    };

    Ok(Estimate {
        rows,
        cols,
        surviving,
    })
}

/// Number of spans along one axis that intersect `[lo, hi)`
fn axis_hits(count: usize, stride: u32, span: u32, extent: u32, lo: f64, hi: f64) -> usize {
    (0..count)
        .filter(|&i| {
            let start = i as u32 * stride;
            let len = span.min(extent - start);
            let start = f64::from(start);
            start < hi && lo < start + f64::from(len)
        })
        .count()
}

/// Summary of a configuration, for display before generating
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicStatistics {
    /// Output canvas in pixels
    pub output_px: (u32, u32),
    /// Printable area of one page in pixels
    pub printable_px: (u32, u32),
    pub stride_px: (u32, u32),
    pub overlap_px: u32,
    pub rows: usize,
    pub cols: usize,
    /// Pages that will be produced
    pub pages: usize,
    /// Grid cells dropped for lying entirely in the letterbox padding
    pub pages_skipped: usize,
    /// Placement of the source, when its size is known
    pub fit: Option<FitResult>,
}

impl fmt::Display for MosaicStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Output: {} × {} pixels",
            self.output_px.0, self.output_px.1
        )?;
        writeln!(
            f,
            "Printable area per page: {} × {} pixels (overlap {}px)",
            self.printable_px.0, self.printable_px.1, self.overlap_px
        )?;
        write!(
            f,
            "Grid: {} rows × {} cols, {} pages",
            self.rows, self.cols, self.pages
        )?;
        if self.pages_skipped > 0 {
            write!(f, " ({} empty pages skipped)", self.pages_skipped)?;
        }
        Ok(())
    }
}

/// Calculate statistics for a configuration.
///
/// With `source_size` the letterbox placement is taken into account and
/// empty pages are excluded from the count; without it every grid cell is
/// counted.
pub fn calculate_statistics(
    config: &MosaicConfig,
    source_size: Option<(u32, u32)>,
) -> Result<MosaicStatistics> {
    config.validate()?;

    let profile = &config.profile;
    let (output_w, output_h) = config.output.pixel_size(profile)?;
    let printable_px = profile.printable_size_px()?;
    let overlap_px = profile.overlap_size_px()?;

    let fit = match source_size {
        Some((w, h)) => Some(place(
            w,
            h,
            f64::from(output_w),
            f64::from(output_h),
            &config.placement,
        )?),
        None => None,
    };

    let est = estimate(
        output_w,
        output_h,
        printable_px.0,
        printable_px.1,
        overlap_px,
        fit.as_ref(),
    )?;

    Ok(MosaicStatistics {
        output_px: (output_w, output_h),
        printable_px,
        stride_px: strides(printable_px.0, printable_px.1, overlap_px)?,
        overlap_px,
        rows: est.rows,
        cols: est.cols,
        pages: est.surviving,
        pages_skipped: est.candidates() - est.surviving,
        fit,
    })
}
