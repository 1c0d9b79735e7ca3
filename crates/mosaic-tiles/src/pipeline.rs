//! Generation pipeline
//!
//! Runs the stages in order: fit, plan, filter, compositing, catalog. All
//! inputs travel in a `GenerationRequest` and all outputs come back in a
//! `GenerationResult`; nothing is kept between runs. Any error before
//! compositing leaves no pages behind, and a failed tile discards the
//! whole batch.

use crate::catalog::{CatalogBuilder, OutputCatalog};
use crate::layout::{FitResult, TileDescriptor, filter, place, plan};
use crate::options::MosaicConfig;
use crate::preview::MosaicStatistics;
use crate::raster::{RasterImage, compose_placed};
use crate::render::{TileLabel, render_tile};
use crate::types::*;
use image::RgbaImage;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Callback receiving `(pages_done, pages_total)` as tiles finish
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: Arc<RasterImage>,
    pub config: MosaicConfig,
}

impl GenerationRequest {
    pub fn new(image: Arc<RasterImage>, config: MosaicConfig) -> Self {
        Self { image, config }
    }
}

/// Output of one run
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub catalog: OutputCatalog,
    pub fit: FitResult,
    pub statistics: MosaicStatistics,
}

// =============================================================================
// Entry points
// =============================================================================

/// Run the pipeline on the blocking thread pool
pub async fn generate(request: GenerationRequest) -> Result<GenerationResult> {
    generate_with_progress(request, None).await
}

/// Run the pipeline on the blocking thread pool, reporting per-tile progress
pub async fn generate_with_progress(
    request: GenerationRequest,
    progress: Option<ProgressFn>,
) -> Result<GenerationResult> {
    request.config.validate()?;
    tokio::task::spawn_blocking(move || generate_sync(&request, progress.as_deref())).await?
}

/// Run the pipeline on the calling thread
pub fn generate_sync(
    request: &GenerationRequest,
    progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
) -> Result<GenerationResult> {
    let config = &request.config;
    config.validate()?;

    let profile = &config.profile;
    let image = &request.image;
    let (output_w, output_h) = config.output.pixel_size(profile)?;

    // Fit
    let fit = place(
        image.width(),
        image.height(),
        f64::from(output_w),
        f64::from(output_h),
        &config.placement,
    )?;

    // Plan
    let (printable_w, printable_h) = profile.printable_size_px()?;
    let overlap_px = profile.overlap_size_px()?;
    let grid = plan(output_w, output_h, printable_w, printable_h, overlap_px)?;

    // Filter
    let survivors = filter(&grid.candidates, &fit);

    log::info!(
        "Generating {} of {} pages ({}x{} grid) for {}\" x {}\" output",
        survivors.len(),
        grid.cell_count(),
        grid.rows,
        grid.cols,
        config.output.target_width_in,
        config.output.target_height_in
    );

    // Composite
    let placed = compose_placed(image, &fit, output_w, output_h)?;
    let pages = render_pages(
        &survivors,
        &placed,
        config,
        grid.rows,
        grid.cols,
        progress,
    )?;

    // Catalog
    let mut builder = CatalogBuilder::new(config.filename_prefix.trim(), grid.rows, grid.cols);
    for (tile, (page, label)) in survivors.iter().zip(pages) {
        builder.push(*tile, page, label)?;
    }
    let catalog = builder.finish();

    let statistics = MosaicStatistics {
        output_px: (output_w, output_h),
        printable_px: (printable_w, printable_h),
        stride_px: (grid.stride_x_px, grid.stride_y_px),
        overlap_px,
        rows: grid.rows,
        cols: grid.cols,
        pages: catalog.len(),
        pages_skipped: grid.cell_count() - catalog.len(),
        fit: Some(fit),
    };

    log::info!("Generated {} pages", catalog.len());

    Ok(GenerationResult {
        catalog,
        fit,
        statistics,
    })
}

fn render_pages(
    tiles: &[TileDescriptor],
    placed: &RasterImage,
    config: &MosaicConfig,
    rows: usize,
    cols: usize,
    progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
) -> Result<Vec<(RgbaImage, TileLabel)>> {
    let total = tiles.len();
    let done = AtomicUsize::new(0);

    let render_one = |tile: &TileDescriptor| -> Result<(RgbaImage, TileLabel)> {
        let label = TileLabel::new(tile, rows, cols, &config.output);
        let page = render_tile(tile, placed, &config.profile, &label)?;
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(report) = progress {
            report(finished, total);
        }
        Ok((page, label))
    };

    // Collecting into Result stops at the first failed tile
    if config.parallel {
        tiles.par_iter().map(render_one).collect()
    } else {
        tiles.iter().map(render_one).collect()
    }
}

// =============================================================================
// Non-reentrant driver
// =============================================================================

/// Pipeline handle that allows one run at a time.
///
/// A second `run` while one is in flight fails with `MosaicError::Busy`
/// instead of queueing.
#[derive(Debug, Default)]
pub struct Pipeline {
    running: AtomicBool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationResult> {
        self.run_with_progress(request, None).await
    }

    pub async fn run_with_progress(
        &self,
        request: GenerationRequest,
        progress: Option<ProgressFn>,
    ) -> Result<GenerationResult> {
        let _guard = RunGuard::acquire(&self.running)?;
        generate_with_progress(request, progress).await
    }
}

struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MosaicError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// Tests
// =============================================================================
