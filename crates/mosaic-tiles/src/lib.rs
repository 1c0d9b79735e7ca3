pub mod assembly;
pub mod catalog;
pub mod constants;
pub mod export;
pub mod layout;
mod options;
pub mod pipeline;
mod preview;
pub mod raster;
pub mod render;
mod types;

pub use assembly::assembly_instructions;
pub use catalog::{CatalogBuilder, OutputCatalog, Segment, segment_filename};
pub use export::{DirectorySink, ExportPolicy, ExportQueue, ExportReport, ExportSink};
pub use layout::{
    FitResult, PixelRect, TileDescriptor, TileGrid, filter, fit, place, plan, stretch,
};
pub use options::*;
pub use pipeline::{
    GenerationRequest, GenerationResult, Pipeline, ProgressFn, generate, generate_sync,
    generate_with_progress,
};
pub use preview::{Estimate, MosaicStatistics, calculate_statistics, estimate};
pub use raster::{RasterImage, decode_image, load_image};
pub use render::{PageCanvas, Surface, TileLabel, render_tile};
pub use types::*;
