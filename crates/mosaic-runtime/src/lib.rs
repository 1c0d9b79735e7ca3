use std::path::PathBuf;
use thiserror::Error;

mod handlers;
mod worker;

// Re-export types from the engine crate
pub use mosaic_tiles::{
    ErrorKind, ExportPolicy, MosaicConfig, MosaicStatistics, OutputCatalog, Segment,
};
pub use worker::{WorkerHandle, spawn_worker, worker_task};

/// Commands sent from a caller (UI, CLI) to the worker
#[derive(Debug)]
pub enum MosaicCommand {
    /// Decode an image file and make it the session's artwork
    LoadImage {
        path: PathBuf,
    },
    /// Same as `LoadImage` for bytes already in memory (file picker, upload)
    LoadImageBytes {
        bytes: Vec<u8>,
        mime: String,
    },
    LoadConfig {
        path: PathBuf,
    },
    /// Page counts for the current artwork, without compositing
    Estimate {
        config: MosaicConfig,
    },
    /// Run the pipeline; queued runs collapse into the newest one
    Generate {
        config: MosaicConfig,
    },
    ExportAll {
        output_dir: PathBuf,
        policy: ExportPolicy,
    },
    ExportSegment {
        row: usize,
        col: usize,
        output_dir: PathBuf,
    },
    /// Drop the artwork and any generated pages
    Clear,
}

/// Updates sent from the worker back to the caller
#[derive(Debug, Clone)]
pub enum MosaicUpdate {
    ImageLoaded {
        width: u32,
        height: u32,
        description: String,
    },
    ConfigLoaded {
        config: MosaicConfig,
    },
    Estimated {
        statistics: MosaicStatistics,
    },
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Generated {
        catalog: OutputCatalog,
        statistics: MosaicStatistics,
        instructions: Vec<String>,
    },
    Exported {
        filename: String,
    },
    ExportFinished {
        exported: usize,
        failed: usize,
    },
    Cleared,
    Error {
        message: String,
        kind: ErrorKind,
    },
}

impl MosaicUpdate {
    pub(crate) fn error(err: &mosaic_tiles::MosaicError) -> Self {
        MosaicUpdate::Error {
            message: err.to_string(),
            kind: err.kind(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Worker has shut down")]
    Disconnected,
}
