//! Sequential export of catalog pages
//!
//! Pages are PNG-encoded and handed one at a time to an `ExportSink`, with a
//! pause between consecutive writes. A failed page is recorded in the report
//! and the queue moves on to the next one.

use crate::catalog::{OutputCatalog, Segment};
use crate::constants::DEFAULT_EXPORT_DELAY_MS;
use crate::types::*;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Destination for encoded pages
pub trait ExportSink {
    fn write(&mut self, filename: &str, bytes: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send;
}

/// Writes each page as a file inside one directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Use `root` as the output directory, creating it if needed
    pub async fn create(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_owned();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ExportSink for DirectorySink {
    async fn write(&mut self, filename: &str, bytes: Vec<u8>) -> io::Result<()> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Pacing between consecutive exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPolicy {
    pub delay: Duration,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_EXPORT_DELAY_MS),
        }
    }
}

impl ExportPolicy {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/// Outcome of exporting a whole catalog
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Filenames written, in catalog order
    pub exported: Vec<String>,
    pub failures: Vec<MosaicError>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.exported.len() + self.failures.len()
    }
}

/// Rate-limited exporter over a sink
#[derive(Debug)]
pub struct ExportQueue<S> {
    sink: S,
    policy: ExportPolicy,
}

impl<S: ExportSink> ExportQueue<S> {
    pub fn new(sink: S, policy: ExportPolicy) -> Self {
        Self { sink, policy }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Export every page in catalog order
    pub async fn export_all(&mut self, catalog: &OutputCatalog) -> ExportReport {
        self.export_all_with(catalog, |_, _, _| {}).await
    }

    /// Export every page, calling `on_item(index, total, outcome)` after each
    pub async fn export_all_with(
        &mut self,
        catalog: &OutputCatalog,
        mut on_item: impl FnMut(usize, usize, std::result::Result<&str, &MosaicError>),
    ) -> ExportReport {
        let total = catalog.len();
        let mut report = ExportReport::default();

        for (index, segment) in catalog.iter().enumerate() {
            if index > 0 && !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }

            match self.export_one(segment).await {
                Ok(()) => {
                    on_item(index + 1, total, Ok(&segment.filename));
                    report.exported.push(segment.filename.clone());
                }
                Err(e) => {
                    log::warn!("{}", e);
                    on_item(index + 1, total, Err(&e));
                    report.failures.push(e);
                }
            }
        }

        log::info!(
            "Exported {} of {} pages",
            report.exported.len(),
            report.attempted()
        );
        report
    }

    /// Encode and write a single page
    pub async fn export_one(&mut self, segment: &Arc<Segment>) -> Result<()> {
        let filename = segment.filename.clone();
        let encoded = Arc::clone(segment);
        let bytes = tokio::task::spawn_blocking(move || encoded.encode_png())
            .await?
            .map_err(|e| MosaicError::Export {
                filename: filename.clone(),
                source: io::Error::other(e),
            })?;

        self.sink
            .write(&filename, bytes)
            .await
            .map_err(|source| MosaicError::Export { filename, source })
    }
}
