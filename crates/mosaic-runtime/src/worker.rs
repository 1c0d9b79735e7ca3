use mosaic_tiles::{OutputCatalog, RasterImage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{MosaicCommand, MosaicUpdate, RuntimeError, handlers};

/// Artwork and pages of the current session.
///
/// A new image replaces the old one and discards every generated page; a
/// new generation run replaces the whole catalog.
#[derive(Default)]
pub(crate) struct Session {
    pub image: Option<Arc<RasterImage>>,
    pub catalog: Option<OutputCatalog>,
}

impl Session {
    pub fn set_image(&mut self, image: RasterImage) {
        self.image = Some(Arc::new(image));
        self.catalog = None;
    }

    pub fn clear(&mut self) {
        self.image = None;
        self.catalog = None;
    }
}

/// Async worker task that processes commands one at a time and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<MosaicCommand>,
    update_tx: mpsc::UnboundedSender<MosaicUpdate>,
) {
    let mut session = Session::default();
    // Command pulled off the channel while coalescing, to run next
    let mut deferred: Option<MosaicCommand> = None;

    loop {
        let cmd = match deferred.take() {
            Some(cmd) => cmd,
            None => match command_rx.recv().await {
                Some(cmd) => cmd,
                None => break,
            },
        };
        process_command(cmd, &mut session, &mut command_rx, &mut deferred, &update_tx).await;
    }

    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: MosaicCommand,
    session: &mut Session,
    command_rx: &mut mpsc::UnboundedReceiver<MosaicCommand>,
    deferred: &mut Option<MosaicCommand>,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    match cmd {
        MosaicCommand::LoadImage { path } => {
            handlers::handle_load_image(path, session, update_tx).await;
        }
        MosaicCommand::LoadImageBytes { bytes, mime } => {
            handlers::handle_load_image_bytes(bytes, mime, session, update_tx).await;
        }
        MosaicCommand::LoadConfig { path } => {
            handlers::handle_load_config(path, update_tx).await;
        }
        MosaicCommand::Estimate { mut config } => {
            // Only the newest of a run of queued estimates matters
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let MosaicCommand::Estimate { config: newer } = next_cmd {
                    log::debug!("Discarding queued estimate, using newer request");
                    config = newer;
                } else {
                    *deferred = Some(next_cmd);
                    break;
                }
            }
            handlers::handle_estimate(config, session, update_tx);
        }
        MosaicCommand::Generate { mut config } => {
            // Collapse back-to-back generation requests into the newest one.
            // Anything else stops the scan so it still runs after this run.
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let MosaicCommand::Generate { config: newer } = next_cmd {
                    log::debug!("Discarding queued generation, using newer request");
                    config = newer;
                } else {
                    *deferred = Some(next_cmd);
                    break;
                }
            }
            handlers::handle_generate(config, session, update_tx).await;
        }
        MosaicCommand::ExportAll { output_dir, policy } => {
            handlers::handle_export_all(output_dir, policy, session, update_tx).await;
        }
        MosaicCommand::ExportSegment {
            row,
            col,
            output_dir,
        } => {
            handlers::handle_export_segment(row, col, output_dir, session, update_tx).await;
        }
        MosaicCommand::Clear => {
            session.clear();
            let _ = update_tx.send(MosaicUpdate::Cleared);
        }
    }
}

/// Sending side of a running worker
#[derive(Debug)]
pub struct WorkerHandle {
    command_tx: mpsc::UnboundedSender<MosaicCommand>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn send(&self, cmd: MosaicCommand) -> Result<(), RuntimeError> {
        self.command_tx
            .send(cmd)
            .map_err(|_| RuntimeError::Disconnected)
    }

    /// Close the command channel and wait for queued commands to finish
    pub async fn shutdown(self) {
        drop(self.command_tx);
        if let Err(e) = self.task.await {
            log::warn!("Worker task ended abnormally: {}", e);
        }
    }
}

/// Spawn the worker on the current tokio runtime
pub fn spawn_worker() -> (WorkerHandle, mpsc::UnboundedReceiver<MosaicUpdate>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(worker_task(command_rx, update_tx));
    (WorkerHandle { command_tx, task }, update_rx)
}
