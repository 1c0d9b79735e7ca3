use mosaic_tiles::{
    DirectorySink, ExportPolicy, ExportQueue, GenerationRequest, MosaicConfig, MosaicError,
    ProgressFn, assembly_instructions, calculate_statistics, decode_image, generate_with_progress,
    load_image,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::MosaicUpdate;
use crate::worker::Session;

fn send_error(update_tx: &mpsc::UnboundedSender<MosaicUpdate>, err: &MosaicError) {
    log::error!("{}", err);
    let _ = update_tx.send(MosaicUpdate::error(err));
}

fn no_image() -> MosaicError {
    MosaicError::InvalidInput("No image loaded".to_string())
}

fn image_loaded(session: &Session, update_tx: &mpsc::UnboundedSender<MosaicUpdate>) {
    if let Some(image) = &session.image {
        let _ = update_tx.send(MosaicUpdate::ImageLoaded {
            width: image.width(),
            height: image.height(),
            description: image.describe(),
        });
    }
}

pub async fn handle_load_image(
    path: PathBuf,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    log::info!("Loading image: {}", path.display());
    match load_image(&path).await {
        Ok(image) => {
            session.set_image(image);
            image_loaded(session, update_tx);
        }
        Err(e) => send_error(update_tx, &e),
    }
}

pub async fn handle_load_image_bytes(
    bytes: Vec<u8>,
    mime: String,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes, &mime)).await;
    match decoded {
        Ok(Ok(image)) => {
            session.set_image(image);
            image_loaded(session, update_tx);
        }
        Ok(Err(e)) => send_error(update_tx, &e),
        Err(e) => send_error(update_tx, &MosaicError::TaskJoin(e)),
    }
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<MosaicUpdate>) {
    match MosaicConfig::load(&path).await {
        Ok(config) => {
            let _ = update_tx.send(MosaicUpdate::ConfigLoaded { config });
        }
        Err(e) => send_error(update_tx, &e),
    }
}

pub fn handle_estimate(
    config: MosaicConfig,
    session: &Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    let source_size = session.image.as_ref().map(|image| image.dimensions());
    match calculate_statistics(&config, source_size) {
        Ok(statistics) => {
            let _ = update_tx.send(MosaicUpdate::Estimated { statistics });
        }
        Err(e) => send_error(update_tx, &e),
    }
}

pub async fn handle_generate(
    config: MosaicConfig,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    let Some(image) = session.image.clone() else {
        send_error(update_tx, &no_image());
        return;
    };

    let progress_tx = update_tx.clone();
    let progress: ProgressFn = Arc::new(move |current, total| {
        let _ = progress_tx.send(MosaicUpdate::Progress {
            operation: "Generating pages".to_string(),
            current,
            total,
        });
    });

    let instructions = assembly_instructions(&config.profile);
    let request = GenerationRequest::new(image, config);
    match generate_with_progress(request, Some(progress)).await {
        Ok(result) => {
            session.catalog = Some(result.catalog.clone());
            let _ = update_tx.send(MosaicUpdate::Generated {
                catalog: result.catalog,
                statistics: result.statistics,
                instructions,
            });
        }
        Err(e) => {
            // A failed run leaves no pages behind
            session.catalog = None;
            send_error(update_tx, &e);
        }
    }
}

pub async fn handle_export_all(
    output_dir: PathBuf,
    policy: ExportPolicy,
    session: &Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    let Some(catalog) = &session.catalog else {
        send_error(
            update_tx,
            &MosaicError::InvalidInput("No pages generated yet".to_string()),
        );
        return;
    };

    let sink = match DirectorySink::create(&output_dir).await {
        Ok(sink) => sink,
        Err(e) => {
            send_error(update_tx, &MosaicError::Io(e));
            return;
        }
    };

    let mut queue = ExportQueue::new(sink, policy);
    let report = queue
        .export_all_with(catalog, |current, total, outcome| {
            let update = match outcome {
                Ok(filename) => MosaicUpdate::Exported {
                    filename: filename.to_string(),
                },
                Err(e) => MosaicUpdate::error(e),
            };
            let _ = update_tx.send(update);
            let _ = update_tx.send(MosaicUpdate::Progress {
                operation: "Exporting pages".to_string(),
                current,
                total,
            });
        })
        .await;

    let _ = update_tx.send(MosaicUpdate::ExportFinished {
        exported: report.exported.len(),
        failed: report.failures.len(),
    });
}

pub async fn handle_export_segment(
    row: usize,
    col: usize,
    output_dir: PathBuf,
    session: &Session,
    update_tx: &mpsc::UnboundedSender<MosaicUpdate>,
) {
    let Some(segment) = session.catalog.as_ref().and_then(|c| c.get(row, col)) else {
        send_error(
            update_tx,
            &MosaicError::InvalidInput(format!("No segment {}-{}", row, col)),
        );
        return;
    };

    let sink = match DirectorySink::create(&output_dir).await {
        Ok(sink) => sink,
        Err(e) => {
            send_error(update_tx, &MosaicError::Io(e));
            return;
        }
    };

    let mut queue = ExportQueue::new(sink, ExportPolicy::default());
    match queue.export_one(segment).await {
        Ok(()) => {
            let _ = update_tx.send(MosaicUpdate::Exported {
                filename: segment.filename.clone(),
            });
        }
        Err(e) => send_error(update_tx, &e),
    }
}
