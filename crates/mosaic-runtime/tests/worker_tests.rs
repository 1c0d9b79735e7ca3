use image::{ImageFormat, Rgba, RgbaImage};
use mosaic_runtime::*;
use mosaic_tiles::{OutputSpec, PagingProfile};
use std::io::Cursor;
use std::time::Duration;
use tokio::sync::mpsc;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([10, 200, 90, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn load_png() -> MosaicCommand {
    MosaicCommand::LoadImageBytes {
        bytes: png_bytes(16, 12),
        mime: "image/png".to_string(),
    }
}

fn config(prefix: &str) -> MosaicConfig {
    MosaicConfig {
        profile: PagingProfile {
            dpi: 20.0,
            ..Default::default()
        },
        output: OutputSpec::new(24.0, 18.0),
        filename_prefix: prefix.to_string(),
        ..Default::default()
    }
}

/// Queue every command up front, run the worker to completion and collect
/// the updates it sent.
async fn run_commands(commands: Vec<MosaicCommand>) -> Vec<MosaicUpdate> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    for cmd in commands {
        command_tx.send(cmd).unwrap();
    }
    drop(command_tx);

    worker_task(command_rx, update_tx).await;

    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn generated_prefixes(updates: &[MosaicUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            MosaicUpdate::Generated { catalog, .. } => Some(catalog.prefix().to_string()),
            _ => None,
        })
        .collect()
}

fn errors(updates: &[MosaicUpdate]) -> Vec<(String, ErrorKind)> {
    updates
        .iter()
        .filter_map(|u| match u {
            MosaicUpdate::Error { message, kind } => Some((message.clone(), *kind)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_load_image_reports_size() {
    let updates = run_commands(vec![load_png()]).await;
    match &updates[0] {
        MosaicUpdate::ImageLoaded {
            width,
            height,
            description,
        } => {
            assert_eq!((*width, *height), (16, 12));
            assert_eq!(description, "Original size: 16 × 12 pixels");
        }
        other => panic!("Expected ImageLoaded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_image_upload_rejected() {
    let updates = run_commands(vec![MosaicCommand::LoadImageBytes {
        bytes: b"hello".to_vec(),
        mime: "text/plain".to_string(),
    }])
    .await;

    let errs = errors(&updates);
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].1, ErrorKind::InvalidInput);
    assert!(errs[0].0.contains("Please upload an image file"));
}

#[tokio::test]
async fn test_generate_without_image() {
    let updates = run_commands(vec![MosaicCommand::Generate {
        config: config("artwork_segment"),
    }])
    .await;

    let errs = errors(&updates);
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].1, ErrorKind::InvalidInput);
    assert!(generated_prefixes(&updates).is_empty());
}

#[tokio::test]
async fn test_queued_generations_collapse_to_newest() {
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Generate {
            config: config("first"),
        },
        MosaicCommand::Generate {
            config: config("second"),
        },
        MosaicCommand::Generate {
            config: config("third"),
        },
    ])
    .await;

    assert_eq!(generated_prefixes(&updates), vec!["third"]);

    let progress = updates
        .iter()
        .filter(|u| matches!(u, MosaicUpdate::Progress { .. }))
        .count();
    assert_eq!(progress, 8);

    match updates.last() {
        Some(MosaicUpdate::Generated {
            catalog,
            statistics,
            instructions,
        }) => {
            assert_eq!(catalog.len(), 8);
            assert_eq!(statistics.pages, 8);
            assert_eq!(instructions.len(), 5);
        }
        other => panic!("Expected Generated last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_other_commands_keep_their_place() {
    let dir = tempfile::tempdir().unwrap();
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Generate {
            config: config("first"),
        },
        MosaicCommand::ExportAll {
            output_dir: dir.path().to_path_buf(),
            policy: ExportPolicy {
                delay: Duration::ZERO,
            },
        },
        MosaicCommand::Generate {
            config: config("second"),
        },
    ])
    .await;

    // The export ran between the two generations and saw the first catalog
    assert_eq!(generated_prefixes(&updates), vec!["first", "second"]);
    assert!(dir.path().join("first_1-1.png").exists());
    assert!(!dir.path().join("second_1-1.png").exists());

    let finished = updates.iter().find_map(|u| match u {
        MosaicUpdate::ExportFinished { exported, failed } => Some((*exported, *failed)),
        _ => None,
    });
    assert_eq!(finished, Some((8, 0)));
}

#[tokio::test]
async fn test_invalid_config_reports_config_error() {
    let mut bad = config("artwork_segment");
    bad.profile.overlap_in = 9.0;

    let updates = run_commands(vec![load_png(), MosaicCommand::Generate { config: bad }]).await;

    let errs = errors(&updates);
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].1, ErrorKind::Config);
    assert!(errs[0].0.contains("overlap exceeds printable area"));
}

/// Passes validation, but each 4e9 x 4e9 px page fails to allocate
fn unallocatable_page_config() -> MosaicConfig {
    MosaicConfig {
        profile: PagingProfile {
            paper_width_in: 4_000_000.0,
            paper_height_in: 4_000_000.0,
            dpi: 1000.0,
            margin_in: 1_999_999.75,
            overlap_in: 0.0,
            ..Default::default()
        },
        output: OutputSpec::new(1.0, 1.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_failed_generation_discards_previous_pages() {
    let dir = tempfile::tempdir().unwrap();
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Generate {
            config: config("good"),
        },
        MosaicCommand::ExportSegment {
            row: 1,
            col: 1,
            output_dir: dir.path().to_path_buf(),
        },
        MosaicCommand::Generate {
            config: unallocatable_page_config(),
        },
        MosaicCommand::ExportAll {
            output_dir: dir.path().to_path_buf(),
            policy: ExportPolicy {
                delay: Duration::ZERO,
            },
        },
    ])
    .await;

    assert_eq!(generated_prefixes(&updates), vec!["good"]);
    assert!(dir.path().join("good_1-1.png").exists());
    assert!(!dir.path().join("good_1-2.png").exists());

    let errs = errors(&updates);
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].1, ErrorKind::Resource);
    assert_eq!(errs[1].1, ErrorKind::InvalidInput);
    assert!(errs[1].0.contains("No pages generated yet"));
    assert!(
        !updates
            .iter()
            .any(|u| matches!(u, MosaicUpdate::ExportFinished { .. }))
    );
}

#[tokio::test]
async fn test_new_image_discards_pages() {
    let dir = tempfile::tempdir().unwrap();
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Generate {
            config: config("artwork_segment"),
        },
        load_png(),
        MosaicCommand::ExportSegment {
            row: 1,
            col: 1,
            output_dir: dir.path().to_path_buf(),
        },
    ])
    .await;

    let errs = errors(&updates);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].0.contains("No segment 1-1"));
}

#[tokio::test]
async fn test_export_single_segment() {
    let dir = tempfile::tempdir().unwrap();
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Generate {
            config: config("artwork_segment"),
        },
        MosaicCommand::ExportSegment {
            row: 2,
            col: 3,
            output_dir: dir.path().to_path_buf(),
        },
    ])
    .await;

    assert!(errors(&updates).is_empty());
    assert!(dir.path().join("artwork_segment_2-3.png").exists());
    assert!(matches!(
        updates.last(),
        Some(MosaicUpdate::Exported { filename }) if filename == "artwork_segment_2-3.png"
    ));
}

#[tokio::test]
async fn test_queued_estimates_collapse() {
    let mut wide = config("artwork_segment");
    wide.output = OutputSpec::new(48.0, 18.0);

    let updates = run_commands(vec![
        MosaicCommand::Estimate {
            config: config("artwork_segment"),
        },
        MosaicCommand::Estimate { config: wide },
    ])
    .await;

    let estimates: Vec<&MosaicStatistics> = updates
        .iter()
        .filter_map(|u| match u {
            MosaicUpdate::Estimated { statistics } => Some(statistics),
            _ => None,
        })
        .collect();
    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[0].output_px, (960, 360));
}

#[tokio::test]
async fn test_clear_drops_session() {
    let updates = run_commands(vec![
        load_png(),
        MosaicCommand::Clear,
        MosaicCommand::Generate {
            config: config("artwork_segment"),
        },
    ])
    .await;

    assert!(updates.iter().any(|u| matches!(u, MosaicUpdate::Cleared)));
    assert_eq!(errors(&updates).len(), 1);
}

#[tokio::test]
async fn test_spawned_worker_handle() {
    let (handle, mut update_rx) = spawn_worker();
    handle.send(load_png()).unwrap();

    let update = update_rx.recv().await.unwrap();
    assert!(matches!(update, MosaicUpdate::ImageLoaded { .. }));

    handle.shutdown().await;
    assert!(update_rx.recv().await.is_none());
}
