use mosaic_tiles::*;

#[test]
fn test_default_config_is_valid() {
    let config = MosaicConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.filename_prefix, "artwork_segment");
    assert_eq!(config.profile.paper_px(), (2550, 3300));
    assert_eq!(config.profile.margin_px(), 150);
    assert_eq!(config.profile.printable_px(), (2250, 3000));
}

#[test]
fn test_output_range_enforced() {
    let mut config = MosaicConfig::default();

    config.output = OutputSpec::new(0.5, 18.0);
    match config.validate() {
        Err(MosaicError::Config { stage, message }) => {
            assert_eq!(stage, Stage::Fit);
            assert!(message.contains("width"));
            assert!(message.contains("0.5"));
        }
        other => panic!("Expected Config error, got {:?}", other),
    }

    config.output = OutputSpec::new(24.0, 201.0);
    assert!(config.validate().is_err());

    config.output = OutputSpec::new(1.0, 200.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_overlap_larger_than_printable_rejected() {
    let mut config = MosaicConfig::default();
    config.profile.overlap_in = 7.5;

    let err = config.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("overlap exceeds printable area"));
}

#[test]
fn test_margins_consuming_paper_rejected() {
    let mut config = MosaicConfig::default();
    config.profile.margin_in = 4.25;
    assert!(config.validate().is_err());

    config.profile.margin_in = -0.1;
    assert!(config.validate().is_err());
}

#[test]
fn test_bad_dpi_rejected() {
    let mut profile = PagingProfile::default();
    profile.dpi = 0.0;
    assert!(profile.validate().is_err());
    profile.dpi = f64::NAN;
    assert!(profile.validate().is_err());
}

#[test]
fn test_nan_margin_and_overlap_rejected() {
    let mut profile = PagingProfile::default();
    profile.overlap_in = f64::NAN;
    assert!(matches!(profile.validate(), Err(MosaicError::Config { .. })));

    let mut profile = PagingProfile::default();
    profile.margin_in = f64::NAN;
    assert!(matches!(profile.validate(), Err(MosaicError::Config { .. })));
}

#[test]
fn test_pixel_sizes_must_fit_a_raster() {
    // 8.5" of paper at 1e9 dpi is far past u32::MAX pixels
    let mut config = MosaicConfig::default();
    config.profile.dpi = 1e9;
    let err = config.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("paper width"));

    // Paper fits but the 200" output does not
    config.profile.dpi = 30_000_000.0;
    config.profile.paper_width_in = 1.0;
    config.profile.paper_height_in = 1.0;
    config.profile.margin_in = 0.0;
    config.profile.overlap_in = 0.0;
    config.output = OutputSpec::new(200.0, 200.0);
    assert!(config.profile.validate().is_ok());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("output width"));
    assert!(config.output.pixel_size(&config.profile).is_err());
}

#[test]
fn test_prefix_validation() {
    let mut config = MosaicConfig::default();

    config.filename_prefix = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(MosaicError::Config {
            stage: Stage::Catalog,
            ..
        })
    ));

    config.filename_prefix = "../escape".to_string();
    assert!(config.validate().is_err());

    config.filename_prefix = "moler_mosaic".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_paper_presets() {
    let letter = PagingProfile::for_paper(PaperSize::Letter, Orientation::Portrait);
    assert_eq!((letter.paper_width_in, letter.paper_height_in), (8.5, 11.0));

    let landscape = PagingProfile::for_paper(PaperSize::Letter, Orientation::Landscape);
    assert_eq!(landscape.paper_px(), (3300, 2550));

    let a4 = PagingProfile::for_paper(PaperSize::A4, Orientation::Portrait);
    assert_eq!(a4.paper_px(), (2480, 3508));

    let custom = PaperSize::Custom {
        width_in: 12.0,
        height_in: 18.0,
    };
    assert_eq!(custom.dimensions_with_orientation(Orientation::Landscape), (18.0, 12.0));
}

#[test]
fn test_pixel_conversion_rounds() {
    let profile = PagingProfile {
        dpi: 72.0,
        ..Default::default()
    };
    // 0.25 * 72 = 18, 0.5 * 72 = 36
    assert_eq!(profile.overlap_px(), 18);
    assert_eq!(profile.margin_px(), 36);
    assert_eq!(profile.mark_inset_px(), 46);

    let output = OutputSpec::new(10.01, 3.0);
    assert_eq!(output.pixel_size(&profile).unwrap(), (721, 216));
}

#[tokio::test]
async fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mosaic.json");

    let mut config = MosaicConfig::default();
    config.profile = PagingProfile::for_paper(PaperSize::Tabloid, Orientation::Landscape);
    config.output = OutputSpec::new(48.0, 36.0);
    config.placement.anchor = Anchor::TopLeft;
    config.placement.scaling = ScalingMode::Stretch;
    config.filename_prefix = "moler_mosaic".to_string();
    config.parallel = false;

    config.save(&path).await.unwrap();
    let loaded = MosaicConfig::load(&path).await.unwrap();
    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    tokio::fs::write(&path, r#"{ "filename_prefix": "poster" }"#)
        .await
        .unwrap();

    let loaded = MosaicConfig::load(&path).await.unwrap();
    assert_eq!(loaded.filename_prefix, "poster");
    assert_eq!(loaded.profile, PagingProfile::default());
    assert!(loaded.parallel);
}

#[tokio::test]
async fn test_malformed_config_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let result = MosaicConfig::load(&path).await;
    assert!(matches!(result, Err(MosaicError::InvalidInput(_))));
}
