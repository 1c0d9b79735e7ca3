use image::{Rgba, RgbaImage};
use mosaic_tiles::render::{LabelLayout, Stroke, TextStyle, composite_tile};
use mosaic_tiles::*;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 100 dpi Letter: 850x1100 page, 50px margin, marks 60px in from each edge
fn test_profile() -> PagingProfile {
    PagingProfile {
        dpi: 100.0,
        ..Default::default()
    }
}

fn gradient(width: u32, height: u32) -> RasterImage {
    RasterImage::new(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, 90, 255])
    }))
}

fn first_tile(width: u32, height: u32) -> TileDescriptor {
    TileDescriptor {
        row: 1,
        col: 1,
        source_x_px: 0,
        source_y_px: 0,
        width_px: width,
        height_px: height,
    }
}

fn label_for(tile: &TileDescriptor) -> TileLabel {
    TileLabel::new(tile, 2, 3, &OutputSpec::new(24.0, 18.0))
}

#[test]
fn test_label_text() {
    let tile = TileDescriptor {
        row: 2,
        col: 3,
        ..first_tile(10, 10)
    };
    let label = label_for(&tile);
    assert_eq!(label.title, "Segment 2-3 (2x3)");
    assert_eq!(label.subtitle, "24\" x 18\" artwork");
    assert_eq!(label.to_string(), "Segment 2-3 (2x3)\n24\" x 18\" artwork");
}

#[test]
fn test_label_layout_fits_top_margin() {
    // 50px margin: two 21px line boxes after 4px padding top and bottom
    let layout = LabelLayout::for_profile(&test_profile()).unwrap();
    assert_eq!(layout.x, 72);
    assert_eq!(layout.tops, [4, 25]);
    assert!((layout.size_px - 16.8).abs() < 1e-4);

    // Wide margins keep the requested size
    let layout = LabelLayout::for_profile(&PagingProfile::default()).unwrap();
    assert_eq!(layout.size_px, 24.0);
    assert!(layout.tops[1] + 30 <= 150);

    // Too thin for text
    let thin = PagingProfile {
        margin_in: 0.1,
        ..test_profile()
    };
    assert!(LabelLayout::for_profile(&thin).is_none());
}

#[test]
fn test_page_has_paper_size() {
    let placed = gradient(400, 300);
    let tile = first_tile(300, 200);
    let page = render_tile(&tile, &placed, &test_profile(), &label_for(&tile)).unwrap();
    assert_eq!(page.dimensions(), (850, 1100));
}

#[test]
fn test_content_is_pixel_exact_at_margin() {
    let placed = gradient(400, 300);
    let tile = TileDescriptor {
        source_x_px: 40,
        source_y_px: 30,
        ..first_tile(300, 250)
    };
    let page = render_tile(&tile, &placed, &test_profile(), &label_for(&tile)).unwrap();

    // Region clear of marks and label
    for y in 120..250 {
        for x in 100..300 {
            assert_eq!(
                page.get_pixel(50 + x, 50 + y),
                placed.as_rgba().get_pixel(40 + x, 30 + y),
                "pixel ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn test_margins_and_unused_area_stay_white() {
    let placed = gradient(400, 300);
    let tile = first_tile(300, 200);
    let page = render_tile(&tile, &placed, &test_profile(), &label_for(&tile)).unwrap();

    assert_eq!(*page.get_pixel(10, 10), WHITE);
    assert_eq!(*page.get_pixel(849, 1099), WHITE);
    // Right of a narrow edge tile
    assert_eq!(*page.get_pixel(500, 200), WHITE);
    // Below a short edge tile
    assert_eq!(*page.get_pixel(200, 400), WHITE);
}

#[test]
fn test_registration_marks_at_all_corners() {
    let placed = RasterImage::new(RgbaImage::from_pixel(10, 10, WHITE));
    let tile = first_tile(10, 10);
    let page = render_tile(&tile, &placed, &test_profile(), &label_for(&tile)).unwrap();

    let inset = test_profile().mark_inset_px();
    assert_eq!(inset, 60);
    for (x, y) in [(60, 60), (790, 60), (60, 1040), (790, 1040)] {
        assert_eq!(*page.get_pixel(x, y), BLACK, "mark center ({}, {})", x, y);
        // Crosshair arm ends before half the mark size
        assert_eq!(*page.get_pixel(x + 9, y), WHITE);
        // Diagonal point lies outside the radius 5 ring
        assert_eq!(*page.get_pixel(x + 9, y + 9), WHITE);
    }
}

#[test]
fn test_label_drawn_in_top_margin() {
    let placed = RasterImage::new(RgbaImage::from_pixel(10, 10, WHITE));
    let tile = first_tile(10, 10);
    let page = render_tile(&tile, &placed, &test_profile(), &label_for(&tile)).unwrap();

    let ink = |x0: u32, x1: u32, y0: u32, y1: u32| {
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| *page.get_pixel(x, y) != WHITE)
            .count()
    };

    // One line per 21px line box, right of the top-left mark
    assert!(ink(72, 400, 4, 25) > 0);
    assert!(ink(72, 400, 25, 46) > 0);
    // Nothing left of the label or over the content band beside the mark
    assert_eq!(ink(0, 72, 0, 50), 0);
    assert_eq!(ink(70, 700, 50, 120), 0);
}

#[test]
fn test_content_is_pixel_exact_up_to_marks() {
    const RED: Rgba<u8> = Rgba([220, 30, 30, 255]);
    let profile = PagingProfile {
        dpi: 300.0,
        ..Default::default()
    };
    let placed = RasterImage::new(RgbaImage::from_pixel(2400, 3150, RED));
    let tile = first_tile(2250, 3000);
    let page = render_tile(&tile, &placed, &profile, &label_for(&tile)).unwrap();

    let margin = profile.margin_px();
    let inset = profile.mark_inset_px();
    let reach = profile.mark_size_px / 2 + 1;
    let in_mark = |x: u32, y: u32| x.abs_diff(inset) <= reach && y.abs_diff(inset) <= reach;

    for y in margin..margin + 80 {
        for x in margin..margin + 300 {
            if !in_mark(x, y) {
                assert_eq!(*page.get_pixel(x, y), RED, "pixel ({}, {})", x, y);
            }
        }
    }

    // The label lives entirely above the content
    let label_ink = (0..margin)
        .flat_map(|y| (0..page.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| *page.get_pixel(x, y) != WHITE && !in_mark(x, y))
        .count();
    assert!(label_ink > 0);
}

#[test]
fn test_tile_outside_placed_image_is_resource_error() {
    let placed = gradient(100, 100);
    let tile = TileDescriptor {
        source_x_px: 50,
        ..first_tile(80, 80)
    };
    match render_tile(&tile, &placed, &test_profile(), &label_for(&tile)) {
        Err(err @ MosaicError::Resource { .. }) => assert_eq!(err.kind(), ErrorKind::Resource),
        other => panic!("Expected Resource error, got {:?}", other.map(|p| p.dimensions())),
    }
}

/// Surface that records the drawing calls it receives
#[derive(Default)]
struct RecordingSurface {
    calls: Vec<String>,
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (850, 1100)
    }

    fn fill(&mut self, _color: Rgba<u8>) {
        self.calls.push("fill".to_string());
    }

    fn blit(&mut self, _source: &RgbaImage, src: PixelRect, dest_x: u32, dest_y: u32) {
        self.calls.push(format!(
            "blit {}x{}+{}+{} -> {},{}",
            src.width, src.height, src.x, src.y, dest_x, dest_y
        ));
    }

    fn stroke_line(&mut self, _from: (f64, f64), _to: (f64, f64), stroke: Stroke) {
        assert_eq!(stroke.width, 2.0);
        self.calls.push("line".to_string());
    }

    fn stroke_circle(&mut self, center: (f64, f64), radius: f64, _stroke: Stroke) {
        self.calls
            .push(format!("circle {},{} r{}", center.0, center.1, radius));
    }

    fn draw_text(&mut self, _x: i64, _y: i64, text: &str, _style: TextStyle) {
        self.calls.push(format!("text {}", text));
    }
}

#[test]
fn test_composite_draws_in_order_through_surface() {
    let placed = gradient(400, 300);
    let tile = TileDescriptor {
        source_x_px: 100,
        source_y_px: 20,
        ..first_tile(200, 150)
    };
    let mut surface = RecordingSurface::default();
    composite_tile(&mut surface, &tile, &placed, &test_profile(), &label_for(&tile)).unwrap();

    let calls = &surface.calls;
    assert_eq!(calls[0], "fill");
    assert_eq!(calls[1], "blit 200x150+100+20 -> 50,50");

    let circles: Vec<&String> = calls.iter().filter(|c| c.starts_with("circle")).collect();
    assert_eq!(circles.len(), 4);
    assert_eq!(circles[0].as_str(), "circle 60,60 r5");
    assert_eq!(calls.iter().filter(|c| *c == "line").count(), 8);

    let texts = &calls[calls.len() - 2..];
    assert_eq!(texts[0], "text Segment 1-1 (2x3)");
    assert_eq!(texts[1], "text 24\" x 18\" artwork");
}
