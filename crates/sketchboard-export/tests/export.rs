use kurbo::Point;
use sketchboard_core::shapes::SerializableColor;
use sketchboard_core::{Canvas, PointerEvent, ToolKind};
use sketchboard_export::{
    ExportArea, ExportError, ExportOptions, Pixmap, export_data_url, export_pixmap, export_png,
};

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn drag(canvas: &mut Canvas, points: &[(f64, f64)]) {
    let (first, rest) = points.split_first().unwrap();
    canvas.handle_pointer_event(&PointerEvent::down(first.0, first.1));
    for &(x, y) in rest {
        canvas.handle_pointer_event(&PointerEvent::moved(x, y));
    }
    let last = points.last().unwrap();
    canvas.handle_pointer_event(&PointerEvent::up(last.0, last.1));
}

/// Straight-alpha RGBA at a pixel.
fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> Option<[u8; 4]> {
    pixmap.pixel(x, y).map(|c| {
        let c = c.demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    })
}

fn small_canvas() -> Canvas {
    let mut canvas = Canvas::new();
    canvas.set_viewport_size(100.0, 80.0);
    canvas
}

fn png_fixture(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let pixels: Vec<u8> = color.iter().copied().cycle().take((width * height * 4) as usize).collect();
        writer.write_image_data(&pixels).unwrap();
    }
    data
}

#[test]
fn test_empty_viewport_is_background() {
    let canvas = small_canvas();
    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (100, 80));
    assert_eq!(rgba(&pixmap, 50, 40), Some(WHITE));
}

#[test]
fn test_stroke_color_at_stroke_pixels() {
    let mut canvas = small_canvas();
    canvas.set_stroke_color(SerializableColor::new(255, 0, 0, 255));
    canvas.set_tool(ToolKind::Line);
    drag(&mut canvas, &[(10.0, 40.0), (90.0, 40.0)]);

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!(rgba(&pixmap, 50, 40), Some([255, 0, 0, 255]));
    assert_eq!(rgba(&pixmap, 50, 10), Some(WHITE));
}

#[test]
fn test_eraser_punches_through() {
    let mut canvas = small_canvas();
    canvas.set_stroke_width(10.0);
    canvas.set_tool(ToolKind::Pen);
    drag(&mut canvas, &[(10.0, 40.0), (50.0, 40.0), (90.0, 40.0)]);
    canvas.set_tool(ToolKind::Eraser);
    drag(&mut canvas, &[(50.0, 0.0), (50.0, 80.0)]);

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!(rgba(&pixmap, 50, 40), Some(WHITE));
    assert_eq!(rgba(&pixmap, 20, 40), Some([0, 0, 0, 255]));
}

#[test]
fn test_eraser_only_affects_earlier_items() {
    let mut canvas = small_canvas();
    canvas.set_stroke_width(10.0);
    canvas.set_tool(ToolKind::Eraser);
    drag(&mut canvas, &[(50.0, 0.0), (50.0, 80.0)]);
    canvas.set_tool(ToolKind::Pen);
    drag(&mut canvas, &[(10.0, 40.0), (90.0, 40.0)]);

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!(rgba(&pixmap, 50, 40), Some([0, 0, 0, 255]));
}

#[test]
fn test_viewport_follows_camera() {
    let mut canvas = small_canvas();
    canvas.set_tool(ToolKind::Line);
    drag(&mut canvas, &[(10.0, 10.0), (30.0, 10.0)]);
    canvas.camera.zoom = 2.0;

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!(rgba(&pixmap, 40, 20), Some([0, 0, 0, 255]));
    assert_eq!(rgba(&pixmap, 40, 10), Some(WHITE));
}

#[test]
fn test_pixel_ratio_scales_output() {
    let canvas = small_canvas();
    let pixmap = export_pixmap(&canvas, &ExportOptions::default().with_pixel_ratio(2.0)).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (200, 160));
}

#[test]
fn test_content_area() {
    let mut canvas = small_canvas();
    assert!(matches!(
        export_pixmap(&canvas, &ExportOptions::content()),
        Err(ExportError::EmptyArea)
    ));

    canvas.set_tool(ToolKind::Rectangle);
    drag(&mut canvas, &[(500.0, 500.0), (560.0, 540.0)]);
    let options = ExportOptions {
        area: ExportArea::Content,
        padding: 10.0,
        ..ExportOptions::default()
    };
    let pixmap = export_pixmap(&canvas, &options).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (80, 60));
    // Rectangle edge sits at the padding offset
    assert_eq!(rgba(&pixmap, 10, 30), Some([0, 0, 0, 255]));
    assert_eq!(rgba(&pixmap, 40, 30), Some(WHITE));
}

#[test]
fn test_too_large() {
    let canvas = small_canvas();
    let options = ExportOptions {
        max_dimension: 150,
        ..ExportOptions::default().with_pixel_ratio(2.0)
    };
    assert!(matches!(
        export_png(&canvas, &options),
        Err(ExportError::TooLarge { width: 200, height: 160, max: 150 })
    ));
}

#[test]
fn test_image_item_is_drawn() {
    let mut canvas = small_canvas();
    let bytes = png_fixture(4, 4, [0, 0, 255, 255]);
    canvas.import_image_bytes(&bytes, Point::new(20.0, 20.0)).unwrap();

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert_eq!(rgba(&pixmap, 21, 21), Some([0, 0, 255, 255]));
    assert_eq!(rgba(&pixmap, 30, 30), Some(WHITE));
}

#[test]
fn test_text_is_skipped() {
    let mut canvas = small_canvas();
    canvas.set_tool(ToolKind::Text);
    canvas.handle_pointer_event(&PointerEvent::down(10.0, 10.0));
    assert_eq!(canvas.item_count(), 1);

    let pixmap = export_pixmap(&canvas, &ExportOptions::default()).unwrap();
    assert!(pixmap.data().chunks(4).all(|px| px == WHITE));
}

#[test]
fn test_png_and_data_url() {
    let mut canvas = small_canvas();
    canvas.set_tool(ToolKind::Circle);
    drag(&mut canvas, &[(50.0, 40.0), (70.0, 40.0), (70.0, 60.0)]);

    let png = export_png(&canvas, &ExportOptions::default()).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (100, 80));
    assert_eq!(decoded.get_pixel(50, 40).0, WHITE);
    assert_eq!(decoded.get_pixel(70, 40).0, [0, 0, 0, 255]);

    let url = export_data_url(&canvas, &ExportOptions::default()).unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
}
