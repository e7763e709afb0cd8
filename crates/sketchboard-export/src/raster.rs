//! Drawing shapes onto tiny-skia pixmaps.
//!
//! Geometry arrives as kurbo paths in local item coordinates and is drawn
//! through the item's placement composed with the export view, so stroke
//! widths scale with zoom and item scale the same way they do on screen.

use image::RgbaImage;
use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use sketchboard_core::shapes::{SerializableColor, Shape};
use tiny_skia::{
    BlendMode, Color, ColorU8, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pattern, Pixmap,
    PixmapPaint, SpreadMode, Stroke, Transform,
};

/// Convert a kurbo affine map into a tiny-skia transform.
pub fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path. Returns `None` when tiny-skia rejects it as empty.
pub fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// The single point a path collapses to, if it does.
fn collapsed_point(path: &BezPath) -> Option<Point> {
    let mut points = path.elements().iter().filter_map(PathEl::end_point);
    let first = points.next()?;
    points.all(|p| p.distance(first) < f64::EPSILON).then_some(first)
}

fn stroke_paint(color: SerializableColor, erase: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    if erase {
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.blend_mode = BlendMode::DestinationOut;
    } else {
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    }
    paint
}

/// Stroke a shape's outline through `view * shape.affine()`.
///
/// Eraser strokes cut their outline out of what is already on `pixmap`.
/// An outline that collapses to a single point is drawn as a round dot.
pub fn stroke_shape(pixmap: &mut Pixmap, shape: &Shape, view: Affine) {
    let style = shape.style();
    let transform = to_transform(view * shape.affine());
    let paint = stroke_paint(style.stroke_color, shape.is_eraser());
    let path = shape.local_path();

    if let Some(center) = collapsed_point(&path) {
        let radius = (style.stroke_width / 2.0) as f32;
        match PathBuilder::from_circle(center.x as f32, center.y as f32, radius) {
            Some(dot) => pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None),
            None => log::trace!("dot of {} has no area", shape.id()),
        }
        return;
    }

    let Some(path) = to_skia_path(&path) else {
        log::trace!("outline of {} is empty", shape.id());
        return;
    };
    let stroke = Stroke {
        width: style.stroke_width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}

/// Copy a straight-alpha RGBA image into a premultiplied pixmap.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, px) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Stretch `source` over `rect` (local units), drawn through `to_pixels`.
pub fn draw_image_rect(pixmap: &mut Pixmap, source: &Pixmap, rect: Rect, to_pixels: Affine) {
    let Some(target) =
        tiny_skia::Rect::from_xywh(rect.x0 as f32, rect.y0 as f32, rect.width() as f32, rect.height() as f32)
    else {
        log::trace!("image rect {rect:?} has no area");
        return;
    };
    let fit = Affine::translate(rect.origin().to_vec2())
        * Affine::scale_non_uniform(
            rect.width() / f64::from(source.width()),
            rect.height() / f64::from(source.height()),
        );
    let paint = Paint {
        shader: Pattern::new(source.as_ref(), SpreadMode::Pad, FilterQuality::Nearest, 1.0, to_transform(fit)),
        anti_alias: true,
        ..Paint::default()
    };
    pixmap.fill_rect(target, &paint, to_transform(to_pixels), None);
}

/// Lay `layer` over an opaque or translucent background color.
pub fn flatten(layer: &Pixmap, background: SerializableColor) -> Option<Pixmap> {
    let mut output = Pixmap::new(layer.width(), layer.height())?;
    output.fill(Color::from_rgba8(background.r, background.g, background.b, background.a));
    output.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    Some(output)
}
