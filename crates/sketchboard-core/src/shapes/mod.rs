//! Shape definitions for the whiteboard.
//!
//! Every drawable item is one variant of [`Shape`]. Variants own only the
//! geometry their kind needs, in local coordinates; the shared
//! [`ItemTransform`] places that geometry on the canvas.

mod circle;
mod image;
mod line;
mod rectangle;
mod stroke;
mod text;

pub use circle::Circle;
pub use image::{Image, ImageFormat};
pub use line::Line;
pub use rectangle::Rectangle;
pub use stroke::Stroke;
pub use text::Text;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in logical units.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 5.0,
        }
    }
}

/// Placement of an item's local geometry on the canvas.
///
/// Applied as translate, then rotate, then scale. Moving an item changes
/// `x`/`y`; the transform overlay writes scale and rotation here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in radians.
    pub rotation: f64,
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

impl ItemTransform {
    /// The affine map from local to logical canvas coordinates.
    pub fn affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Shift the placement by a logical delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// Discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Pen,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Image,
    Text,
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Common trait for all shapes. Geometry is in local coordinates.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Bounding box of the local geometry.
    fn local_bounds(&self) -> Rect;

    /// Check if a local point hits this shape.
    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool;

    /// Path to stroke when drawing this shape, in local coordinates.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Get the placement transform.
    fn placement(&self) -> &ItemTransform;

    /// Get the mutable placement transform.
    fn placement_mut(&mut self) -> &mut ItemTransform;
}

/// A drawable item, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Pen(Stroke),
    Eraser(Stroke),
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Image(Image),
    Text(Text),
}

impl Shape {
    fn inner(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Pen(s) | Shape::Eraser(s) => s,
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Image(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Pen(s) | Shape::Eraser(s) => s,
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Image(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.inner().id()
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Pen(_) => ShapeKind::Pen,
            Shape::Eraser(_) => ShapeKind::Eraser,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Image(_) => ShapeKind::Image,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.inner_mut().style_mut()
    }

    /// The placement transform (position, scale, rotation).
    pub fn placement(&self) -> &ItemTransform {
        self.inner().placement()
    }

    pub fn placement_mut(&mut self) -> &mut ItemTransform {
        self.inner_mut().placement_mut()
    }

    /// Local-to-canvas affine map.
    pub fn affine(&self) -> Affine {
        self.placement().affine()
    }

    /// Bounding box in logical canvas coordinates, after the placement transform.
    pub fn bounds(&self) -> Rect {
        self.affine().transform_rect_bbox(self.inner().local_bounds())
    }

    /// Check if a canvas point hits this shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let placement = self.placement();
        let scale = placement.scale_x.abs().min(placement.scale_y.abs());
        if scale < f64::EPSILON {
            return false;
        }
        let local = self.affine().inverse() * point;
        self.inner().hit_test_local(local, tolerance / scale)
    }

    /// Outline path in local coordinates. Draw it through [`Shape::affine`].
    pub fn local_path(&self) -> BezPath {
        self.inner().to_path()
    }

    /// Outline path in logical canvas coordinates.
    pub fn to_path(&self) -> BezPath {
        self.affine() * self.inner().to_path()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(i) => Some(i),
            _ => None,
        }
    }

    /// Strokes that erase instead of paint.
    pub fn is_eraser(&self) -> bool {
        matches!(self, Shape::Eraser(_))
    }
}
