//! Circle/ellipse shape.

use super::{ItemTransform, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined circle with independent horizontal and vertical radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    /// Horizontal and vertical radius.
    pub radius: Vec2,
    /// Style properties.
    pub style: ShapeStyle,
    /// Placement on the canvas.
    #[serde(default)]
    pub transform: ItemTransform,
}

impl Circle {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: Vec2::new(radius_x, radius_y),
            style: ShapeStyle::default(),
            transform: ItemTransform::default(),
        }
    }

    /// Create a round circle.
    pub fn round(center: Point, radius: f64) -> Self {
        Self::new(center, radius, radius)
    }

    /// Recompute the radii from the distance between the center and `point`.
    pub fn drag_to(&mut self, point: Point) {
        self.radius = Vec2::new((point.x - self.center.x).abs(), (point.y - self.center.y).abs());
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, self.radius, 0.0)
    }

    /// True when the circle covers no area.
    pub fn is_degenerate(&self) -> bool {
        self.radius.x < f64::EPSILON || self.radius.y < f64::EPSILON
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius.x,
            self.center.y - self.radius.y,
            self.center.x + self.radius.x,
            self.center.y + self.radius.y,
        )
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.stroke_width / 2.0;
        let dx_outer = (point.x - self.center.x) / (self.radius.x + tolerance + half_sw);
        let dy_outer = (point.y - self.center.y) / (self.radius.y + tolerance + half_sw);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (self.radius.x - tolerance - half_sw).max(0.0);
        let inner_ry = (self.radius.y - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - self.center.x) / inner_rx;
        let dy_inner = (point.y - self.center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn placement(&self) -> &ItemTransform {
        &self.transform
    }

    fn placement_mut(&mut self) -> &mut ItemTransform {
        &mut self.transform
    }
}
