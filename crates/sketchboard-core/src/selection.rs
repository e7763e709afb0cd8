//! Selection state and the transform overlay.
//!
//! The overlay is a box around the union of the selected items with four
//! corner handles and a rotate handle. Resizing and rotating write the
//! result back onto each item's [`ItemTransform`](crate::shapes::ItemTransform).

use crate::shapes::{ItemTransform, Shape, ShapeId};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Distance from the box's top edge to the rotate handle (logical units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Selected items and text edit focus.
///
/// The two are mutually exclusive: focusing a text item for editing clears
/// the shape selection, and selecting shapes drops the edit focus.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Selected shapes, in selection order.
    selected: Vec<ShapeId>,
    /// Text item with keyboard focus.
    editing: Option<ShapeId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the only selected item.
    pub fn select(&mut self, id: ShapeId) {
        self.editing = None;
        self.selected.clear();
        self.selected.push(id);
    }

    /// Replace the selection with `ids`.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.editing = None;
        self.selected.clear();
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }

    /// Clear the shape selection and the edit focus.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.editing = None;
    }

    /// Check if a shape is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids, in selection order.
    pub fn selected(&self) -> &[ShapeId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Focus a text item for editing. Clears the shape selection.
    pub fn enter_editing(&mut self, id: ShapeId) {
        self.selected.clear();
        self.editing = Some(id);
    }

    /// Drop the edit focus.
    pub fn exit_editing(&mut self) {
        self.editing = None;
    }

    /// The text item being edited.
    pub fn editing(&self) -> Option<ShapeId> {
        self.editing
    }

    /// Forget ids for which `exists` returns false.
    pub fn retain_existing(&mut self, exists: impl Fn(ShapeId) -> bool) {
        self.selected.retain(|&id| exists(id));
        if self.editing.is_some_and(|id| !exists(id)) {
            self.editing = None;
        }
    }
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of overlay handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Resize from a corner; the opposite corner stays put.
    Corner(Corner),
    /// Rotate around the box center.
    Rotate,
}

/// An overlay handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in logical coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a logical point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Transform overlay around the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Union bounds of the selected items.
    pub bounds: Rect,
    /// Corner and rotate handles.
    pub handles: Vec<Handle>,
}

impl Overlay {
    /// Build the overlay for a bounding box.
    pub fn new(bounds: Rect) -> Self {
        let handles = vec![
            Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
            Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
            Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
            Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
            Handle::new(
                Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET),
                HandleKind::Rotate,
            ),
        ];
        Self { bounds, handles }
    }

    /// Find which handle (if any) is hit at a logical point.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<HandleKind> {
        self.handles
            .iter()
            .find(|h| h.hit_test(point, tolerance))
            .map(|h| h.kind)
    }
}

/// Box produced by dragging `corner` of `origin` by `delta`.
///
/// The opposite corner stays fixed. Returns `None` when the result would be
/// narrower or shorter than `min_size`, including when the dragged corner
/// crosses over the fixed one.
pub fn resize_box(origin: Rect, corner: Corner, delta: Vec2, min_size: f64) -> Option<Rect> {
    let (x0, y0, x1, y1) = match corner {
        Corner::TopLeft => (origin.x0 + delta.x, origin.y0 + delta.y, origin.x1, origin.y1),
        Corner::TopRight => (origin.x0, origin.y0 + delta.y, origin.x1 + delta.x, origin.y1),
        Corner::BottomLeft => (origin.x0 + delta.x, origin.y0, origin.x1, origin.y1 + delta.y),
        Corner::BottomRight => (origin.x0, origin.y0, origin.x1 + delta.x, origin.y1 + delta.y),
    };
    if x1 - x0 < min_size || y1 - y0 < min_size {
        return None;
    }
    Some(Rect::new(x0, y0, x1, y1))
}

/// Angle swept around `center` when moving from `start` to `current`, in radians.
pub fn swept_angle(center: Point, start: Point, current: Point) -> f64 {
    let a = start - center;
    let b = current - center;
    if a.hypot2() < f64::EPSILON || b.hypot2() < f64::EPSILON {
        return 0.0;
    }
    b.atan2() - a.atan2()
}

/// Move a shape by a logical delta.
pub fn apply_translation(shape: &Shape, delta: Vec2) -> Shape {
    let mut shape = shape.clone();
    shape.placement_mut().translate(delta);
    shape
}

/// Map a shape from box `from` into box `to`.
///
/// The box map is composed with the item's own placement. When the result
/// is still a rotate-and-scale the item lands exactly in `to`. When it would
/// need a shear (a rotated item stretched along one canvas axis) the item
/// keeps its rotation and each local axis is scaled by how much the box map
/// stretches it. The result is then centered on the mapped center.
///
/// A zero-extent axis of `from` (e.g. a horizontal line) keeps its scale.
pub fn apply_resize(shape: &Shape, from: Rect, to: Rect) -> Shape {
    let sx = if from.width() > f64::EPSILON { to.width() / from.width() } else { 1.0 };
    let sy = if from.height() > f64::EPSILON { to.height() / from.height() } else { 1.0 };
    let map = Affine::translate(Vec2::new(to.x0, to.y0))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-from.x0, -from.y0));

    let mut shape = shape.clone();
    let current = *shape.placement();
    if let Some(placement) = decompose(map * current.affine()) {
        *shape.placement_mut() = placement;
        return shape;
    }

    let target_center = map * shape.bounds().center();
    let (sin, cos) = current.rotation.sin_cos();
    *shape.placement_mut() = ItemTransform {
        scale_x: current.scale_x * (sx * cos).hypot(sy * sin),
        scale_y: current.scale_y * (sx * sin).hypot(sy * cos),
        ..current
    };
    let shift = target_center - shape.bounds().center();
    shape.placement_mut().translate(shift);
    shape
}

/// Split an affine map into translate, rotate and scale, or `None` if it shears.
fn decompose(affine: Affine) -> Option<ItemTransform> {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let scale_x = a.hypot(b);
    if scale_x < f64::EPSILON {
        return None;
    }
    // Image of the local x and y axes must stay perpendicular
    if (a * c + b * d).abs() > 1e-9 * scale_x * c.hypot(d) {
        return None;
    }
    Some(ItemTransform {
        x: e,
        y: f,
        scale_x,
        scale_y: (a * d - b * c) / scale_x,
        rotation: b.atan2(a),
    })
}

/// Rotate a shape around `center` by `angle` radians.
pub fn apply_rotation(shape: &Shape, center: Point, angle: f64) -> Shape {
    let map = Affine::translate(center.to_vec2()) * Affine::rotate(angle) * Affine::translate(-center.to_vec2());

    let mut shape = shape.clone();
    let placement = shape.placement_mut();
    let origin = map * Point::new(placement.x, placement.y);
    placement.x = origin.x;
    placement.y = origin.y;
    placement.rotation += angle;
    shape
}
