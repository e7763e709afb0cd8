//! Tool system for the whiteboard.

use crate::selection::HandleKind;
use crate::shapes::{Circle, Line, Rectangle, Shape, ShapeId, ShapeStyle, Stroke};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Text,
    /// Select, move and transform items.
    Cursor,
    /// Drag the whole canvas.
    Hand,
}

impl ToolKind {
    /// All tools, in toolbar order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pen,
            ToolKind::Eraser,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Text,
            ToolKind::Cursor,
            ToolKind::Hand,
        ]
    }

    /// Display name for toolbars.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Text => "text",
            ToolKind::Cursor => "cursor",
            ToolKind::Hand => "hand",
        }
    }

    /// Tools that build a shape between pointer-down and pointer-up.
    pub fn draws_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Eraser | ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle
        )
    }

    /// Tools under which keyboard input edits the focused text item.
    pub fn accepts_text_input(self) -> bool {
        matches!(self, ToolKind::Text | ToolKind::Cursor)
    }
}

/// The interaction in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// Waiting for a pointer-down.
    #[default]
    Idle,
    /// Building a new shape. The scratch shape already carries its final id.
    Drawing { preview: Shape },
    /// Dragging a selection rectangle (logical coordinates).
    Marquee { start: Point, current: Point },
    /// Moving the listed items.
    Drag {
        ids: Vec<ShapeId>,
        start: Point,
        current: Point,
    },
    /// Resizing or rotating the listed items via an overlay handle.
    Transform {
        ids: Vec<ShapeId>,
        handle: HandleKind,
        /// Union bounds of the items when the gesture started.
        origin: Rect,
        start: Point,
        current: Point,
    },
    /// Panning the canvas; `last` is in screen coordinates.
    Pan { last: Point },
}

/// Manages the current tool and its gesture state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current interaction.
    pub gesture: Gesture,
    /// Current style to apply to new shapes.
    pub current_style: ShapeStyle,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.gesture = Gesture::Idle;
    }

    /// Start drawing a shape with the current tool at a logical point.
    ///
    /// Returns false for tools that don't draw shapes.
    pub fn begin_drawing(&mut self, point: Point) -> bool {
        let Some(mut preview) = self.scratch_shape(point) else {
            return false;
        };
        *preview.style_mut() = self.current_style.clone();
        self.gesture = Gesture::Drawing { preview };
        true
    }

    fn scratch_shape(&self, point: Point) -> Option<Shape> {
        match self.current_tool {
            ToolKind::Pen => Some(Shape::Pen(Stroke::new(point))),
            ToolKind::Eraser => Some(Shape::Eraser(Stroke::new(point))),
            ToolKind::Line => Some(Shape::Line(Line::new(point, point))),
            ToolKind::Rectangle => Some(Shape::Rectangle(Rectangle::new(point, 0.0, 0.0))),
            ToolKind::Circle => Some(Shape::Circle(Circle::round(point, 0.0))),
            ToolKind::Text | ToolKind::Cursor | ToolKind::Hand => None,
        }
    }

    /// Extend the shape being drawn to a logical point.
    pub fn update_drawing(&mut self, point: Point) {
        let Gesture::Drawing { preview } = &mut self.gesture else {
            return;
        };
        match preview {
            Shape::Pen(stroke) | Shape::Eraser(stroke) => stroke.add_point(point),
            Shape::Line(line) => line.end = point,
            Shape::Rectangle(rect) => rect.drag_to(point),
            Shape::Circle(circle) => circle.drag_to(point),
            Shape::Image(_) | Shape::Text(_) => {}
        }
    }

    /// Finish drawing and return the shape to commit.
    ///
    /// Zero-area rectangles and circles and zero-length lines are dropped.
    /// A single-point stroke is kept as a dot.
    pub fn finish_drawing(&mut self) -> Option<Shape> {
        if !matches!(self.gesture, Gesture::Drawing { .. }) {
            return None;
        }
        let Gesture::Drawing { preview } = std::mem::take(&mut self.gesture) else {
            return None;
        };
        let degenerate = match &preview {
            Shape::Line(line) => line.length() < f64::EPSILON,
            Shape::Rectangle(rect) => rect.is_degenerate(),
            Shape::Circle(circle) => circle.is_degenerate(),
            _ => false,
        };
        if degenerate {
            log::debug!("discarding degenerate {:?}", preview.kind());
            return None;
        }
        Some(preview)
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The shape being drawn, if any.
    pub fn preview_shape(&self) -> Option<&Shape> {
        match &self.gesture {
            Gesture::Drawing { preview } => Some(preview),
            _ => None,
        }
    }

    /// The marquee rectangle being dragged, if any.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee { start, current } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }
}
