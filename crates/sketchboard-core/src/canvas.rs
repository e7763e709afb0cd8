//! Drawing surface state and event handling.

use crate::camera::Camera;
use crate::config::Settings;
use crate::history::{CoalesceKey, History};
use crate::import::{ImportResult, ImportedImage};
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::scene::Scene;
use crate::selection::{
    HANDLE_HIT_TOLERANCE, HandleKind, Overlay, SelectionState, apply_resize, apply_rotation,
    apply_translation, resize_box, swept_angle,
};
use crate::shapes::{SerializableColor, Shape, ShapeId, Text};
use crate::text_edit::{EditKey, EditOutcome, apply_key};
use crate::tools::{Gesture, ToolKind, ToolManager};
use kurbo::{Point, Rect, Size, Vec2};
use std::borrow::Cow;

/// Screen padding used by [`Canvas::fit_to_content`].
const FIT_PADDING: f64 = 50.0;

/// Runtime whiteboard state.
///
/// All mutation goes through the event handlers and commands below. The
/// committed scene is only ever replaced by a new history snapshot; gestures
/// in progress live in the tool manager and are exposed as previews.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Committed scenes with undo/redo.
    history: History,
    /// Camera for view transform.
    pub camera: Camera,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Selected items and text edit focus.
    selection: SelectionState,
    settings: Settings,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    /// History coalescing key of the current text edit session.
    edit_session: Option<CoalesceKey>,
    next_session: CoalesceKey,
    /// Last pointer position seen, in screen coordinates.
    last_pointer: Option<Point>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an empty canvas.
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_scene(Scene::new(), settings)
    }

    /// Create a canvas showing `scene`. The starting scene cannot be undone.
    pub fn with_scene(scene: Scene, settings: Settings) -> Self {
        let settings = settings.validated();
        let mut history = History::with_base(scene);
        history.set_limit(settings.history_limit);

        let mut tool_manager = ToolManager::new();
        tool_manager.current_style.stroke_color = settings.stroke_color;
        tool_manager.current_style.stroke_width = settings.stroke_width;

        Self {
            history,
            camera: Camera::with_limits(settings.min_zoom, settings.max_zoom),
            tool_manager,
            selection: SelectionState::new(),
            settings,
            viewport_size: Size::new(800.0, 600.0),
            edit_session: None,
            next_session: 0,
            last_pointer: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// The committed scene.
    pub fn scene(&self) -> &Scene {
        self.history.current()
    }

    /// Committed items in draw order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Shape> {
        self.scene().shapes_ordered()
    }

    /// The scene as it should be drawn right now, with any drag or
    /// transform preview applied. The shape being drawn is not included;
    /// see [`preview_shape`](Self::preview_shape).
    pub fn display_scene(&self) -> Cow<'_, Scene> {
        let scene = self.scene();
        match &self.tool_manager.gesture {
            Gesture::Drag { ids, start, current } => {
                let delta = *current - *start;
                if delta.hypot2() < f64::EPSILON {
                    Cow::Borrowed(scene)
                } else {
                    Cow::Owned(translated(scene, ids, delta))
                }
            }
            Gesture::Transform {
                ids,
                handle,
                origin,
                start,
                current,
            } => match self.transformed(ids, *handle, *origin, *start, *current) {
                Some(preview) => Cow::Owned(preview),
                None => Cow::Borrowed(scene),
            },
            _ => Cow::Borrowed(scene),
        }
    }

    /// The shape being drawn, if any.
    pub fn preview_shape(&self) -> Option<&Shape> {
        self.tool_manager.preview_shape()
    }

    /// The marquee rectangle being dragged, in logical coordinates.
    pub fn marquee(&self) -> Option<Rect> {
        self.tool_manager.marquee()
    }

    /// Transform overlay around the current selection.
    pub fn overlay(&self) -> Option<Overlay> {
        if self.selection.is_empty() {
            return None;
        }
        self.display_scene()
            .bounds_of(self.selection.selected())
            .map(Overlay::new)
    }

    /// Number of committed items.
    pub fn item_count(&self) -> usize {
        self.scene().len()
    }

    /// Number of applied history entries.
    pub fn history_pointer(&self) -> usize {
        self.history.pointer()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // --- Tools and style ---

    /// The current tool.
    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    /// Set the current tool. Drops any gesture, the selection and the text
    /// edit focus.
    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("tool: {} -> {}", self.tool().name(), tool.name());
        self.tool_manager.set_tool(tool);
        self.selection.clear();
        self.edit_session = None;
    }

    /// Stroke color for new items. Accepts a [`peniko::Color`] as well.
    pub fn set_stroke_color(&mut self, color: impl Into<SerializableColor>) {
        self.tool_manager.current_style.stroke_color = color.into();
    }

    /// Stroke width for new items. Non-positive widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width <= 0.0 || !width.is_finite() {
            log::warn!("ignoring stroke width {width}");
            return;
        }
        self.tool_manager.current_style.stroke_width = width;
    }

    // --- Selection ---

    /// Select a single item.
    pub fn select(&mut self, id: ShapeId) {
        if !self.scene().contains(id) {
            log::debug!("select: no item {id}");
            return;
        }
        self.selection.select(id);
        self.edit_session = None;
    }

    /// Select every committed item.
    pub fn select_all(&mut self) {
        let ids = self.scene().ids().to_vec();
        self.selection.select_many(ids);
        self.edit_session = None;
    }

    /// Clear the selection and the text edit focus.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.edit_session = None;
    }

    /// Selected ids, in selection order.
    pub fn selection(&self) -> &[ShapeId] {
        self.selection.selected()
    }

    /// Check if a shape is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.is_selected(id)
    }

    /// The text item in edit mode.
    pub fn editing(&self) -> Option<ShapeId> {
        self.selection.editing()
    }

    fn enter_editing(&mut self, id: ShapeId) {
        if self.selection.editing() == Some(id) && self.edit_session.is_some() {
            return;
        }
        self.selection.enter_editing(id);
        self.next_session += 1;
        self.edit_session = Some(self.next_session);
        log::debug!("editing text {id}");
    }

    fn exit_editing(&mut self) {
        self.selection.exit_editing();
        self.edit_session = None;
    }

    // --- History ---

    /// Undo the last committed change.
    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            self.after_history_step();
        }
        changed
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            self.after_history_step();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn after_history_step(&mut self) {
        self.tool_manager.cancel();
        let scene = self.history.current();
        self.selection.retain_existing(|id| scene.contains(id));
        if self.selection.editing().is_none() {
            self.edit_session = None;
        }
    }

    fn commit(&mut self, scene: Scene) {
        self.history.commit(scene);
    }

    // --- View ---

    /// Zoom in by one step, keeping the pan offset.
    pub fn zoom_in(&mut self) -> bool {
        self.camera.step_zoom(self.settings.zoom_step)
    }

    /// Zoom out by one step, keeping the pan offset.
    pub fn zoom_out(&mut self) -> bool {
        self.camera.step_zoom(-self.settings.zoom_step)
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.camera.zoom_at(screen_point, factor);
    }

    /// Zoom for display, e.g. `100` for 100%.
    pub fn zoom_percent(&self) -> u32 {
        self.camera.zoom_percent()
    }

    /// Reset pan and zoom.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Fit the view to show all items.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.scene().bounds() {
            self.camera.fit_to_bounds(bounds, self.viewport_size, FIT_PADDING);
        }
    }

    // --- Image import ---

    /// Place an image from a `data:` URL with its top-left corner at a
    /// screen position.
    pub fn import_image_data_url(&mut self, data_url: &str, screen_pos: Point) -> ImportResult<ShapeId> {
        let imported = ImportedImage::from_data_url(data_url)?;
        Ok(self.place_image(imported, screen_pos))
    }

    /// Place an image from raw file bytes with its top-left corner at a
    /// screen position.
    pub fn import_image_bytes(&mut self, bytes: &[u8], screen_pos: Point) -> ImportResult<ShapeId> {
        let imported = ImportedImage::from_bytes(bytes)?;
        Ok(self.place_image(imported, screen_pos))
    }

    fn place_image(&mut self, imported: ImportedImage, screen_pos: Point) -> ShapeId {
        let position = self.camera.screen_to_world(screen_pos);
        let (width, height) = (imported.width, imported.height);
        let shape = imported.into_shape(position, self.settings.max_image_size);
        let id = shape.id();
        let scene = self.scene().clone().with_shape(shape);
        self.commit(scene);
        log::info!("imported {width}x{height} image at {position:?}");
        id
    }

    // --- Events ---

    /// Handle a pointer event in screen coordinates.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                if *button != MouseButton::Left {
                    log::trace!("ignoring {button:?} button press");
                    return;
                }
                self.pointer_down(*position);
                self.last_pointer = Some(*position);
            }
            PointerEvent::Move { position } => {
                self.pointer_move(*position);
                self.last_pointer = Some(*position);
            }
            PointerEvent::Up { position, button } => {
                if *button != MouseButton::Left {
                    return;
                }
                if self.last_pointer != Some(*position) {
                    self.pointer_move(*position);
                }
                self.pointer_up();
                self.last_pointer = Some(*position);
            }
            PointerEvent::Scroll { position, delta } => {
                if delta.y.abs() < f64::EPSILON {
                    return;
                }
                let step = 1.0 + self.settings.zoom_step;
                let factor = if delta.y < 0.0 { step } else { 1.0 / step };
                self.camera.zoom_at(*position, factor);
            }
            PointerEvent::Leave => self.cancel(),
        }
    }

    /// Drop any gesture in progress without committing.
    pub fn cancel(&mut self) {
        if self.tool_manager.is_active() {
            log::debug!("gesture cancelled");
        }
        self.tool_manager.cancel();
    }

    fn pointer_down(&mut self, screen: Point) {
        let world = self.camera.screen_to_world(screen);
        match self.tool() {
            ToolKind::Hand => self.tool_manager.gesture = Gesture::Pan { last: screen },
            ToolKind::Cursor => self.cursor_down(world),
            ToolKind::Text => self.place_text(world),
            tool if tool.draws_shape() => {
                self.tool_manager.begin_drawing(world);
            }
            tool => log::trace!("{} tool ignores pointer down", tool.name()),
        }
    }

    fn cursor_down(&mut self, world: Point) {
        let handle_tolerance = self.camera.screen_distance_to_world(HANDLE_HIT_TOLERANCE);
        if let Some(overlay) = self.overlay() {
            if let Some(handle) = overlay.hit_test(world, handle_tolerance) {
                self.tool_manager.gesture = Gesture::Transform {
                    ids: self.selection.selected().to_vec(),
                    handle,
                    origin: overlay.bounds,
                    start: world,
                    current: world,
                };
                return;
            }
        }

        let tolerance = self.camera.screen_distance_to_world(self.settings.hit_tolerance);
        let Some(id) = self.scene().top_shape_at(world, tolerance) else {
            self.clear_selection();
            self.tool_manager.gesture = Gesture::Marquee {
                start: world,
                current: world,
            };
            return;
        };

        let ids = if self.selection.is_selected(id) {
            self.selection.selected().to_vec()
        } else if self.scene().get_shape(id).is_some_and(Shape::is_text) {
            self.enter_editing(id);
            vec![id]
        } else {
            self.select(id);
            vec![id]
        };
        self.tool_manager.gesture = Gesture::Drag {
            ids,
            start: world,
            current: world,
        };
    }

    fn place_text(&mut self, world: Point) {
        let mut text = Text::new(world, self.settings.placeholder_text.clone());
        text.font_size = self.settings.font_size;
        text.style = self.tool_manager.current_style.clone();
        let shape = Shape::Text(text);
        let id = shape.id();
        let scene = self.scene().clone().with_shape(shape);
        self.commit(scene);
        self.enter_editing(id);
    }

    fn pointer_move(&mut self, screen: Point) {
        let world = self.camera.screen_to_world(screen);
        if matches!(self.tool_manager.gesture, Gesture::Drawing { .. }) {
            self.tool_manager.update_drawing(world);
            return;
        }
        match &mut self.tool_manager.gesture {
            Gesture::Idle | Gesture::Drawing { .. } => {}
            Gesture::Marquee { current, .. }
            | Gesture::Drag { current, .. }
            | Gesture::Transform { current, .. } => *current = world,
            Gesture::Pan { last } => {
                let delta = screen - *last;
                *last = screen;
                self.camera.pan(delta);
            }
        }
    }

    fn pointer_up(&mut self) {
        match std::mem::take(&mut self.tool_manager.gesture) {
            Gesture::Idle | Gesture::Pan { .. } => {}
            drawing @ Gesture::Drawing { .. } => {
                self.tool_manager.gesture = drawing;
                if let Some(shape) = self.tool_manager.finish_drawing() {
                    log::debug!("committing {:?} {}", shape.kind(), shape.id());
                    let scene = self.scene().clone().with_shape(shape);
                    self.commit(scene);
                }
            }
            Gesture::Marquee { start, current } => {
                if (current - start).hypot() * self.camera.zoom < self.settings.click_threshold {
                    log::trace!("marquee below click threshold");
                    return;
                }
                let ids = self.scene().shapes_within(Rect::from_points(start, current));
                log::debug!("marquee selected {} items", ids.len());
                self.selection.select_many(ids);
                self.edit_session = None;
            }
            Gesture::Drag { ids, start, current } => {
                let delta = current - start;
                if delta.hypot2() < f64::EPSILON {
                    return;
                }
                let scene = translated(self.scene(), &ids, delta);
                self.commit(scene);
            }
            Gesture::Transform {
                ids,
                handle,
                origin,
                start,
                current,
            } => {
                if let Some(scene) = self.transformed(&ids, handle, origin, start, current) {
                    self.commit(scene);
                }
            }
        }
    }

    /// Scene with a resize or rotate applied, or `None` if it changes nothing
    /// or would shrink the box below the minimum size.
    fn transformed(
        &self,
        ids: &[ShapeId],
        handle: HandleKind,
        origin: Rect,
        start: Point,
        current: Point,
    ) -> Option<Scene> {
        let mut scene = self.scene().clone();
        match handle {
            HandleKind::Corner(corner) => {
                let Some(target) = resize_box(origin, corner, current - start, self.settings.min_transform_size)
                else {
                    log::trace!("resize below minimum size refused");
                    return None;
                };
                if target == origin {
                    return None;
                }
                for &id in ids {
                    if let Some(resized) = scene.get_shape(id).map(|s| apply_resize(s, origin, target)) {
                        scene.add_shape(resized);
                    }
                }
            }
            HandleKind::Rotate => {
                let center = origin.center();
                let angle = swept_angle(center, start, current);
                if angle.abs() < f64::EPSILON {
                    return None;
                }
                for &id in ids {
                    if let Some(rotated) = scene.get_shape(id).map(|s| apply_rotation(s, center, angle)) {
                        scene.add_shape(rotated);
                    }
                }
            }
        }
        Some(scene)
    }

    /// Handle a keyboard event. Returns true if the key was consumed.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed(key) = event else {
            return false;
        };
        if key == "Escape" {
            if self.tool_manager.is_active() {
                self.cancel();
            } else {
                self.exit_editing();
            }
            return true;
        }
        if !self.tool().accepts_text_input() {
            log::trace!("key {key:?} ignored under {} tool", self.tool().name());
            return false;
        }
        let Some(id) = self.selection.editing() else {
            return false;
        };
        let Some(edit_key) = EditKey::parse(key) else {
            log::trace!("key {key:?} not accepted in text edit");
            return false;
        };
        self.edit_text(id, edit_key);
        true
    }

    fn edit_text(&mut self, id: ShapeId, key: EditKey) {
        let mut scene = self.scene().clone();
        let Some(text) = scene.get_shape_mut(id).and_then(Shape::as_text_mut) else {
            log::debug!("edited text {id} no longer exists");
            self.exit_editing();
            return;
        };

        match apply_key(text, key) {
            EditOutcome::Changed => match self.edit_session {
                Some(session) => self.history.commit_coalesced(scene, session),
                None => self.commit(scene),
            },
            EditOutcome::Unchanged => {}
            EditOutcome::Exit => self.exit_editing(),
            EditOutcome::Remove => {
                let current = self.scene();
                let scene = if current.len() == 1 {
                    Scene::new()
                } else {
                    let mut remaining = current.clone();
                    remaining.remove_shape(id);
                    remaining
                };
                log::debug!("removed text {id}");
                self.commit(scene);
                self.exit_editing();
            }
        }
    }
}

/// Copy of `scene` with the listed items moved by `delta`.
fn translated(scene: &Scene, ids: &[ShapeId], delta: Vec2) -> Scene {
    let mut scene = scene.clone();
    for &id in ids {
        if let Some(moved) = scene.get_shape(id).map(|s| apply_translation(s, delta)) {
            scene.add_shape(moved);
        }
    }
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, ShapeKind};

    fn drag(canvas: &mut Canvas, from: (f64, f64), to: (f64, f64)) {
        canvas.handle_pointer_event(&PointerEvent::down(from.0, from.1));
        canvas.handle_pointer_event(&PointerEvent::moved((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
        canvas.handle_pointer_event(&PointerEvent::up(to.0, to.1));
    }

    fn type_keys(canvas: &mut Canvas, keys: &[&str]) {
        for key in keys {
            canvas.handle_key_event(&KeyEvent::press(*key));
        }
    }

    fn with_rects(rects: &[(f64, f64, f64, f64)]) -> (Canvas, Vec<ShapeId>) {
        let mut scene = Scene::new();
        let mut ids = Vec::new();
        for &(x, y, w, h) in rects {
            let shape = Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h));
            ids.push(shape.id());
            scene.add_shape(shape);
        }
        let mut canvas = Canvas::with_scene(scene, Settings::default());
        canvas.set_tool(ToolKind::Cursor);
        (canvas, ids)
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new();
        assert_eq!(canvas.tool(), ToolKind::Pen);
        assert_eq!(canvas.item_count(), 0);
        assert_eq!(canvas.history_pointer(), 0);
        assert!(canvas.overlay().is_none());
    }

    #[test]
    fn test_draw_rectangle_commits_on_release() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);
        canvas.handle_pointer_event(&PointerEvent::down(10.0, 10.0));
        canvas.handle_pointer_event(&PointerEvent::moved(50.0, 40.0));
        assert_eq!(canvas.item_count(), 0);
        assert!(canvas.preview_shape().is_some());

        canvas.handle_pointer_event(&PointerEvent::up(60.0, 50.0));
        assert_eq!(canvas.item_count(), 1);
        assert_eq!(canvas.history_pointer(), 1);
        assert!(canvas.preview_shape().is_none());

        let shape = canvas.visible_items().next().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert!((shape.bounds().width() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_with_shape_tool_commits_nothing() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Circle);
        drag(&mut canvas, (10.0, 10.0), (10.0, 10.0));
        assert_eq!(canvas.item_count(), 0);
        assert_eq!(canvas.history_pointer(), 0);
    }

    #[test]
    fn test_pen_uses_logical_coordinates() {
        let mut canvas = Canvas::new();
        canvas.camera.offset = Vec2::new(100.0, 50.0);
        canvas.camera.zoom = 2.0;
        drag(&mut canvas, (100.0, 50.0), (140.0, 90.0));
        let bounds = canvas.scene().bounds().unwrap();
        assert!(bounds.x0.abs() < 1e-9 && bounds.y0.abs() < 1e-9);
        assert!((bounds.x1 - 20.0).abs() < 1e-9 && (bounds.y1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_leave_cancels_drawing() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Line);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer_event(&PointerEvent::moved(30.0, 0.0));
        canvas.handle_pointer_event(&PointerEvent::Leave);
        canvas.handle_pointer_event(&PointerEvent::up(30.0, 0.0));
        assert_eq!(canvas.item_count(), 0);
    }

    #[test]
    fn test_right_button_ignored() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Right,
        });
        assert!(!canvas.tool_manager.is_active());
    }

    #[test]
    fn test_click_selects_single_item() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 50.0, 50.0), (100.0, 0.0, 50.0, 50.0)]);
        drag(&mut canvas, (0.0, 25.0), (0.0, 25.0));
        assert_eq!(canvas.selection(), &[ids[0]]);

        drag(&mut canvas, (150.0, 25.0), (150.0, 25.0));
        assert_eq!(canvas.selection(), &[ids[1]]);

        // Empty canvas clears
        drag(&mut canvas, (75.0, 200.0), (75.0, 200.0));
        assert!(canvas.selection().is_empty());
        assert_eq!(canvas.history_pointer(), 0);
    }

    #[test]
    fn test_marquee_selects_enclosed_items_only() {
        let (mut canvas, ids) = with_rects(&[
            (10.0, 10.0, 20.0, 20.0),
            (40.0, 10.0, 20.0, 20.0),
            (90.0, 10.0, 40.0, 20.0),
        ]);
        drag(&mut canvas, (0.0, 0.0), (100.0, 50.0));
        assert_eq!(canvas.selection(), &ids[..2]);
        assert!(canvas.marquee().is_none());
    }

    #[test]
    fn test_marquee_reversed_direction() {
        let (mut canvas, ids) = with_rects(&[(10.0, 10.0, 20.0, 20.0)]);
        drag(&mut canvas, (100.0, 100.0), (0.0, 0.0));
        assert_eq!(canvas.selection(), &ids[..]);
    }

    #[test]
    fn test_move_selected_commits_once() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 50.0, 50.0)]);
        drag(&mut canvas, (0.0, 25.0), (30.0, 45.0));
        assert_eq!(canvas.history_pointer(), 1);
        let bounds = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!((bounds.x0 - 30.0).abs() < 1e-9);
        assert!((bounds.y0 - 20.0).abs() < 1e-9);

        assert!(canvas.undo());
        let bounds = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!(bounds.x0.abs() < 1e-9);
    }

    #[test]
    fn test_drag_preview_does_not_touch_history() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 50.0, 50.0)]);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 25.0));
        canvas.handle_pointer_event(&PointerEvent::moved(10.0, 25.0));
        let preview = canvas.display_scene().get_shape(ids[0]).unwrap().bounds();
        assert!((preview.x0 - 10.0).abs() < 1e-9);
        let committed = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!(committed.x0.abs() < 1e-9);
        assert_eq!(canvas.history_pointer(), 0);
    }

    #[test]
    fn test_resize_from_corner_handle() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 100.0, 100.0)]);
        canvas.select(ids[0]);
        drag(&mut canvas, (100.0, 100.0), (150.0, 50.0));
        let bounds = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!(bounds.x0.abs() < 1e-9 && bounds.y0.abs() < 1e-9);
        assert!((bounds.x1 - 150.0).abs() < 1e-9);
        assert!((bounds.y1 - 50.0).abs() < 1e-9);
        assert_eq!(canvas.history_pointer(), 1);
    }

    #[test]
    fn test_resize_below_minimum_is_refused() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 100.0, 100.0)]);
        canvas.select(ids[0]);
        drag(&mut canvas, (100.0, 100.0), (3.0, 50.0));
        assert_eq!(canvas.history_pointer(), 0);
        let bounds = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!((bounds.x1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_handle() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 100.0, 20.0)]);
        canvas.select(ids[0]);
        let overlay = canvas.overlay().unwrap();
        let handle = overlay
            .handles
            .iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap()
            .position;
        let center = overlay.bounds.center();
        // Quarter turn clockwise around the center
        let target = Point::new(center.x + (center.y - handle.y), center.y);
        drag(&mut canvas, (handle.x, handle.y), (target.x, target.y));

        let shape = canvas.scene().get_shape(ids[0]).unwrap();
        assert!((shape.placement().rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((shape.bounds().width() - 20.0).abs() < 1e-9);
        assert!(shape.bounds().center().distance(center) < 1e-9);
    }

    #[test]
    fn test_resize_rotated_item_fills_box() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 100.0, 20.0)]);
        canvas.select(ids[0]);
        let overlay = canvas.overlay().unwrap();
        let handle = overlay
            .handles
            .iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap()
            .position;
        let center = overlay.bounds.center();
        let target = Point::new(center.x + (center.y - handle.y), center.y);
        drag(&mut canvas, (handle.x, handle.y), (target.x, target.y));

        let rotated = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!((rotated.x0 - 40.0).abs() < 1e-6 && (rotated.width() - 20.0).abs() < 1e-6);

        // Widen the 20x100 box by 20 from its bottom-right corner
        drag(&mut canvas, (rotated.x1, rotated.y1), (rotated.x1 + 20.0, rotated.y1));
        let bounds = canvas.scene().get_shape(ids[0]).unwrap().bounds();
        assert!((bounds.x0 - rotated.x0).abs() < 1e-6);
        assert!((bounds.y0 - rotated.y0).abs() < 1e-6);
        assert!((bounds.width() - 40.0).abs() < 1e-6);
        assert!((bounds.height() - 100.0).abs() < 1e-6);
        assert_eq!(canvas.history_pointer(), 2);
    }

    #[test]
    fn test_set_tool_clears_selection_and_edit() {
        let (mut canvas, ids) = with_rects(&[(0.0, 0.0, 50.0, 50.0)]);
        canvas.select(ids[0]);
        canvas.set_tool(ToolKind::Pen);
        assert!(canvas.selection().is_empty());

        canvas.set_tool(ToolKind::Text);
        drag(&mut canvas, (200.0, 200.0), (200.0, 200.0));
        assert!(canvas.editing().is_some());
        canvas.set_tool(ToolKind::Cursor);
        assert!(canvas.editing().is_none());
    }

    #[test]
    fn test_text_tool_places_placeholder() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.handle_pointer_event(&PointerEvent::down(40.0, 60.0));
        assert_eq!(canvas.item_count(), 1);
        let id = canvas.editing().unwrap();
        let text = canvas.scene().get_shape(id).unwrap().as_text().unwrap();
        assert_eq!(text.content, "Start typing");
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
        assert_eq!(text.position, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_text_editing_is_one_undo_step() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        let id = canvas.editing().unwrap();
        type_keys(&mut canvas, &["Backspace", "Backspace", "!", "@", "Shift", "ArrowLeft"]);

        let content = |c: &Canvas| c.scene().get_shape(id).unwrap().as_text().unwrap().content.clone();
        assert_eq!(content(&canvas), "Start typi!");
        assert_eq!(canvas.history_pointer(), 2);

        assert!(canvas.undo());
        assert_eq!(content(&canvas), "Start typing");
        assert!(canvas.undo());
        assert_eq!(canvas.item_count(), 0);
        assert!(canvas.editing().is_none());
    }

    #[test]
    fn test_enter_exits_edit_mode() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        assert!(canvas.handle_key_event(&KeyEvent::press("Enter")));
        assert!(canvas.editing().is_none());
        assert!(!canvas.handle_key_event(&KeyEvent::press("a")));
    }

    #[test]
    fn test_keys_ignored_under_drawing_tools() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        let id = canvas.editing().unwrap();
        canvas.tool_manager.set_tool(ToolKind::Pen);
        assert!(!canvas.handle_key_event(&KeyEvent::press("x")));
        let text = canvas.scene().get_shape(id).unwrap().as_text().unwrap();
        assert_eq!(text.content, "Start typing");
    }

    #[test]
    fn test_cursor_click_on_text_enters_edit() {
        let mut scene = Scene::new();
        let text = Shape::Text(Text::new(Point::new(0.0, 0.0), "Hello".to_string()));
        let id = text.id();
        scene.add_shape(text);
        let mut canvas = Canvas::with_scene(scene, Settings::default());
        canvas.set_tool(ToolKind::Cursor);

        drag(&mut canvas, (10.0, 10.0), (10.0, 10.0));
        assert_eq!(canvas.editing(), Some(id));
        assert!(canvas.selection().is_empty());

        type_keys(&mut canvas, &["!"]);
        let text = canvas.scene().get_shape(id).unwrap().as_text().unwrap();
        assert_eq!(text.content, "Hello!");
    }

    #[test]
    fn test_editing_vanished_text_is_noop() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        canvas.undo();
        assert!(canvas.editing().is_none());
        assert!(!canvas.handle_key_event(&KeyEvent::press("a")));
        assert_eq!(canvas.item_count(), 0);
        assert!(canvas.can_redo());
    }

    #[test]
    fn test_undo_prunes_selection() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);
        drag(&mut canvas, (0.0, 0.0), (50.0, 50.0));
        canvas.set_tool(ToolKind::Cursor);
        canvas.select_all();
        assert_eq!(canvas.selection().len(), 1);
        canvas.undo();
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_hand_pans_camera() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Hand);
        drag(&mut canvas, (10.0, 10.0), (40.0, 30.0));
        assert!((canvas.camera.offset.x - 30.0).abs() < f64::EPSILON);
        assert!((canvas.camera.offset.y - 20.0).abs() < f64::EPSILON);
        assert_eq!(canvas.history_pointer(), 0);
    }

    #[test]
    fn test_zoom_buttons_clamp() {
        let mut canvas = Canvas::new();
        assert!(canvas.zoom_in());
        assert_eq!(canvas.zoom_percent(), 110);
        for _ in 0..20 {
            canvas.zoom_in();
        }
        assert_eq!(canvas.zoom_percent(), 200);
        assert!(!canvas.zoom_in());
        for _ in 0..30 {
            canvas.zoom_out();
        }
        assert_eq!(canvas.zoom_percent(), 10);
        canvas.reset_view();
        assert_eq!(canvas.zoom_percent(), 100);
    }

    #[test]
    fn test_scroll_zooms_around_pointer() {
        let mut canvas = Canvas::new();
        let anchor = Point::new(200.0, 100.0);
        let before = canvas.camera.screen_to_world(anchor);
        canvas.handle_pointer_event(&PointerEvent::Scroll {
            position: anchor,
            delta: Vec2::new(0.0, -1.0),
        });
        assert!(canvas.camera.zoom > 1.0);
        let after = canvas.camera.screen_to_world(anchor);
        assert!(before.distance(after) < 1e-9);
    }

    #[test]
    fn test_new_items_use_current_style() {
        let mut canvas = Canvas::new();
        canvas.set_stroke_color(SerializableColor::new(255, 0, 0, 255));
        canvas.set_stroke_width(2.0);
        canvas.set_stroke_width(-1.0);
        canvas.set_tool(ToolKind::Line);
        drag(&mut canvas, (0.0, 0.0), (10.0, 0.0));
        let style = canvas.visible_items().next().unwrap().style().clone();
        assert_eq!(style.stroke_color, SerializableColor::new(255, 0, 0, 255));
        assert!((style.stroke_width - 2.0).abs() < f64::EPSILON);

        canvas.set_stroke_color(peniko::Color::from_rgba8(0, 128, 0, 255));
        drag(&mut canvas, (0.0, 10.0), (10.0, 10.0));
        let style = canvas.visible_items().last().unwrap().style().clone();
        assert_eq!(style.stroke_color, SerializableColor::new(0, 128, 0, 255));
    }

    #[test]
    fn test_invalid_zoom_settings_fall_back() {
        let settings = Settings {
            min_zoom: 0.0,
            zoom_step: -1.0,
            ..Settings::default()
        };
        let mut canvas = Canvas::with_settings(settings);
        while canvas.zoom_out() {}
        assert!((canvas.camera.zoom - 0.1).abs() < 1e-9);
        assert!(canvas.camera.screen_to_world(Point::new(10.0, 10.0)).x.is_finite());
    }

    #[test]
    fn test_release_at_last_position_adds_no_point() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer_event(&PointerEvent::moved(10.0, 0.0));
        canvas.handle_pointer_event(&PointerEvent::up(10.0, 0.0));
        let Some(Shape::Pen(stroke)) = canvas.visible_items().next() else {
            panic!("expected a pen stroke");
        };
        assert_eq!(stroke.points, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);

        // A release somewhere new still lands in the stroke
        canvas.handle_pointer_event(&PointerEvent::down(0.0, 20.0));
        canvas.handle_pointer_event(&PointerEvent::up(15.0, 20.0));
        let Some(Shape::Pen(stroke)) = canvas.visible_items().last() else {
            panic!("expected a pen stroke");
        };
        assert_eq!(stroke.points.len(), 2);
        assert_eq!(stroke.points[1], Point::new(15.0, 20.0));
    }
}
