//! Sketchboard Core Library
//!
//! Platform-agnostic state model for the Sketchboard whiteboard: items,
//! tools, undo/redo history, selection and text editing. Hosts feed it
//! screen-space input events and draw what it exposes.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod history;
pub mod import;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod text_edit;
pub mod tools;

pub use camera::Camera;
pub use canvas::Canvas;
pub use config::Settings;
pub use history::History;
pub use import::{ImportError, ImportedImage};
pub use input::{KeyEvent, PointerEvent};
pub use scene::Scene;
pub use selection::{Handle, HandleKind, Overlay, SelectionState};
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use text_edit::EditKey;
pub use tools::{ToolKind, ToolManager};
