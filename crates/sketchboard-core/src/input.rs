//! Host-neutral input events.
//!
//! Hosts translate their own mouse/touch/keyboard events into these before
//! handing them to [`Canvas`](crate::Canvas). Positions are in screen
//! pixels relative to the drawing surface.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers. Touch input reports as `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Wheel or pinch zoom around `position`.
    Scroll {
        position: Point,
        delta: Vec2,
    },
    /// Pointer left the surface; any gesture in progress is dropped.
    Leave,
}

impl PointerEvent {
    /// Left-button press at a position.
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    /// Pointer motion to a position.
    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    /// Left-button release at a position.
    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }
}

/// Keyboard event type. Keys use DOM `KeyboardEvent.key` names
/// (`"a"`, `"Backspace"`, `"ArrowLeft"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

impl KeyEvent {
    /// Key press by name.
    pub fn press(key: impl Into<String>) -> Self {
        KeyEvent::Pressed(key.into())
    }
}
