//! Keyboard editing of text items.
//!
//! Only an explicit allow-list of keys is accepted. Edits always apply at
//! the end of the content; there is no caret.

use crate::shapes::Text;

/// Punctuation accepted besides letters, digits and space.
const ALLOWED_PUNCTUATION: &[char] = &[',', '.', '?', '!'];

/// A key accepted while a text item is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Up,
    Down,
}

impl EditKey {
    /// Parse a DOM key name. Keys outside the allow-list yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "Backspace" => Some(EditKey::Backspace),
            "Delete" => Some(EditKey::Delete),
            "Enter" => Some(EditKey::Enter),
            "ArrowLeft" => Some(EditKey::Left),
            "ArrowRight" => Some(EditKey::Right),
            "ArrowUp" => Some(EditKey::Up),
            "ArrowDown" => Some(EditKey::Down),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if is_allowed_char(ch) => Some(EditKey::Character(ch)),
                    _ => None,
                }
            }
        }
    }
}

fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == ' ' || ALLOWED_PUNCTUATION.contains(&ch)
}

/// What a key did to the edited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Content changed.
    Changed,
    /// Key accepted but nothing changed.
    Unchanged,
    /// Leave edit mode.
    Exit,
    /// Remove the edited item and leave edit mode.
    Remove,
}

/// Apply a key to a text item.
pub fn apply_key(text: &mut Text, key: EditKey) -> EditOutcome {
    match key {
        EditKey::Character(ch) => {
            text.push_char(ch);
            EditOutcome::Changed
        }
        EditKey::Backspace => {
            if text.pop_char() {
                EditOutcome::Changed
            } else {
                EditOutcome::Unchanged
            }
        }
        EditKey::Delete => EditOutcome::Remove,
        EditKey::Enter => EditOutcome::Exit,
        EditKey::Left | EditKey::Right | EditKey::Up | EditKey::Down => EditOutcome::Unchanged,
    }
}
