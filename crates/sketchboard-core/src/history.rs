//! Undo/redo history over immutable scene snapshots.
//!
//! The history is a list of committed scenes and a pointer. The visible
//! scene is the base scene when the pointer is 0, otherwise the entry just
//! before the pointer. Undo and redo only move the pointer; a new commit
//! discards everything at or after the pointer before appending, so the
//! undone future is dropped, never merged.

use crate::scene::Scene;

/// Key used to fold consecutive commits into one entry.
pub type CoalesceKey = u64;

#[derive(Debug, Clone)]
struct Entry {
    scene: Scene,
    coalesce: Option<CoalesceKey>,
}

/// Truncate-and-append snapshot history.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Scene visible when nothing is applied.
    base: Scene,
    /// Committed scenes, oldest first.
    entries: Vec<Entry>,
    /// Number of applied entries, in `0..=entries.len()`.
    pointer: usize,
    /// Maximum number of entries kept.
    limit: Option<usize>,
}

impl History {
    /// Create an empty history over an empty base scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history with a starting scene that cannot be undone.
    pub fn with_base(base: Scene) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Limit the number of kept entries. Older entries fold into the base scene.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// The currently visible scene.
    pub fn current(&self) -> &Scene {
        match self.pointer {
            0 => &self.base,
            n => &self.entries[n - 1].scene,
        }
    }

    /// Commit a new scene, discarding any undone entries.
    pub fn commit(&mut self, scene: Scene) {
        self.push(scene, None);
    }

    /// Commit a scene that replaces the head entry when the previous commit
    /// used the same key and nothing has been undone since.
    pub fn commit_coalesced(&mut self, scene: Scene, key: CoalesceKey) {
        let head_matches = self.pointer == self.entries.len()
            && self
                .entries
                .last()
                .is_some_and(|entry| entry.coalesce == Some(key));
        if head_matches {
            if let Some(head) = self.entries.last_mut() {
                head.scene = scene;
                log::trace!("history: amended head entry {}", self.pointer);
                return;
            }
        }
        self.push(scene, Some(key));
    }

    fn push(&mut self, scene: Scene, coalesce: Option<CoalesceKey>) {
        let discarded = self.entries.len() - self.pointer;
        if discarded > 0 {
            log::debug!("history: discarding {discarded} undone entries");
        }
        self.entries.truncate(self.pointer);
        self.entries.push(Entry { scene, coalesce });
        self.pointer = self.entries.len();
        self.enforce_limit();
        log::debug!("history: committed entry {}", self.pointer);
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else { return };
        while self.entries.len() > limit && self.pointer > 0 {
            let oldest = self.entries.remove(0);
            self.base = oldest.scene;
            self.pointer -= 1;
        }
    }

    /// Undo the last applied entry. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        if self.pointer == 0 {
            log::trace!("history: nothing to undo");
            return false;
        }
        self.pointer -= 1;
        self.seal_head();
        true
    }

    /// Redo the next undone entry. Returns false when nothing is undone.
    pub fn redo(&mut self) -> bool {
        if self.pointer >= self.entries.len() {
            log::trace!("history: nothing to redo");
            return false;
        }
        self.pointer += 1;
        self.seal_head();
        true
    }

    /// Stop future coalesced commits from amending the entries that were
    /// just stepped over.
    fn seal_head(&mut self) {
        for entry in &mut self.entries {
            entry.coalesce = None;
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.pointer < self.entries.len()
    }

    /// Number of applied entries.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Number of entries, applied or undone.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
