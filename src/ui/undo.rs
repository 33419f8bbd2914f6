//! Undo/redo history for the schematic document.
//!
//! History is a linear stack of whole-document snapshots with a cursor.
//! A snapshot is committed after every discrete, user-meaningful mutation
//! (placement, drag end, label save, delete, connection add, clear) — never
//! on intermediate drag frames, so one drag is one history step.

use crate::constants::MAX_UNDO_HISTORY;
use crate::types::Schematic;

/// Snapshot-based undo/redo history.
///
/// Always holds at least one snapshot (the state before the first edit), with
/// `index` pointing at the snapshot matching the live document.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    steps: Vec<Schematic>,
    index: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self {
            steps: vec![Schematic::new()],
            index: 0,
        }
    }
}

impl UndoHistory {
    /// Creates a history seeded with one empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current document state as a new history step.
    ///
    /// Discards any redo tail and caps the stack at [`MAX_UNDO_HISTORY`]
    /// entries by dropping the oldest.
    pub fn commit(&mut self, schematic: &Schematic) {
        self.steps.truncate(self.index + 1);
        self.steps.push(schematic.clone());
        self.index += 1;

        if self.steps.len() > MAX_UNDO_HISTORY {
            self.steps.remove(0);
            self.index -= 1;
        }
    }

    /// Total number of stored snapshots, including the seed.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there is an older snapshot to restore.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Returns true if there is a newer snapshot to restore.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.steps.len()
    }

    /// Steps back one snapshot, returning the document state to restore.
    pub fn undo(&mut self) -> Option<Schematic> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.steps[self.index].clone())
    }

    /// Steps forward one snapshot, returning the document state to restore.
    pub fn redo(&mut self) -> Option<Schematic> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.steps[self.index].clone())
    }

    /// Resets the history to a single empty snapshot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CircuitNode;

    fn one_node_schematic() -> Schematic {
        let mut s = Schematic::new();
        s.add_node(CircuitNode::new("mcb-1p", (0.0, 0.0)));
        s
    }

    #[test]
    fn test_fresh_history_has_nothing_to_undo() {
        let mut history = UndoHistory::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_returns_previous_snapshot() {
        let mut history = UndoHistory::new();
        history.commit(&one_node_schematic());

        let restored = history.undo().expect("one step to undo");
        assert!(restored.nodes.is_empty());
        assert!(history.can_redo());

        let redone = history.redo().expect("one step to redo");
        assert_eq!(redone.nodes.len(), 1);
    }

    #[test]
    fn test_commit_truncates_redo_tail() {
        let mut history = UndoHistory::new();
        history.commit(&one_node_schematic());
        history.undo().unwrap();
        assert!(history.can_redo());

        let mut other = Schematic::new();
        other.add_node(CircuitNode::new("lamp-indicator", (5.0, 5.0)));
        history.commit(&other);

        assert!(!history.can_redo());
        let back = history.undo().unwrap();
        assert!(back.nodes.is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = UndoHistory::new();
        let snapshot = one_node_schematic();
        for _ in 0..(MAX_UNDO_HISTORY * 2) {
            history.commit(&snapshot);
        }

        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert!(undos < MAX_UNDO_HISTORY);
    }
}
