// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Snapshot-based undo/redo for the stroke collection.

use crate::models::annotation::Stroke;

/// History system for undo/redo functionality.
pub(crate) struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Vec<Stroke>>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Vec<Stroke>>,
    max_size: usize,
}

impl History {
    pub(crate) const DEFAULT_DEPTH: usize = 50;

    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Save current state before making a change
    pub(crate) fn push(&mut self, strokes: Vec<Stroke>) {
        self.undo_stack.push(strokes);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new action invalidates anything that was undone.
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    pub(crate) fn undo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    pub(crate) fn redo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(n: usize) -> Vec<Stroke> {
        (0..n)
            .map(|i| Stroke {
                id: format!("s{i}"),
                points: Vec::new(),
                style: Default::default(),
                created_at: chrono::Utc::now(),
            })
            .collect()
    }

    #[test]
    fn undo_redo_walks_both_stacks() {
        let mut history = History::new(10);
        history.push(snapshot(0));
        history.push(snapshot(1));

        let restored = history.undo(snapshot(2)).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again.len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut history = History::new(3);
        for n in 0..10 {
            history.push(snapshot(n));
        }
        let mut undos = 0;
        let mut current = snapshot(10);
        while let Some(prev) = history.undo(current.clone()) {
            current = prev;
            undos += 1;
        }
        assert_eq!(undos, 3);
        assert_eq!(current.len(), 7);
    }

    #[test]
    fn push_discards_redo() {
        let mut history = History::new(10);
        history.push(snapshot(0));
        history.undo(snapshot(1));
        history.push(snapshot(0));
        assert!(!history.can_redo());
        history.clear();
        assert!(!history.can_undo());
    }
}
