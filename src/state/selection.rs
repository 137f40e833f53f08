//! Multi-selection over the folder list
//!
//! Positions index into the current collection. The tracker itself does not
//! own the collection, so every mutation that can grow the set takes the
//! current length and refuses positions past it.

use std::collections::BTreeSet;

use super::collection::shifted_index;
use super::data::Directory;

/// What a selection change did to action mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    Unchanged,
    /// Selection went from empty to non-empty
    Started,
    /// Selection went from non-empty to empty
    Ended,
}

impl ActionMode {
    fn between(was_empty: bool, now_empty: bool) -> Self {
        match (was_empty, now_empty) {
            (true, false) => ActionMode::Started,
            (false, true) => ActionMode::Ended,
            _ => ActionMode::Unchanged,
        }
    }
}

/// Set of selected positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    positions: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `position`; positions outside `0..len` are ignored
    pub fn select(&mut self, position: usize, len: usize) -> ActionMode {
        if position >= len {
            return ActionMode::Unchanged;
        }
        let was_empty = self.positions.is_empty();
        self.positions.insert(position);
        ActionMode::between(was_empty, false)
    }

    pub fn deselect(&mut self, position: usize) -> ActionMode {
        let was_empty = self.positions.is_empty();
        self.positions.remove(&position);
        ActionMode::between(was_empty, self.positions.is_empty())
    }

    /// Select every position of a collection of `len` entries
    pub fn select_all(&mut self, len: usize) -> ActionMode {
        let was_empty = self.positions.is_empty();
        self.positions = (0..len).collect();
        ActionMode::between(was_empty, self.positions.is_empty())
    }

    pub fn clear(&mut self) -> ActionMode {
        let was_empty = self.positions.is_empty();
        self.positions.clear();
        ActionMode::between(was_empty, true)
    }

    /// Selected positions in ascending order
    pub fn positions(&self) -> &BTreeSet<usize> {
        &self.positions
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Exactly one entry selected
    pub fn is_single(&self) -> bool {
        self.positions.len() == 1
    }

    /// Lowest selected position
    pub fn first(&self) -> Option<usize> {
        self.positions.iter().next().copied()
    }

    /// Paths of the selected entries, in position order
    ///
    /// Positions without an entry in `dirs` are skipped, so the result never
    /// names a folder that is no longer in the list.
    pub fn paths(&self, dirs: &[Directory]) -> Vec<String> {
        self.positions
            .iter()
            .filter_map(|&position| dirs.get(position))
            .map(|dir| dir.path.clone())
            .collect()
    }

    /// Shift surviving positions down after `removed` positions left the list
    ///
    /// `removed` must be sorted ascending. Selected positions that were removed
    /// are dropped; the others keep pointing at the same entries.
    pub fn remap_after_removal(&mut self, removed: &[usize]) -> ActionMode {
        let was_empty = self.positions.is_empty();
        self.positions = self
            .positions
            .iter()
            .filter_map(|&position| shifted_index(position, removed))
            .collect();
        ActionMode::between(was_empty, self.positions.is_empty())
    }
}
