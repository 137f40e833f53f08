//! Authoritative folder collection and its reconciliation
//!
//! The reconciler owns the ordered list together with everything indexed by
//! position into it (the selection and the retained row handles). Every
//! operation that changes the list updates those in the same call, so no
//! caller can observe a position past the end of the list.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use tracing::{debug, warn};

use super::data::Directory;
use super::selection::{ActionMode, Selection};

/// Order- and content-sensitive summary of a collection
pub fn fingerprint(dirs: &[Directory]) -> u64 {
    let mut hasher = DefaultHasher::new();
    dirs.hash(&mut hasher);
    hasher.finish()
}

/// New index of `old` once the ascending `removed` positions are gone
///
/// Returns `None` when `old` itself was removed.
pub fn shifted_index(old: usize, removed: &[usize]) -> Option<usize> {
    if removed.binary_search(&old).is_ok() {
        return None;
    }
    let below = removed.partition_point(|&position| position <= old);
    Some(old - below)
}

/// Position-keyed cache of retained row handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCache<H> {
    rows: BTreeMap<usize, H>,
}

impl<H> Default for RowCache<H> {
    fn default() -> Self {
        Self { rows: BTreeMap::new() }
    }
}

impl<H> RowCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `handle` as the row bound at `position`
    pub fn insert(&mut self, position: usize, handle: H) -> Option<H> {
        self.rows.insert(position, handle)
    }

    pub fn get(&self, position: usize) -> Option<&H> {
        self.rows.get(&position)
    }

    pub fn remove(&mut self, position: usize) -> Option<H> {
        self.rows.remove(&position)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> {
        self.rows.iter().map(|(&position, handle)| (position, handle))
    }

    /// Drop handles bound at or past `len`
    pub fn truncate(&mut self, len: usize) {
        self.rows.retain(|&position, _| position < len);
    }

    /// Move every surviving handle to its shifted index, dropping removed rows
    ///
    /// `removed` must be sorted ascending.
    pub fn remap_after_removal(&mut self, removed: &[usize]) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = rows
            .into_iter()
            .filter_map(|(position, handle)| shifted_index(position, removed).map(|new| (new, handle)))
            .collect();
    }
}

impl<H: PartialEq> RowCache<H> {
    /// Forget `handle` wherever it is bound
    pub fn forget(&mut self, handle: &H) -> Option<usize> {
        let position = self.rows.iter().find(|(_, h)| *h == handle).map(|(&p, _)| p)?;
        self.rows.remove(&position);
        Some(position)
    }
}

/// What a reconcile step did to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// Same fingerprint, nothing to render
    Unchanged,
    /// Everything changed; the selection was cleared
    Full { action_mode: ActionMode },
    /// Only `removed` rows (descending) left the list
    Incremental { removed: Vec<usize>, action_mode: ActionMode },
}

/// Owner of the folder list, its selection and its row cache
#[derive(Debug)]
pub struct Reconciler<H> {
    dirs: Vec<Directory>,
    fingerprint: u64,
    selection: Selection,
    rows: RowCache<H>,
}

impl<H> Reconciler<H> {
    pub fn new(dirs: Vec<Directory>) -> Self {
        let dirs = dedup_paths(dirs);
        let fingerprint = fingerprint(&dirs);
        Self {
            dirs,
            fingerprint,
            selection: Selection::new(),
            rows: RowCache::new(),
        }
    }

    pub fn dirs(&self) -> &[Directory] {
        &self.dirs
    }

    pub fn get(&self, position: usize) -> Option<&Directory> {
        self.dirs.get(position)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Fingerprint of the last accepted collection
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Position of the entry with `path`
    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.dirs.iter().position(|dir| dir.path == path)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn rows(&self) -> &RowCache<H> {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut RowCache<H> {
        &mut self.rows
    }

    pub fn select(&mut self, position: usize) -> ActionMode {
        self.selection.select(position, self.dirs.len())
    }

    pub fn deselect(&mut self, position: usize) -> ActionMode {
        self.selection.deselect(position)
    }

    pub fn select_all(&mut self) -> ActionMode {
        self.selection.select_all(self.dirs.len())
    }

    pub fn clear_selection(&mut self) -> ActionMode {
        self.selection.clear()
    }

    /// Paths of the selected entries, in position order
    pub fn selected_paths(&self) -> Vec<String> {
        self.selection.paths(&self.dirs)
    }

    /// Selected entries, in position order
    pub fn selected_dirs(&self) -> Vec<&Directory> {
        self.selection
            .positions()
            .iter()
            .filter_map(|&position| self.dirs.get(position))
            .collect()
    }

    /// Accept a new collection wholesale
    ///
    /// A fingerprint-equal collection is a no-op. Anything else replaces the
    /// list and clears the selection.
    pub fn replace(&mut self, dirs: Vec<Directory>) -> Reconcile {
        let dirs = dedup_paths(dirs);
        let fingerprint = fingerprint(&dirs);
        if fingerprint == self.fingerprint {
            debug!("Folder list unchanged ({} entries)", dirs.len());
            return Reconcile::Unchanged;
        }

        self.dirs = dirs;
        self.fingerprint = fingerprint;
        self.rows.truncate(self.dirs.len());
        let action_mode = self.selection.clear();
        debug!("Folder list reset ({} entries)", self.dirs.len());
        Reconcile::Full { action_mode }
    }

    /// Remove every entry matching `remove`, keeping the rest in order
    ///
    /// Selection and row cache are shifted in the same step.
    pub fn remove_where(&mut self, mut remove: impl FnMut(&Directory) -> bool) -> Reconcile {
        let removed: Vec<usize> = self
            .dirs
            .iter()
            .enumerate()
            .filter(|(_, dir)| remove(dir))
            .map(|(position, _)| position)
            .collect();
        if removed.is_empty() {
            return Reconcile::Unchanged;
        }

        for &position in removed.iter().rev() {
            self.dirs.remove(position);
        }
        self.fingerprint = fingerprint(&self.dirs);
        self.rows.remap_after_removal(&removed);
        let action_mode = self.selection.remap_after_removal(&removed);

        debug!("Removed {} folders from the list, {} left", removed.len(), self.dirs.len());
        let mut removed = removed;
        removed.reverse();
        Reconcile::Incremental { removed, action_mode }
    }

    /// Rewrite entries in place, then reconcile as a wholesale replacement
    pub fn update_each(&mut self, update: impl FnMut(&mut Directory)) -> Reconcile {
        let mut dirs = self.dirs.clone();
        dirs.iter_mut().for_each(update);
        self.replace(dirs)
    }

    /// Rename the entry at `position`
    pub fn rename_at(&mut self, position: usize, new_path: &str) -> Reconcile {
        if position >= self.dirs.len() {
            warn!("Rename of stale position {}", position);
            return Reconcile::Unchanged;
        }
        if self.position_of(new_path).is_some_and(|other| other != position) {
            warn!("Rename onto listed folder {}", new_path);
            return Reconcile::Unchanged;
        }
        let mut dirs = self.dirs.clone();
        dirs[position].rename(new_path);
        self.replace(dirs)
    }
}

/// Keep the first entry for every path
fn dedup_paths(dirs: Vec<Directory>) -> Vec<Directory> {
    let count = dirs.len();
    let mut seen = HashSet::with_capacity(count);
    let unique: Vec<Directory> = dirs.into_iter().filter(|dir| seen.insert(dir.path.clone())).collect();
    if unique.len() != count {
        warn!("Dropped {} duplicate folder paths", count - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Location;

    fn dirs(names: &[&str]) -> Vec<Directory> {
        names
            .iter()
            .map(|name| Directory::new(format!("/{}", name), format!("/{}/1.jpg", name), 1, Location::Internal))
            .collect()
    }

    fn names(reconciler: &Reconciler<u32>) -> Vec<String> {
        reconciler.dirs().iter().map(|dir| dir.name.clone()).collect()
    }

    #[test]
    fn test_shifted_index() {
        let removed = [1, 3];
        assert_eq!(shifted_index(0, &removed), Some(0));
        assert_eq!(shifted_index(1, &removed), None);
        assert_eq!(shifted_index(2, &removed), Some(1));
        assert_eq!(shifted_index(4, &removed), Some(2));
    }

    #[test]
    fn test_replace_twice_notifies_once() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a"]));
        let first = reconciler.replace(dirs(&["a", "b"]));
        let second = reconciler.replace(dirs(&["a", "b"]));

        assert!(matches!(first, Reconcile::Full { .. }));
        assert_eq!(second, Reconcile::Unchanged);
    }

    #[test]
    fn test_reorder_counts_as_change() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b"]));
        assert!(matches!(reconciler.replace(dirs(&["b", "a"])), Reconcile::Full { .. }));
    }

    #[test]
    fn test_replace_clears_selection_and_ends_action_mode() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b", "c"]));
        reconciler.select(2);

        let result = reconciler.replace(dirs(&["a"]));
        assert_eq!(result, Reconcile::Full { action_mode: ActionMode::Ended });
        assert!(reconciler.selection().is_empty());
    }

    #[test]
    fn test_selection_stays_in_bounds_across_replaces() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b", "c", "d"]));
        let rounds: [&[&str]; 4] = [&["a", "b"], &["x", "y", "z", "w", "v"], &[], &["q"]];
        for round in rounds {
            reconciler.select_all();
            reconciler.replace(dirs(round));
            assert!(reconciler.selection().positions().iter().all(|&p| p < reconciler.len()));
            reconciler.select(reconciler.len().saturating_sub(1));
            assert!(reconciler.selection().positions().iter().all(|&p| p < reconciler.len()));
        }
    }

    #[test]
    fn test_incremental_removal_remaps_rows_and_selection() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b", "c", "d", "e"]));
        for position in 0..5 {
            reconciler.rows_mut().insert(position, 100 + position as u32);
        }
        for position in [0, 2, 4] {
            reconciler.select(position);
        }

        let result = reconciler.remove_where(|dir| dir.name == "b" || dir.name == "d");
        assert_eq!(
            result,
            Reconcile::Incremental {
                removed: vec![3, 1],
                action_mode: ActionMode::Unchanged
            }
        );

        assert_eq!(names(&reconciler), vec!["a", "c", "e"]);
        assert_eq!(reconciler.rows().get(2), Some(&104));
        assert_eq!(reconciler.rows().get(1), Some(&102));
        assert_eq!(reconciler.rows().len(), 3);
        assert_eq!(reconciler.selected_paths(), vec!["/a", "/c", "/e"]);
        assert_eq!(reconciler.fingerprint(), fingerprint(reconciler.dirs()));
    }

    #[test]
    fn test_removal_of_whole_selection_ends_action_mode() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b", "c"]));
        reconciler.select(1);

        let result = reconciler.remove_where(|dir| dir.name == "b");
        assert_eq!(
            result,
            Reconcile::Incremental {
                removed: vec![1],
                action_mode: ActionMode::Ended
            }
        );
    }

    #[test]
    fn test_remove_nothing_is_unchanged() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a"]));
        assert_eq!(reconciler.remove_where(|_| false), Reconcile::Unchanged);
    }

    #[test]
    fn test_duplicate_paths_are_dropped() {
        let reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b", "a"]));
        assert_eq!(names(&reconciler), vec!["a", "b"]);
    }

    #[test]
    fn test_rename_at_resets_list() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b"]));
        reconciler.select(1);

        let result = reconciler.rename_at(1, "/renamed");
        assert_eq!(result, Reconcile::Full { action_mode: ActionMode::Ended });
        assert_eq!(reconciler.dirs()[1].thumbnail, "/renamed/1.jpg");
        assert_eq!(reconciler.rename_at(9, "/x"), Reconcile::Unchanged);
    }

    #[test]
    fn test_rename_onto_listed_path_is_refused() {
        let mut reconciler: Reconciler<u32> = Reconciler::new(dirs(&["a", "b"]));
        reconciler.select(1);
        let before = reconciler.fingerprint();

        assert_eq!(reconciler.rename_at(1, "/a"), Reconcile::Unchanged);
        assert_eq!(names(&reconciler), vec!["a", "b"]);
        assert_eq!(reconciler.fingerprint(), before);
        assert!(reconciler.selection().contains(1));
    }

    #[test]
    fn test_row_cache_forget_and_truncate() {
        let mut rows: RowCache<u32> = RowCache::new();
        rows.insert(0, 7);
        rows.insert(3, 9);
        assert_eq!(rows.forget(&9), Some(3));
        rows.insert(5, 1);
        rows.truncate(2);
        assert_eq!(rows.iter().collect::<Vec<_>>(), vec![(0, &7)]);
    }
}
