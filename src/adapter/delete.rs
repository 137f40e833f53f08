//! Delete with recycle-bin semantics
//!
//! Confirm, check write access, then split the selection: Favorites clears
//! the favorites table, Recycle Bin empties the bin, real folders go to the
//! delete collaborator as one batch. Each branch completes on its own.

use tracing::{info, warn};

use super::pending::ActionGuard;
use super::DirectoryAdapter;
use crate::error::ActionError;
use crate::state::data::{is_pseudo_path, Directory, FAVORITES, RECYCLE_BIN};

/// Which confirmation a delete asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePrompt {
    /// Files are gone for good
    Permanent,
    /// Files move into the recycle bin
    RecycleBin,
}

impl DeletePrompt {
    /// Permanent unless the recycle bin is on, and never for a sole pseudo-folder
    pub fn for_selection(selected: &[&Directory], use_recycle_bin: bool) -> Self {
        let sole_pseudo = selected.len() == 1 && selected[0].is_pseudo();
        if !use_recycle_bin || sole_pseudo {
            DeletePrompt::Permanent
        } else {
            DeletePrompt::RecycleBin
        }
    }
}

/// Confirmation text for deleting `selected`
pub fn delete_confirmation(selected: &[&Directory], use_recycle_bin: bool) -> String {
    let count = selected.len();
    let items = if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    };

    let question = match DeletePrompt::for_selection(selected, use_recycle_bin) {
        DeletePrompt::Permanent => format!("Are you sure you want to delete {}?", items),
        DeletePrompt::RecycleBin => format!("Are you sure you want to move {} into the Recycle Bin?", items),
    };
    let warning = if count == 1 {
        "WARNING: You are deleting 1 folder".to_string()
    } else {
        format!("WARNING: You are deleting {} folders", count)
    };

    format!("{}\n\n{}", question, warning)
}

impl DirectoryAdapter {
    pub(super) fn ask_confirm_delete(&mut self, guard: &ActionGuard) -> Result<(), ActionError> {
        let paths = self.list.selected_paths();
        if paths.is_empty() {
            return Err(ActionError::EmptySelection);
        }

        if self.services.config.skip_delete_confirmation() {
            self.delete_folders(paths, guard.clone());
            return Ok(());
        }

        let message = delete_confirmation(&self.list.selected_dirs(), self.services.config.use_recycle_bin());
        let guard = guard.clone();
        let confirmed = self.ui.completion(move |adapter| adapter.delete_folders(paths, guard));
        self.services.prompts.confirm(message, confirmed);
        Ok(())
    }

    /// Delete `paths` once write access is settled
    fn delete_folders(&mut self, paths: Vec<String>, guard: ActionGuard) {
        if paths.is_empty() {
            return;
        }

        let volumes = &self.services.volumes;
        let needs_grant = if volumes.has_write_grant() {
            None
        } else {
            paths
                .iter()
                .find(|path| !is_pseudo_path(path) && volumes.needs_write_grant(path))
                .cloned()
        };

        match needs_grant {
            None => self.execute_delete(paths, guard),
            Some(path) => {
                let denied = path.clone();
                let granted = self.ui.reply(move |adapter: &mut DirectoryAdapter, granted: bool| {
                    if granted {
                        adapter.execute_delete(paths, guard);
                    } else {
                        warn!("Delete aborted: {}", ActionError::PermissionDenied(denied));
                    }
                });
                self.services.volumes.request_write_grant(&path, granted);
            }
        }
    }

    fn execute_delete(&mut self, paths: Vec<String>, guard: ActionGuard) {
        let mut folders = Vec::with_capacity(paths.len());
        for path in paths {
            if path == FAVORITES {
                let held = guard.clone();
                let done = self.ui.completion(move |adapter| {
                    let _guard = held;
                    adapter.services.listener.refresh_items();
                });
                self.services.store.clear_favorites(done);
                self.release_pseudo(&path);
            } else if path == RECYCLE_BIN {
                self.empty_recycle_bin(guard.clone());
                self.release_pseudo(&path);
            } else {
                folders.push(path);
            }
        }

        if folders.is_empty() {
            return;
        }
        info!("Deleting {} folders", folders.len());
        let deleted = folders.clone();
        let done = self.ui.completion(move |adapter| {
            let _guard = guard;
            adapter.finish_delete(deleted);
        });
        self.services.file_ops.delete(folders, done);
    }

    /// Drop a handled pseudo-folder from the selection
    ///
    /// Action mode only ends when it was the only selected entry.
    fn release_pseudo(&mut self, path: &str) {
        let Some(position) = self.list.position_of(path) else {
            return;
        };
        if !self.list.selection().contains(position) {
            return;
        }
        if self.list.selection().is_single() {
            self.finish_action_mode();
        } else {
            self.deselect(position);
        }
    }

    /// Folders are gone on disk; unselect them and tell the screen
    fn finish_delete(&mut self, deleted: Vec<String>) {
        let positions: Vec<usize> = deleted
            .iter()
            .filter_map(|path| self.list.position_of(path))
            .collect();
        for position in positions {
            self.deselect(position);
        }
        self.services.listener.delete_folders(deleted);
    }
}
