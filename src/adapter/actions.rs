//! Bulk actions on the selected folders
//!
//! Every action starts from the current selection. An empty selection means
//! a previous action already consumed it, so dispatching does nothing.
//! Work that finishes later captures folder paths, never positions.

use std::path::Path;

use tracing::{debug, info, warn};

use super::pending::ActionGuard;
use super::DirectoryAdapter;
use crate::error::ActionError;
use crate::fs::media::{media_children, remote_media_paths};
use crate::services::RenameRecord;
use crate::state::data::{
    covers_with, covers_without, is_pseudo_path, AlbumCover, FileItem, FAVORITES, OTG_PATH, RECYCLE_BIN, SELF_PATH,
};

/// Shown instead of the rename prompt for storage roots
pub const RENAME_ROOT_MESSAGE: &str = "Renaming the root folder of a storage is not allowed";

/// Shown when a rename lands on a folder that is already listed
pub const RENAME_TAKEN_MESSAGE: &str = "A folder with that name already exists";

/// A bulk action picked from the action-mode menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Properties,
    Rename,
    Pin,
    Unpin,
    EmptyRecycleBin,
    EmptyAndDisableRecycleBin,
    Hide,
    Unhide,
    Exclude,
    CopyTo,
    MoveTo,
    SelectAll,
    Delete,
    /// Pick a medium as the folder cover
    PickCover,
    /// Drop the folder's cover override
    DefaultCover,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Properties => "properties",
            Action::Rename => "rename",
            Action::Pin => "pin",
            Action::Unpin => "unpin",
            Action::EmptyRecycleBin => "empty recycle bin",
            Action::EmptyAndDisableRecycleBin => "empty and disable recycle bin",
            Action::Hide => "hide",
            Action::Unhide => "unhide",
            Action::Exclude => "exclude",
            Action::CopyTo => "copy",
            Action::MoveTo => "move",
            Action::SelectAll => "select all",
            Action::Delete => "delete",
            Action::PickCover => "pick cover",
            Action::DefaultCover => "default cover",
        }
    }
}

/// Which selection-dependent menu entries are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub rename: bool,
    pub change_cover: bool,
    pub empty_recycle_bin: bool,
    pub empty_and_disable_recycle_bin: bool,
    pub hide: bool,
    pub unhide: bool,
    pub pin: bool,
    pub unpin: bool,
}

impl DirectoryAdapter {
    /// Menu visibility for the current selection; `None` outside action mode
    pub fn menu_state(&self) -> Option<MenuState> {
        let selected = self.list.selected_paths();
        let first = selected.first()?;
        let single = selected.len() == 1;

        let hidden = selected
            .iter()
            .filter(|path| self.services.marker.is_hidden(path))
            .count();
        let pinned_folders = self.services.config.pinned();
        let pinned = selected.iter().filter(|path| pinned_folders.contains(*path)).count();

        Some(MenuState {
            rename: single && !is_pseudo_path(first),
            change_cover: single,
            empty_recycle_bin: single && first == RECYCLE_BIN,
            empty_and_disable_recycle_bin: single && first == RECYCLE_BIN,
            hide: hidden < selected.len(),
            unhide: hidden > 0,
            pin: pinned < selected.len(),
            unpin: pinned > 0,
        })
    }

    /// Run `action` against the current selection
    pub fn dispatch(&mut self, action: Action) {
        if self.list.selection().is_empty() {
            debug!("{} skipped: {}", action.name(), ActionError::EmptySelection);
            return;
        }
        let Some(guard) = self.pending.begin(action) else {
            debug!("{} skipped: still running", action.name());
            return;
        };
        info!("Dispatching {} on {} folders", action.name(), self.list.selection().len());

        let result = match action {
            Action::Properties => self.show_properties(),
            Action::Rename => self.rename_dir(&guard),
            Action::Pin => self.pin_folders(true),
            Action::Unpin => self.pin_folders(false),
            Action::EmptyRecycleBin => self.recycle_bin_action(action, &guard, Self::try_empty_recycle_bin),
            Action::EmptyAndDisableRecycleBin => {
                self.recycle_bin_action(action, &guard, Self::empty_and_disable_recycle_bin)
            }
            Action::Hide => self.toggle_folders_visibility(true, &guard),
            Action::Unhide => self.toggle_folders_visibility(false, &guard),
            Action::Exclude => self.try_exclude_folders(&guard),
            Action::CopyTo => self.copy_move_to(true, &guard),
            Action::MoveTo => self.copy_move_to(false, &guard),
            Action::SelectAll => {
                self.select_all();
                Ok(())
            }
            Action::Delete => self.ask_confirm_delete(&guard),
            Action::PickCover => self.change_album_cover(false, &guard),
            Action::DefaultCover => self.change_album_cover(true, &guard),
        };

        if let Err(e) = result {
            debug!("{} skipped: {}", action.name(), e);
        }
    }

    /// Path of the single selected folder
    fn single_selected(&self, action: Action) -> Result<String, ActionError> {
        let selection = self.list.selection();
        if !selection.is_single() {
            return Err(ActionError::NotApplicable(action.name()));
        }
        let position = selection.first().ok_or(ActionError::EmptySelection)?;
        self.list
            .get(position)
            .map(|dir| dir.path.clone())
            .ok_or(ActionError::StaleSelection(position))
    }

    fn show_properties(&mut self) -> Result<(), ActionError> {
        let paths: Vec<String> = self
            .list
            .selected_paths()
            .into_iter()
            .filter(|path| !is_pseudo_path(path))
            .collect();
        if paths.is_empty() {
            return Err(ActionError::NotApplicable(Action::Properties.name()));
        }
        self.services.prompts.properties(paths, self.services.config.show_hidden());
        Ok(())
    }

    fn rename_dir(&mut self, guard: &ActionGuard) -> Result<(), ActionError> {
        let source = self.single_selected(Action::Rename)?;
        if is_pseudo_path(&source) {
            return Err(ActionError::NotApplicable(Action::Rename.name()));
        }
        if self.services.volumes.is_storage_root(&source) {
            self.services.prompts.toast(RENAME_ROOT_MESSAGE);
            return Err(ActionError::StorageRoot(source));
        }

        let old_path = source.clone();
        let guard = guard.clone();
        let renamed = self.ui.reply(move |adapter: &mut DirectoryAdapter, new_path: String| {
            adapter.finish_rename(&old_path, &new_path, guard)
        });
        self.services.prompts.rename(&source, renamed);
        Ok(())
    }

    /// The rename prompt moved `old_path` to `new_path` on disk
    fn finish_rename(&mut self, old_path: &str, new_path: &str, guard: ActionGuard) {
        let Some(position) = self.list.position_of(old_path) else {
            debug!("Renamed folder {} is no longer listed", old_path);
            return;
        };
        if new_path != old_path && self.list.position_of(new_path).is_some() {
            warn!("Rename skipped: {}", ActionError::AlreadyListed(new_path.to_string()));
            self.services.prompts.toast(RENAME_TAKEN_MESSAGE);
            return;
        }

        let result = self.list.rename_at(position, new_path);
        let record = self.list.position_of(new_path).and_then(|p| self.list.get(p)).map(|dir| RenameRecord {
            thumbnail: dir.thumbnail.clone(),
            name: dir.name.clone(),
            path: dir.path.clone(),
            old_path: old_path.to_string(),
        });
        self.apply(result);

        if let Some(record) = record {
            info!("Renamed {} to {}", record.old_path, record.path);
            let done = self.ui.completion(move |adapter| {
                let _guard = guard;
                adapter.services.listener.refresh_items();
            });
            self.services.store.rename_directory_record(record, done);
        }
    }

    fn pin_folders(&mut self, pin: bool) -> Result<(), ActionError> {
        let paths = self.list.selected_paths();
        if pin {
            self.services.config.add_pinned(&paths);
        } else {
            self.services.config.remove_pinned(&paths);
        }

        self.pinned = self.services.config.pinned();
        self.services.listener.recheck_pinned_folders();
        self.services.view.full_reset();
        self.finish_action_mode();
        Ok(())
    }

    /// Run a recycle-bin action when the sole selection is the Recycle Bin
    fn recycle_bin_action(
        &mut self,
        action: Action,
        guard: &ActionGuard,
        run: fn(&mut Self, ActionGuard),
    ) -> Result<(), ActionError> {
        if self.single_selected(action)? != RECYCLE_BIN {
            return Err(ActionError::NotApplicable(action.name()));
        }
        run(self, guard.clone());
        Ok(())
    }

    fn try_empty_recycle_bin(&mut self, guard: ActionGuard) {
        let confirmed = self.ui.completion(move |adapter| adapter.empty_recycle_bin(guard));
        self.services.prompts.confirm_empty_recycle_bin(confirmed);
    }

    pub(super) fn empty_recycle_bin(&mut self, guard: ActionGuard) {
        let done = self.ui.completion(move |adapter| {
            let _guard = guard;
            adapter.services.listener.refresh_items();
        });
        self.services.file_ops.empty_recycle_bin(done);
    }

    fn empty_and_disable_recycle_bin(&mut self, guard: ActionGuard) {
        let confirmed = self.ui.completion(move |adapter| {
            let done = adapter.ui.completion(move |adapter| {
                let _guard = guard;
                adapter.services.config.set_recycle_bin_at_folders(false);
                adapter.services.listener.refresh_items();
            });
            adapter.services.file_ops.empty_and_disable_recycle_bin(done);
        });
        self.services.prompts.confirm_empty_recycle_bin(confirmed);
    }

    fn try_exclude_folders(&mut self, guard: &ActionGuard) -> Result<(), ActionError> {
        let selected = self.list.selected_paths();
        let paths: Vec<String> = selected
            .iter()
            .filter(|path| path.as_str() != SELF_PATH && !is_pseudo_path(path))
            .cloned()
            .collect();

        let has_recycle_bin = selected.iter().any(|path| path == RECYCLE_BIN);
        if has_recycle_bin {
            self.services.config.set_recycle_bin_at_folders(false);
            if selected.len() == 1 {
                self.refresh_and_finish();
            }
        }

        match paths.len() {
            0 if has_recycle_bin => Ok(()),
            0 => Err(ActionError::NotApplicable(Action::Exclude.name())),
            1 => {
                let guard = guard.clone();
                let excluded = self.ui.completion(move |adapter| {
                    let _guard = guard;
                    adapter.refresh_and_finish();
                });
                self.services.prompts.exclude(paths, excluded);
                Ok(())
            }
            _ => {
                info!("Excluding {} folders", paths.len());
                self.services.config.add_excluded(&paths);
                self.refresh_and_finish();
                Ok(())
            }
        }
    }

    fn copy_move_to(&mut self, is_copy: bool, guard: &ActionGuard) -> Result<(), ActionError> {
        let selected = self.list.selected_paths();
        if selected.iter().all(|path| path == FAVORITES) {
            return Err(ActionError::NotApplicable(if is_copy { "copy" } else { "move" }));
        }

        let show_hidden = self.services.config.show_hidden();
        let mut paths = Vec::new();
        for folder in &selected {
            if folder.starts_with(OTG_PATH) {
                let children = self.services.volumes.remote_children(folder);
                paths.extend(remote_media_paths(&children, show_hidden));
            } else if folder != FAVORITES {
                paths.extend(media_children(Path::new(folder), show_hidden));
            }
        }

        let items: Vec<FileItem> = paths.into_iter().map(FileItem::from_path).collect();
        info!("{} {} files", if is_copy { "Copying" } else { "Moving" }, items.len());
        let guard = guard.clone();
        let done = self.ui.completion(move |adapter| {
            let _guard = guard;
            adapter.services.config.set_temp_folder_path("");
            adapter.refresh_and_finish();
        });
        self.services.file_ops.copy_or_move(items, is_copy, done);
        Ok(())
    }

    fn change_album_cover(&mut self, use_default: bool, guard: &ActionGuard) -> Result<(), ActionError> {
        let action = if use_default { Action::DefaultCover } else { Action::PickCover };
        let folder = self.single_selected(action)?;

        if use_default {
            let covers = covers_without(&self.services.config.album_covers(), &folder);
            self.store_covers(covers);
        } else {
            self.pick_medium_from(folder.clone(), folder, guard.clone());
        }
        Ok(())
    }

    /// Let the user browse `browse` until a file is chosen as cover of `target`
    fn pick_medium_from(&self, target: String, browse: String, guard: ActionGuard) {
        let picked = self.ui.reply(move |adapter: &mut DirectoryAdapter, picked: String| {
            if Path::new(&picked).is_dir() {
                adapter.pick_medium_from(target, picked, guard);
            } else {
                let covers = covers_with(&adapter.services.config.album_covers(), &target, &picked);
                adapter.store_covers(covers);
            }
        });
        self.services.prompts.pick_medium(&browse, picked);
    }

    fn store_covers(&mut self, covers: Vec<AlbumCover>) {
        self.services.config.set_album_covers(covers);
        self.finish_action_mode();
        self.services.listener.refresh_items();
    }
}
