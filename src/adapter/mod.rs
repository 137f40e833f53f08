//! Folder list adapter
//!
//! The adapter owns the folder collection (through the reconciler), maps
//! bulk actions onto collaborator calls, and turns every accepted change
//! into the smallest notification the view needs.
//!
//! Architecture:
//! - `actions.rs` - action table, guards and menu visibility
//! - `visibility.rs` - hide / unhide with relabel or incremental removal
//! - `delete.rs` - delete with recycle-bin semantics
//! - `pending.rs` - actions still waiting on a collaborator
//! - `view.rs` - row display fields

use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::runtime::{UiHandle, UiTask};
use crate::services::{RowHandle, Services};
use crate::state::collection::{Reconcile, Reconciler, RowCache};
use crate::state::data::Directory;
use crate::state::selection::{ActionMode, Selection};
use pending::PendingActions;

pub mod actions;
pub mod delete;
mod pending;
pub mod view;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use actions::{Action, MenuState};
pub use view::{DirectoryRow, RowOptions};

/// Folder list state living on the owner thread
pub struct DirectoryAdapter {
    list: Reconciler<RowHandle>,
    services: Services,
    ui: UiHandle,
    rx: UnboundedReceiver<UiTask>,
    /// Pinned folders as of the last pin change
    pinned: HashSet<String>,
    options: RowOptions,
    pending: PendingActions,
}

impl DirectoryAdapter {
    pub fn new(dirs: Vec<Directory>, services: Services) -> Self {
        let (ui, rx) = UiHandle::channel();
        let pinned = services.config.pinned();
        let options = services.config.row_options();
        Self {
            list: Reconciler::new(dirs),
            services,
            ui,
            rx,
            pinned,
            options,
            pending: PendingActions::default(),
        }
    }

    /// Handle for queueing work onto this adapter's thread
    pub fn ui_handle(&self) -> UiHandle {
        self.ui.clone()
    }

    /// Apply every queued continuation. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(self);
            count += 1;
        }
        count
    }

    /// Wait for the next queued continuation and apply it
    pub async fn next_task(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task(self);
                true
            }
            None => false,
        }
    }

    pub fn dirs(&self) -> &[Directory] {
        self.list.dirs()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        self.list.selection()
    }

    /// Paths of the selected folders, in list order
    pub fn selected_paths(&self) -> Vec<String> {
        self.list.selected_paths()
    }

    pub fn rows(&self) -> &RowCache<RowHandle> {
        self.list.rows()
    }

    pub fn is_action_mode(&self) -> bool {
        !self.list.selection().is_empty()
    }

    pub fn options(&self) -> RowOptions {
        self.options
    }

    /// Has `action` handed off work that has not resolved yet?
    pub fn is_pending(&self, action: Action) -> bool {
        self.pending.contains(action)
    }

    /// Accept a freshly loaded folder list
    ///
    /// Identical lists are ignored; anything else redraws everything and
    /// ends action mode.
    pub fn update_dirs(&mut self, dirs: Vec<Directory>) {
        let result = self.list.replace(dirs);
        self.apply(result);
    }

    pub fn toggle_selection(&mut self, position: usize) {
        if self.list.selection().contains(position) {
            self.deselect(position);
        } else {
            self.select(position);
        }
    }

    pub fn select(&mut self, position: usize) {
        if position >= self.list.len() || self.list.selection().contains(position) {
            return;
        }
        let change = self.list.select(position);
        self.services.view.selection_changed(position, true);
        self.note_action_mode(change);
    }

    pub fn deselect(&mut self, position: usize) {
        if !self.list.selection().contains(position) {
            return;
        }
        let change = self.list.deselect(position);
        self.services.view.selection_changed(position, false);
        self.note_action_mode(change);
    }

    pub fn select_all(&mut self) {
        let newly_selected: Vec<usize> = (0..self.list.len())
            .filter(|&position| !self.list.selection().contains(position))
            .collect();
        let change = self.list.select_all();
        for position in newly_selected {
            self.services.view.selection_changed(position, true);
        }
        self.note_action_mode(change);
    }

    /// Clear the selection, leaving action mode
    pub fn finish_action_mode(&mut self) {
        let selected: Vec<usize> = self.list.selection().positions().iter().copied().collect();
        let change = self.list.clear_selection();
        for position in selected {
            self.services.view.selection_changed(position, false);
        }
        self.note_action_mode(change);
    }

    /// Bind the folder at `position` into the row `handle`
    pub fn bind_row(&mut self, position: usize, handle: RowHandle) -> Option<DirectoryRow> {
        let dir = self.list.get(position)?;
        let row = DirectoryRow::bind(
            dir,
            &self.options,
            self.pinned.contains(&dir.path),
            self.list.selection().contains(position),
        );

        self.list.rows_mut().forget(&handle);
        self.list.rows_mut().insert(position, handle);
        self.services.images.load_thumbnail(handle, row.thumbnail.clone());
        Some(row)
    }

    /// The view dropped `handle`; stop tracking it and clear its thumbnail
    pub fn recycle_row(&mut self, handle: RowHandle) {
        self.list.rows_mut().forget(&handle);
        self.services.images.clear(handle);
    }

    pub fn set_animate_gifs(&mut self, animate_gifs: bool) {
        self.update_options(|options| options.animate_gifs = animate_gifs);
    }

    pub fn set_crop_thumbnails(&mut self, crop_thumbnails: bool) {
        self.update_options(|options| options.crop_thumbnails = crop_thumbnails);
    }

    pub fn set_show_media_count(&mut self, show_media_count: bool) {
        self.update_options(|options| options.show_media_count = show_media_count);
    }

    pub fn set_scroll_horizontally(&mut self, scroll_horizontally: bool) {
        self.update_options(|options| options.scroll_horizontally = scroll_horizontally);
    }

    fn update_options(&mut self, update: impl FnOnce(&mut RowOptions)) {
        update(&mut self.options);
        self.services.view.full_reset();
    }

    /// Ask the owning screen to reload, and leave action mode
    fn refresh_and_finish(&mut self) {
        self.services.listener.refresh_items();
        self.finish_action_mode();
    }

    /// Forward a reconcile result to the view
    fn apply(&mut self, result: Reconcile) {
        match result {
            Reconcile::Unchanged => {}
            Reconcile::Full { action_mode } => {
                self.services.view.full_reset();
                self.note_action_mode(action_mode);
            }
            Reconcile::Incremental { removed, action_mode } => {
                self.services.view.items_removed(&removed);
                self.note_action_mode(action_mode);
            }
        }
    }

    fn note_action_mode(&mut self, change: ActionMode) {
        match change {
            ActionMode::Unchanged => {}
            ActionMode::Started => {
                debug!("Action mode started");
                self.services.view.action_mode_changed(true);
            }
            ActionMode::Ended => {
                debug!("Action mode ended");
                self.services.view.action_mode_changed(false);
            }
        }
    }
}

impl std::fmt::Debug for DirectoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryAdapter")
            .field("len", &self.list.len())
            .field("selected", &self.list.selection().len())
            .field("options", &self.options)
            .finish()
    }
}
