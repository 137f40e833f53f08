//! Recording collaborators for adapter tests
//!
//! Background services complete immediately (their continuation is queued,
//! so the adapter still sees it only on `run_pending`). Prompts park their
//! replies until the test answers them.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::view::{RowOptions, ThumbnailRequest};
use super::DirectoryAdapter;
use crate::config::{ConfigStore, Settings};
use crate::runtime::{Completion, Reply};
use crate::services::{
    DirectoryStore, FileOps, FolderMarker, ImageLoader, Listener, Prompts, RemoteEntry, RenameRecord, RowHandle,
    Services, ViewSurface, Volumes,
};
use crate::state::data::{AlbumCover, Directory, FileItem, Location};

pub fn dir(path: &str) -> Directory {
    Directory::new(path, format!("{}/1.jpg", path), 1, Location::Internal)
}

pub fn dirs(paths: &[&str]) -> Vec<Directory> {
    paths.iter().map(|path| dir(path)).collect()
}

#[derive(Default)]
pub struct FakeConfig {
    pub settings: Mutex<Settings>,
}

impl FakeConfig {
    pub fn with(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings.lock().unwrap());
    }

    fn get<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        f(&self.settings.lock().unwrap())
    }
}

impl ConfigStore for FakeConfig {
    fn pinned(&self) -> HashSet<String> {
        self.get(|s| s.pinned_folders.iter().cloned().collect())
    }
    fn add_pinned(&self, paths: &[String]) {
        self.with(|s| s.pinned_folders.extend(paths.iter().cloned()));
    }
    fn remove_pinned(&self, paths: &[String]) {
        self.with(|s| s.pinned_folders.retain(|p| !paths.contains(p)));
    }
    fn excluded(&self) -> HashSet<String> {
        self.get(|s| s.excluded_folders.iter().cloned().collect())
    }
    fn add_excluded(&self, paths: &[String]) {
        self.with(|s| s.excluded_folders.extend(paths.iter().cloned()));
    }
    fn included(&self) -> HashSet<String> {
        self.get(|s| s.included_folders.iter().cloned().collect())
    }
    fn album_covers(&self) -> Vec<AlbumCover> {
        self.get(|s| s.album_covers.clone())
    }
    fn set_album_covers(&self, covers: Vec<AlbumCover>) {
        self.with(|s| s.album_covers = covers);
    }
    fn use_recycle_bin(&self) -> bool {
        self.get(|s| s.use_recycle_bin)
    }
    fn skip_delete_confirmation(&self) -> bool {
        self.get(|s| s.skip_delete_confirmation)
    }
    fn show_hidden(&self) -> bool {
        self.get(|s| s.show_hidden)
    }
    fn recycle_bin_at_folders(&self) -> bool {
        self.get(|s| s.show_recycle_bin_at_folders)
    }
    fn set_recycle_bin_at_folders(&self, show: bool) {
        self.with(|s| s.show_recycle_bin_at_folders = show);
    }
    fn hide_tooltip_shown(&self) -> bool {
        self.get(|s| s.hide_folder_tooltip_shown)
    }
    fn set_hide_tooltip_shown(&self, shown: bool) {
        self.with(|s| s.hide_folder_tooltip_shown = shown);
    }
    fn set_temp_folder_path(&self, path: &str) {
        self.with(|s| s.temp_folder_path = path.to_string());
    }
    fn row_options(&self) -> RowOptions {
        self.get(|s| s.rows)
    }
}

/// Marker whose hidden set is edited directly; ancestors count
#[derive(Default)]
pub struct FakeMarker {
    pub hidden: Mutex<HashSet<String>>,
}

impl FolderMarker for FakeMarker {
    fn is_hidden(&self, path: &str) -> bool {
        let hidden = self.hidden.lock().unwrap();
        hidden
            .iter()
            .any(|marked| path == marked || path.starts_with(&format!("{}/", marked)))
    }
    fn mark_hidden(&self, path: &str, done: Completion) {
        self.hidden.lock().unwrap().insert(path.to_string());
        done.done();
    }
    fn unmark_hidden(&self, path: &str, done: Completion) {
        self.hidden.lock().unwrap().remove(path);
        done.done();
    }
}

#[derive(Default)]
pub struct FakeFileOps {
    pub deleted: Mutex<Vec<Vec<String>>>,
    pub copied: Mutex<Vec<(Vec<FileItem>, bool)>>,
    pub emptied: Mutex<usize>,
    pub emptied_and_disabled: Mutex<usize>,
}

impl FileOps for FakeFileOps {
    fn delete(&self, paths: Vec<String>, done: Completion) {
        self.deleted.lock().unwrap().push(paths);
        done.done();
    }
    fn copy_or_move(&self, items: Vec<FileItem>, is_copy: bool, done: Completion) {
        self.copied.lock().unwrap().push((items, is_copy));
        done.done();
    }
    fn empty_recycle_bin(&self, done: Completion) {
        *self.emptied.lock().unwrap() += 1;
        done.done();
    }
    fn empty_and_disable_recycle_bin(&self, done: Completion) {
        *self.emptied_and_disabled.lock().unwrap() += 1;
        done.done();
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub renames: Mutex<Vec<RenameRecord>>,
    pub favorites_cleared: Mutex<usize>,
}

impl DirectoryStore for FakeStore {
    fn rename_directory_record(&self, record: RenameRecord, done: Completion) {
        self.renames.lock().unwrap().push(record);
        done.done();
    }
    fn clear_favorites(&self, done: Completion) {
        *self.favorites_cleared.lock().unwrap() += 1;
        done.done();
    }
}

#[derive(Default)]
pub struct FakeVolumes {
    pub roots: Mutex<HashSet<String>>,
    pub needs_grant: Mutex<HashSet<String>>,
    pub has_grant: Mutex<bool>,
    pub grant_answer: Mutex<bool>,
    pub grant_requests: Mutex<Vec<String>>,
    pub remote: Mutex<HashMap<String, Vec<RemoteEntry>>>,
}

impl Volumes for FakeVolumes {
    fn is_storage_root(&self, path: &str) -> bool {
        self.roots.lock().unwrap().contains(path)
    }
    fn needs_write_grant(&self, path: &str) -> bool {
        self.needs_grant.lock().unwrap().contains(path)
    }
    fn has_write_grant(&self) -> bool {
        *self.has_grant.lock().unwrap()
    }
    fn request_write_grant(&self, path: &str, granted: Reply<bool>) {
        self.grant_requests.lock().unwrap().push(path.to_string());
        granted.send(*self.grant_answer.lock().unwrap());
    }
    fn remote_children(&self, path: &str) -> Vec<RemoteEntry> {
        self.remote.lock().unwrap().get(path).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct FakePrompts {
    pub confirms: Mutex<Vec<(String, Completion)>>,
    pub empty_bin_confirms: Mutex<Vec<Completion>>,
    pub renames: Mutex<Vec<(String, Reply<String>)>>,
    pub excludes: Mutex<Vec<(Vec<String>, Completion)>>,
    pub picks: Mutex<Vec<(String, Reply<String>)>>,
    pub properties: Mutex<Vec<(Vec<String>, bool)>>,
    pub toasts: Mutex<Vec<String>>,
}

impl FakePrompts {
    /// Accept the oldest confirmation; returns its message
    pub fn accept_confirm(&self) -> String {
        let (message, confirmed) = self.confirms.lock().unwrap().remove(0);
        confirmed.done();
        message
    }

    pub fn accept_empty_bin(&self) {
        let confirmed = self.empty_bin_confirms.lock().unwrap().remove(0);
        confirmed.done();
    }

    pub fn answer_rename(&self, new_path: &str) {
        let (_, renamed) = self.renames.lock().unwrap().remove(0);
        renamed.send(new_path.to_string());
    }

    pub fn accept_exclude(&self) {
        let (_, excluded) = self.excludes.lock().unwrap().remove(0);
        excluded.done();
    }

    /// Answer the oldest pick prompt; returns the folder it was browsing
    pub fn answer_pick(&self, picked: &str) -> String {
        let (folder, reply) = self.picks.lock().unwrap().remove(0);
        reply.send(picked.to_string());
        folder
    }
}

impl Prompts for FakePrompts {
    fn confirm(&self, message: String, confirmed: Completion) {
        self.confirms.lock().unwrap().push((message, confirmed));
    }
    fn confirm_empty_recycle_bin(&self, confirmed: Completion) {
        self.empty_bin_confirms.lock().unwrap().push(confirmed);
    }
    fn rename(&self, path: &str, renamed: Reply<String>) {
        self.renames.lock().unwrap().push((path.to_string(), renamed));
    }
    fn exclude(&self, paths: Vec<String>, excluded: Completion) {
        self.excludes.lock().unwrap().push((paths, excluded));
    }
    fn pick_medium(&self, folder: &str, picked: Reply<String>) {
        self.picks.lock().unwrap().push((folder.to_string(), picked));
    }
    fn properties(&self, paths: Vec<String>, show_hidden: bool) {
        self.properties.lock().unwrap().push((paths, show_hidden));
    }
    fn toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    Refresh,
    Update(Vec<String>),
    Delete(Vec<String>),
    RecheckPinned,
}

#[derive(Default)]
pub struct FakeListener {
    pub events: Mutex<Vec<ListenerEvent>>,
}

impl FakeListener {
    pub fn take(&self) -> Vec<ListenerEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl Listener for FakeListener {
    fn refresh_items(&self) {
        self.events.lock().unwrap().push(ListenerEvent::Refresh);
    }
    fn update_directories(&self, dirs: Vec<Directory>) {
        let paths = dirs.into_iter().map(|dir| dir.path).collect();
        self.events.lock().unwrap().push(ListenerEvent::Update(paths));
    }
    fn delete_folders(&self, paths: Vec<String>) {
        self.events.lock().unwrap().push(ListenerEvent::Delete(paths));
    }
    fn recheck_pinned_folders(&self) {
        self.events.lock().unwrap().push(ListenerEvent::RecheckPinned);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    FullReset,
    Removed(Vec<usize>),
    Selection(usize, bool),
    ActionMode(bool),
}

#[derive(Default)]
pub struct FakeView {
    pub events: Mutex<Vec<ViewEvent>>,
}

impl FakeView {
    pub fn take(&self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl ViewSurface for FakeView {
    fn full_reset(&self) {
        self.events.lock().unwrap().push(ViewEvent::FullReset);
    }
    fn items_removed(&self, positions: &[usize]) {
        self.events.lock().unwrap().push(ViewEvent::Removed(positions.to_vec()));
    }
    fn selection_changed(&self, position: usize, selected: bool) {
        self.events.lock().unwrap().push(ViewEvent::Selection(position, selected));
    }
    fn action_mode_changed(&self, active: bool) {
        self.events.lock().unwrap().push(ViewEvent::ActionMode(active));
    }
}

#[derive(Default)]
pub struct FakeImages {
    pub loads: Mutex<Vec<(RowHandle, ThumbnailRequest)>>,
    pub clears: Mutex<Vec<RowHandle>>,
}

impl ImageLoader for FakeImages {
    fn load_thumbnail(&self, row: RowHandle, request: ThumbnailRequest) {
        self.loads.lock().unwrap().push((row, request));
    }
    fn clear(&self, row: RowHandle) {
        self.clears.lock().unwrap().push(row);
    }
}

/// One of every fake, wired into an adapter
#[derive(Default)]
pub struct Harness {
    pub config: Arc<FakeConfig>,
    pub marker: Arc<FakeMarker>,
    pub file_ops: Arc<FakeFileOps>,
    pub store: Arc<FakeStore>,
    pub volumes: Arc<FakeVolumes>,
    pub prompts: Arc<FakePrompts>,
    pub listener: Arc<FakeListener>,
    pub view: Arc<FakeView>,
    pub images: Arc<FakeImages>,
}

impl Harness {
    pub fn services(&self) -> Services {
        Services {
            config: self.config.clone(),
            marker: self.marker.clone(),
            file_ops: self.file_ops.clone(),
            store: self.store.clone(),
            volumes: self.volumes.clone(),
            prompts: self.prompts.clone(),
            listener: self.listener.clone(),
            view: self.view.clone(),
            images: self.images.clone(),
        }
    }

    pub fn adapter(&self, paths: &[&str]) -> DirectoryAdapter {
        DirectoryAdapter::new(dirs(paths), self.services())
    }

    /// Adapter with `selected` positions already selected and events cleared
    pub fn adapter_with_selection(&self, paths: &[&str], selected: &[usize]) -> DirectoryAdapter {
        let mut adapter = self.adapter(paths);
        for &position in selected {
            adapter.select(position);
        }
        self.view.take();
        adapter
    }
}
