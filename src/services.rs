//! Collaborator contracts consumed by the folder adapter
//!
//! Every collaborator is `Send + Sync` and held behind an `Arc`. Operations
//! that finish later take a [`Reply`]/[`Completion`]; implementations may send
//! it from any thread, and only send it on success.

use std::sync::Arc;

use crate::adapter::view::ThumbnailRequest;
use crate::config::ConfigStore;
use crate::runtime::{Completion, Reply};
use crate::state::data::{Directory, FileItem};

/// Hidden-folder markers on disk
pub trait FolderMarker: Send + Sync {
    /// Is the folder, or any of its parents, marked hidden?
    fn is_hidden(&self, path: &str) -> bool;
    fn mark_hidden(&self, path: &str, done: Completion);
    fn unmark_hidden(&self, path: &str, done: Completion);
}

/// Long-running filesystem batches
pub trait FileOps: Send + Sync {
    /// Delete (or move to the recycle bin) whole folders
    fn delete(&self, paths: Vec<String>, done: Completion);
    fn copy_or_move(&self, items: Vec<FileItem>, is_copy: bool, done: Completion);
    fn empty_recycle_bin(&self, done: Completion);
    fn empty_and_disable_recycle_bin(&self, done: Completion);
}

/// Catalog row rewrite after a folder rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRecord {
    /// New thumbnail path
    pub thumbnail: String,
    /// New display name
    pub name: String,
    /// New folder path
    pub path: String,
    /// Folder path before the rename
    pub old_path: String,
}

/// Persistence of folder metadata
pub trait DirectoryStore: Send + Sync {
    fn rename_directory_record(&self, record: RenameRecord, done: Completion);
    fn clear_favorites(&self, done: Completion);
}

/// A child of a folder on a removable volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    /// Path relative to the volume root, without leading slash
    pub relative_path: String,
    pub is_directory: bool,
}

/// Storage volumes and write access to them
pub trait Volumes: Send + Sync {
    fn is_storage_root(&self, path: &str) -> bool;
    /// Does writing under `path` need an explicit access grant?
    fn needs_write_grant(&self, path: &str) -> bool;
    /// Is a grant already cached?
    fn has_write_grant(&self) -> bool;
    fn request_write_grant(&self, path: &str, granted: Reply<bool>);
    /// Children of a folder on a removable volume
    fn remote_children(&self, path: &str) -> Vec<RemoteEntry>;
}

/// Modal prompts
///
/// Dismissing a prompt drops its reply.
pub trait Prompts: Send + Sync {
    fn confirm(&self, message: String, confirmed: Completion);
    fn confirm_empty_recycle_bin(&self, confirmed: Completion);
    /// Ask for a new name; replies with the new full path
    fn rename(&self, path: &str, renamed: Reply<String>);
    /// Ask whether (and which parent of) `paths` to exclude; persists the choice itself
    fn exclude(&self, paths: Vec<String>, excluded: Completion);
    /// Pick a file or a subfolder inside `folder`; replies with its full path
    fn pick_medium(&self, folder: &str, picked: Reply<String>);
    fn properties(&self, paths: Vec<String>, show_hidden: bool);
    fn toast(&self, message: &str);
}

/// The screen owning the folder list
pub trait Listener: Send + Sync {
    /// Reload folders from scratch
    fn refresh_items(&self);
    fn update_directories(&self, dirs: Vec<Directory>);
    fn delete_folders(&self, paths: Vec<String>);
    fn recheck_pinned_folders(&self);
}

/// Opaque handle of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(pub u64);

/// Rendering surface of the folder list
pub trait ViewSurface: Send + Sync {
    fn full_reset(&self);
    /// `positions` are descending, in pre-removal indices
    fn items_removed(&self, positions: &[usize]);
    fn selection_changed(&self, position: usize, selected: bool);
    fn action_mode_changed(&self, active: bool);
}

/// Thumbnail loading into rows
pub trait ImageLoader: Send + Sync {
    fn load_thumbnail(&self, row: RowHandle, request: ThumbnailRequest);
    fn clear(&self, row: RowHandle);
}

/// Every collaborator the adapter talks to
#[derive(Clone)]
pub struct Services {
    pub config: Arc<dyn ConfigStore>,
    pub marker: Arc<dyn FolderMarker>,
    pub file_ops: Arc<dyn FileOps>,
    pub store: Arc<dyn DirectoryStore>,
    pub volumes: Arc<dyn Volumes>,
    pub prompts: Arc<dyn Prompts>,
    pub listener: Arc<dyn Listener>,
    pub view: Arc<dyn ViewSurface>,
    pub images: Arc<dyn ImageLoader>,
}
