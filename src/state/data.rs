//! Shared data structures for the folder list
//!
//! These structs represent the data model that flows between
//! the catalog layer, the configuration store and the view layer.

use serde::{Deserialize, Serialize};

/// Reserved path of the Favorites pseudo-folder
pub const FAVORITES: &str = "favorites";
/// Reserved path of the Recycle Bin pseudo-folder
pub const RECYCLE_BIN: &str = "recycle_bin";
/// Reserved path standing for "the folder currently opened", never a real folder
pub const SELF_PATH: &str = "path";
/// Prefix of folders living on a removable (USB/OTG) volume
pub const OTG_PATH: &str = "otg:/";

/// Where a folder physically lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Internal,
    Sd,
    Usb,
}

impl Location {
    /// Integer form stored in the catalog
    pub fn as_i64(self) -> i64 {
        match self {
            Location::Internal => 1,
            Location::Sd => 2,
            Location::Usb => 3,
        }
    }

    /// Parse the catalog form; unknown values fall back to internal storage
    pub fn from_i64(value: i64) -> Self {
        match value {
            2 => Location::Sd,
            3 => Location::Usb,
            _ => Location::Internal,
        }
    }
}

/// A single folder shown in the list
///
/// `path` is the identity. `name` and `thumbnail` are derived from it and
/// are only ever rewritten together through [`Directory::rename`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directory {
    /// Full path of the folder, or one of the reserved pseudo-folder paths
    pub path: String,
    /// Display name (folder name, possibly with a hidden suffix)
    pub name: String,
    /// Full path of the medium used as the folder thumbnail
    pub thumbnail: String,
    /// Number of media files inside the folder
    pub media_count: u32,
    /// Storage the folder lives on
    pub location: Location,
}

impl Directory {
    /// Create a folder entry, deriving the name from the path
    pub fn new(path: impl Into<String>, thumbnail: impl Into<String>, media_count: u32, location: Location) -> Self {
        let path = path.into();
        let name = filename_from_path(&path).to_string();
        Self {
            path,
            name,
            thumbnail: thumbnail.into(),
            media_count,
            location,
        }
    }

    /// Is this the Favorites pseudo-folder?
    pub fn is_favorites(&self) -> bool {
        self.path == FAVORITES
    }

    /// Is this the Recycle Bin pseudo-folder?
    pub fn is_recycle_bin(&self) -> bool {
        self.path == RECYCLE_BIN
    }

    /// Favorites or Recycle Bin
    pub fn is_pseudo(&self) -> bool {
        is_pseudo_path(&self.path)
    }

    /// Move the entry to `new_path`, recomputing name and thumbnail together
    pub fn rename(&mut self, new_path: &str) {
        let thumbnail_name = filename_from_path(&self.thumbnail).to_string();
        self.path = new_path.to_string();
        self.name = filename_from_path(new_path).to_string();
        self.thumbnail = format!("{}/{}", new_path.trim_end_matches('/'), thumbnail_name);
    }
}

/// Favorites or Recycle Bin
pub fn is_pseudo_path(path: &str) -> bool {
    path == FAVORITES || path == RECYCLE_BIN
}

/// Last path segment ("DCIM/Camera" -> "Camera")
pub fn filename_from_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Everything before the last path segment, with a trailing slash
pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(index) => format!("{}/", &path[..index]),
        None => "/".to_string(),
    }
}

/// A user-picked cover for a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumCover {
    /// Folder the cover belongs to
    pub path: String,
    /// Medium shown as the folder thumbnail
    pub thumbnail: String,
}

/// The cover list without any entry for `folder`
pub fn covers_without(covers: &[AlbumCover], folder: &str) -> Vec<AlbumCover> {
    covers.iter().filter(|cover| cover.path != folder).cloned().collect()
}

/// The cover list with `folder` pointing at `thumbnail`, replacing any previous entry
pub fn covers_with(covers: &[AlbumCover], folder: &str, thumbnail: &str) -> Vec<AlbumCover> {
    let mut covers = covers_without(covers, folder);
    covers.push(AlbumCover {
        path: folder.to_string(),
        thumbnail: thumbnail.to_string(),
    });
    covers
}

/// A file handed to the copy/move collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: String,
    pub name: String,
}

impl FileItem {
    pub fn from_path(path: String) -> Self {
        let name = filename_from_path(&path).to_string();
        Self { path, name }
    }
}
