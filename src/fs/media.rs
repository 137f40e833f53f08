use std::path::Path;
use walkdir::WalkDir;

use crate::services::RemoteEntry;
use crate::state::data::OTG_PATH;

/// Photo extensions (lowercase)
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "heic", "heif", "tif", "tiff", "svg"];

/// Video extensions (lowercase)
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "avi", "3gp", "3gpp", "mov", "m4v", "mpg", "mpeg"];

/// Supported RAW file extensions (common formats)
const RAW_EXTENSIONS: &[&str] = &[
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2",
    "pef", "srw", "erf", "kdc", "dcr", "mos", "raw", "rwl",
];

/// Kind of medium, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Gif,
    Raw,
}

impl MediaKind {
    /// Kind of the file at `path`, or `None` for anything that is not a medium
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let (_, extension) = name.rsplit_once('.')?;
        let extension = extension.to_lowercase();
        let extension = extension.as_str();

        if PHOTO_EXTENSIONS.contains(&extension) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            Some(MediaKind::Video)
        } else if extension == "gif" {
            Some(MediaKind::Gif)
        } else if RAW_EXTENSIONS.contains(&extension) {
            Some(MediaKind::Raw)
        } else {
            None
        }
    }

    /// Loader type for a folder thumbnail; unknown files are treated as RAW
    pub fn for_thumbnail(path: &str) -> Self {
        Self::from_path(path).unwrap_or(MediaKind::Raw)
    }
}

pub fn is_media(path: &str) -> bool {
    MediaKind::from_path(path).is_some()
}

/// Image, video or GIF; RAW files stay behind on copy and move
pub fn is_transferable(path: &str) -> bool {
    matches!(
        MediaKind::from_path(path),
        Some(MediaKind::Image | MediaKind::Video | MediaKind::Gif)
    )
}

fn passes_hidden_policy(name: &str, show_hidden: bool) -> bool {
    show_hidden || !name.starts_with('.')
}

/// Transferable media files directly inside `folder`, sorted by name
///
/// Subfolders are not entered. Dot-files are skipped unless `show_hidden`.
/// A folder that cannot be read yields nothing.
pub fn media_children(folder: &Path, show_hidden: bool) -> Vec<String> {
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_transferable(&name) && passes_hidden_policy(&name, show_hidden) {
                Some(entry.path().to_string_lossy().to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Transferable media files among the children of a removable-volume folder, as volume paths
pub fn remote_media_paths(entries: &[RemoteEntry], show_hidden: bool) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.is_directory && is_transferable(&entry.name) && passes_hidden_policy(&entry.name, show_hidden))
        .map(|entry| format!("{}{}", OTG_PATH, entry.relative_path.trim_start_matches('/')))
        .collect()
}
