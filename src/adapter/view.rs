//! Row rendering for the folder list
//!
//! Turns a [`Directory`] into the display fields of one row. Pixels are the
//! image loader's business; this only decides what to ask it for.

use serde::{Deserialize, Serialize};

use crate::fs::MediaKind;
use crate::state::data::{parent_path, Directory, Location};

/// Display options shared by every row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOptions {
    /// List layout instead of grid
    pub list_view: bool,
    pub scroll_horizontally: bool,
    pub animate_gifs: bool,
    pub crop_thumbnails: bool,
    pub show_media_count: bool,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            list_view: false,
            scroll_horizontally: false,
            animate_gifs: false,
            crop_thumbnails: true,
            show_media_count: true,
        }
    }
}

/// Storage badge drawn on rows outside internal storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationBadge {
    None,
    SdCard,
    Usb,
}

impl From<Location> for LocationBadge {
    fn from(location: Location) -> Self {
        match location {
            Location::Internal => LocationBadge::None,
            Location::Sd => LocationBadge::SdCard,
            Location::Usb => LocationBadge::Usb,
        }
    }
}

/// What the image loader should draw into a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub kind: MediaKind,
    pub path: String,
    pub scroll_horizontally: bool,
    pub animate_gifs: bool,
    pub crop: bool,
}

/// Display fields of one folder row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub name: String,
    /// Parent folder with trailing slash, shown in list layout
    pub parent_path: String,
    pub media_count: String,
    pub show_media_count: bool,
    pub pinned: bool,
    pub selected: bool,
    pub location: LocationBadge,
    pub thumbnail: ThumbnailRequest,
}

impl DirectoryRow {
    pub fn bind(dir: &Directory, options: &RowOptions, pinned: bool, selected: bool) -> Self {
        Self {
            name: dir.name.clone(),
            parent_path: parent_path(&dir.path),
            media_count: dir.media_count.to_string(),
            show_media_count: options.show_media_count,
            pinned,
            selected,
            location: dir.location.into(),
            thumbnail: ThumbnailRequest {
                kind: MediaKind::for_thumbnail(&dir.thumbnail),
                path: dir.thumbnail.clone(),
                scroll_horizontally: options.scroll_horizontally,
                animate_gifs: options.animate_gifs,
                crop: options.crop_thumbnails,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_row() {
        let dir = Directory::new("/storage/DCIM/Camera", "/storage/DCIM/Camera/clip.mp4", 12, Location::Sd);
        let options = RowOptions {
            show_media_count: false,
            ..RowOptions::default()
        };

        let row = DirectoryRow::bind(&dir, &options, true, false);
        assert_eq!(row.name, "Camera");
        assert_eq!(row.parent_path, "/storage/DCIM/");
        assert_eq!(row.media_count, "12");
        assert!(!row.show_media_count);
        assert!(row.pinned);
        assert_eq!(row.location, LocationBadge::SdCard);
        assert_eq!(row.thumbnail.kind, MediaKind::Video);
        assert!(row.thumbnail.crop);
    }
}
