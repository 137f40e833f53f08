//! Filesystem helpers
//!
//! This module handles:
//! - Recognizing media files by extension
//! - Listing the media files directly inside a folder
//! - Hidden-folder markers (`.nomedia`)

pub mod marker;
pub mod media;

pub use marker::NoMediaMarker;
pub use media::MediaKind;
