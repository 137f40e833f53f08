//! Configuration store
//!
//! The adapter only reads folder sets and flags through [`ConfigStore`] and
//! writes them back through its mutation calls. [`JsonConfig`] is the
//! file-backed implementation: one JSON document rewritten as a whole on
//! every change.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::view::RowOptions;
use crate::error::ConfigError;
use crate::state::data::AlbumCover;

/// Persistent preferences and folder sets
pub trait ConfigStore: Send + Sync {
    fn pinned(&self) -> HashSet<String>;
    fn add_pinned(&self, paths: &[String]);
    fn remove_pinned(&self, paths: &[String]);
    fn excluded(&self) -> HashSet<String>;
    fn add_excluded(&self, paths: &[String]);
    /// Folders shown even when hidden
    fn included(&self) -> HashSet<String>;
    fn album_covers(&self) -> Vec<AlbumCover>;
    /// Replace the whole cover list
    fn set_album_covers(&self, covers: Vec<AlbumCover>);
    fn use_recycle_bin(&self) -> bool;
    fn skip_delete_confirmation(&self) -> bool;
    fn show_hidden(&self) -> bool;
    fn recycle_bin_at_folders(&self) -> bool;
    fn set_recycle_bin_at_folders(&self, show: bool);
    fn hide_tooltip_shown(&self) -> bool;
    fn set_hide_tooltip_shown(&self, shown: bool);
    fn set_temp_folder_path(&self, path: &str);
    fn row_options(&self) -> RowOptions;
}

/// On-disk settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pinned_folders: BTreeSet<String>,
    pub excluded_folders: BTreeSet<String>,
    pub included_folders: BTreeSet<String>,
    pub album_covers: Vec<AlbumCover>,
    pub use_recycle_bin: bool,
    pub skip_delete_confirmation: bool,
    pub show_hidden: bool,
    pub show_recycle_bin_at_folders: bool,
    pub hide_folder_tooltip_shown: bool,
    pub temp_folder_path: String,
    pub rows: RowOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pinned_folders: BTreeSet::new(),
            excluded_folders: BTreeSet::new(),
            included_folders: BTreeSet::new(),
            album_covers: Vec::new(),
            use_recycle_bin: true,
            skip_delete_confirmation: false,
            show_hidden: false,
            show_recycle_bin_at_folders: true,
            hide_folder_tooltip_shown: false,
            temp_folder_path: String::new(),
            rows: RowOptions::default(),
        }
    }
}

/// JSON-file configuration store
#[derive(Debug)]
pub struct JsonConfig {
    path: PathBuf,
    settings: RwLock<Settings>,
}

impl JsonConfig {
    /// Load from `path`; a missing file yields default settings
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        info!("Settings loaded from {}", path.display());
        Ok(Self {
            path,
            settings: RwLock::new(settings),
        })
    }

    /// Load from the user's configuration directory
    ///
    /// - Linux: ~/.config/gallery-folders/settings.json
    /// - macOS: ~/Library/Application Support/gallery-folders/settings.json
    /// - Windows: %APPDATA%\gallery-folders\settings.json
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::load(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("gallery-folders");
        path.push("settings.json");
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.read(|settings| settings.clone())
    }

    /// Write the whole document to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = self.read(|settings| serde_json::to_string_pretty(settings))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        f(&settings)
    }

    /// Apply `f` and persist the result
    fn update(&self, f: impl FnOnce(&mut Settings)) {
        {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            f(&mut settings);
        }
        if let Err(e) = self.save() {
            warn!("Failed to save settings to {}: {}", self.path.display(), e);
        }
    }
}

impl ConfigStore for JsonConfig {
    fn pinned(&self) -> HashSet<String> {
        self.read(|s| s.pinned_folders.iter().cloned().collect())
    }

    fn add_pinned(&self, paths: &[String]) {
        self.update(|s| s.pinned_folders.extend(paths.iter().cloned()));
    }

    fn remove_pinned(&self, paths: &[String]) {
        self.update(|s| {
            for path in paths {
                s.pinned_folders.remove(path);
            }
        });
    }

    fn excluded(&self) -> HashSet<String> {
        self.read(|s| s.excluded_folders.iter().cloned().collect())
    }

    fn add_excluded(&self, paths: &[String]) {
        self.update(|s| s.excluded_folders.extend(paths.iter().cloned()));
    }

    fn included(&self) -> HashSet<String> {
        self.read(|s| s.included_folders.iter().cloned().collect())
    }

    fn album_covers(&self) -> Vec<AlbumCover> {
        self.read(|s| s.album_covers.clone())
    }

    fn set_album_covers(&self, covers: Vec<AlbumCover>) {
        self.update(|s| s.album_covers = covers);
    }

    fn use_recycle_bin(&self) -> bool {
        self.read(|s| s.use_recycle_bin)
    }

    fn skip_delete_confirmation(&self) -> bool {
        self.read(|s| s.skip_delete_confirmation)
    }

    fn show_hidden(&self) -> bool {
        self.read(|s| s.show_hidden)
    }

    fn recycle_bin_at_folders(&self) -> bool {
        self.read(|s| s.show_recycle_bin_at_folders)
    }

    fn set_recycle_bin_at_folders(&self, show: bool) {
        self.update(|s| s.show_recycle_bin_at_folders = show);
    }

    fn hide_tooltip_shown(&self) -> bool {
        self.read(|s| s.hide_folder_tooltip_shown)
    }

    fn set_hide_tooltip_shown(&self, shown: bool) {
        self.update(|s| s.hide_folder_tooltip_shown = shown);
    }

    fn set_temp_folder_path(&self, path: &str) {
        self.update(|s| s.temp_folder_path = path.to_string());
    }

    fn row_options(&self) -> RowOptions {
        self.read(|s| s.rows)
    }
}
