//! Folder list core for a photo gallery
//!
//! Owns the ordered list of media folders shown on the folders screen, the
//! multi-selection ("action mode") over it, and the bulk actions that run
//! against the selection. Heavy work is delegated to collaborators behind
//! the traits in [`services`]; their continuations come back through the
//! adapter's task queue so every list mutation happens on one thread.
//!
//! Module layout:
//! - `adapter` - the folder list adapter and its actions
//! - `state` - folder records, selection, reconciliation, SQLite catalog
//! - `fs` - media detection and `.nomedia` markers on disk
//! - `config` - persisted settings
//! - `runtime` - the owner-thread task queue
//! - `services` - collaborator traits

pub mod adapter;
pub mod config;
pub mod error;
pub mod fs;
pub mod runtime;
pub mod services;
pub mod state;

pub use adapter::{Action, DirectoryAdapter, DirectoryRow, MenuState, RowOptions};
pub use config::{ConfigStore, JsonConfig, Settings};
pub use error::{ActionError, ConfigError, StoreError};
pub use runtime::{Completion, Reply, UiHandle};
pub use services::Services;
pub use state::data::{Directory, Location};
pub use state::library::{Library, SqliteStore};
