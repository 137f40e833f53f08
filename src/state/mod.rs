/// State management module
///
/// This module handles the folder list state, including:
/// - Folder and cover records (data.rs)
/// - The selection and action mode (selection.rs)
/// - Change detection and incremental removal (collection.rs)
/// - The SQLite directory catalog (library.rs)

pub mod collection;
pub mod data;
pub mod library;
pub mod selection;
