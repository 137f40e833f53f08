use thiserror::Error;

/// Why a bulk action did nothing
///
/// Never surfaced to callers: the dispatcher logs it and returns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("no folder selected")]
    EmptySelection,
    #[error("{0} does not apply to the current selection")]
    NotApplicable(&'static str),
    #[error("cannot rename storage root {0}")]
    StorageRoot(String),
    #[error("write access to {0} was refused")]
    PermissionDenied(String),
    #[error("position {0} is no longer in the list")]
    StaleSelection(usize),
    #[error("{0} is already in the list")]
    AlreadyListed(String),
}

/// Configuration store errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no configuration directory on this system")]
    NoConfigDir,
}

/// Catalog errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    Task(String),
    #[error("no data directory on this system")]
    NoDataDir,
}
