use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tracing::{info, warn};

use super::data::{Directory, Location};
use crate::error::StoreError;
use crate::runtime::Completion;
use crate::services::{DirectoryStore, RenameRecord};

/// The Library manages the SQLite catalog of folders.
/// It stores folder metadata and the favorites list.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open the catalog in the user's data directory.
    ///
    /// - Linux: ~/.local/share/gallery-folders/gallery.db
    /// - macOS: ~/Library/Application Support/gallery-folders/gallery.db
    /// - Windows: %APPDATA%\gallery-folders\gallery.db
    pub fn new() -> Result<Self, StoreError> {
        let db_path = Self::default_db_path()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::open(db_path)?)
    }

    /// Open (or create) the catalog at `db_path` and initialize its schema
    pub fn open(db_path: impl Into<PathBuf>) -> SqlResult<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path)?;
        let mut library = Library { conn, db_path };
        library.init_schema()?;
        info!("Folder catalog opened at {}", library.db_path.display());
        Ok(library)
    }

    fn default_db_path() -> Result<PathBuf, StoreError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(StoreError::NoDataDir)?;
        path.push("gallery-folders");
        path.push("gallery.db");
        Ok(path)
    }

    fn init_schema(&mut self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS directories (
                path            TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                thumbnail       TEXT NOT NULL,
                media_count     INTEGER NOT NULL DEFAULT 0,
                location        INTEGER NOT NULL DEFAULT 1,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                full_path       TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_directories_name
             ON directories(name COLLATE NOCASE)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn directory_count(&self) -> SqlResult<i64> {
        self.conn.query_row("SELECT COUNT(*) FROM directories", [], |row| row.get(0))
    }

    /// Insert a folder or overwrite the row with the same path
    pub fn upsert_directory(&self, dir: &Directory) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO directories (path, name, thumbnail, media_count, location, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(path) DO UPDATE SET
                name = excluded.name,
                thumbnail = excluded.thumbnail,
                media_count = excluded.media_count,
                location = excluded.location,
                updated_at = excluded.updated_at",
            rusqlite::params![
                dir.path,
                dir.name,
                dir.thumbnail,
                dir.media_count,
                dir.location.as_i64(),
                Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    /// All folders, ordered by name
    pub fn get_all_directories(&self) -> SqlResult<Vec<Directory>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, name, thumbnail, media_count, location
             FROM directories
             ORDER BY name COLLATE NOCASE, path",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Directory {
                path: row.get(0)?,
                name: row.get(1)?,
                thumbnail: row.get(2)?,
                media_count: row.get(3)?,
                location: Location::from_i64(row.get(4)?),
            })
        })?;

        let mut dirs = Vec::new();
        for dir in rows {
            dirs.push(dir?);
        }

        Ok(dirs)
    }

    pub fn get_directory(&self, path: &str) -> SqlResult<Option<Directory>> {
        self.conn
            .query_row(
                "SELECT path, name, thumbnail, media_count, location FROM directories WHERE path = ?1",
                [path],
                |row| {
                    Ok(Directory {
                        path: row.get(0)?,
                        name: row.get(1)?,
                        thumbnail: row.get(2)?,
                        media_count: row.get(3)?,
                        location: Location::from_i64(row.get(4)?),
                    })
                },
            )
            .optional()
    }

    /// Point the row of `record.old_path` at the renamed folder.
    /// Returns the number of rows updated.
    pub fn rename_directory(&self, record: &RenameRecord) -> SqlResult<usize> {
        self.conn.execute(
            "UPDATE directories SET thumbnail = ?1, name = ?2, path = ?3, updated_at = ?4 WHERE path = ?5",
            rusqlite::params![
                record.thumbnail,
                record.name,
                record.path,
                Utc::now().timestamp(),
                record.old_path,
            ],
        )
    }

    pub fn add_favorite(&self, path: &str) -> SqlResult<()> {
        self.conn.execute("INSERT OR IGNORE INTO favorites (full_path) VALUES (?1)", [path])?;
        Ok(())
    }

    pub fn favorite_count(&self) -> SqlResult<i64> {
        self.conn.query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
    }

    /// Drop every favorite. Returns the number of rows removed.
    pub fn clear_favorites(&self) -> SqlResult<usize> {
        self.conn.execute("DELETE FROM favorites", [])
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// [`DirectoryStore`] writing to the SQLite catalog on blocking tasks
///
/// rusqlite::Connection is not Send, so every write opens its own connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
    runtime: Handle,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            db_path: db_path.into(),
            runtime,
        }
    }

    /// Run `write` against a fresh connection, completing only on success
    fn spawn_write<T>(
        &self,
        what: &'static str,
        write: impl FnOnce(&Library) -> SqlResult<T> + Send + 'static,
        done: Completion,
    ) {
        let db_path = self.db_path.clone();
        let task = self.runtime.spawn_blocking(move || {
            let library = Library::open(db_path)?;
            write(&library)?;
            Ok::<(), StoreError>(())
        });
        self.runtime.spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(StoreError::Task(e.to_string())),
            };
            match result {
                Ok(()) => done.done(),
                Err(e) => warn!("Failed to {}: {}", what, e),
            }
        });
    }
}

impl DirectoryStore for SqliteStore {
    fn rename_directory_record(&self, record: RenameRecord, done: Completion) {
        self.spawn_write("rename folder record", move |library| library.rename_directory(&record), done);
    }

    fn clear_favorites(&self, done: Completion) {
        self.spawn_write("clear favorites", |library| library.clear_favorites(), done);
    }
}
