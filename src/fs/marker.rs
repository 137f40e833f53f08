use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::runtime::Completion;
use crate::services::FolderMarker;

/// Name of the marker file hiding a folder and everything below it
pub const NOMEDIA: &str = ".nomedia";

/// Does `path`, or any folder above it, contain a marker file?
pub fn has_nomedia_in_tree(path: &Path) -> bool {
    if !path.is_absolute() {
        return false;
    }
    path.ancestors().any(|folder| folder.join(NOMEDIA).is_file())
}

/// [`FolderMarker`] backed by `.nomedia` files, written on blocking tasks
#[derive(Debug, Clone)]
pub struct NoMediaMarker {
    runtime: Handle,
}

impl NoMediaMarker {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    fn spawn(&self, folder: &str, hide: bool, done: Completion) {
        let marker = PathBuf::from(folder).join(NOMEDIA);
        let task = self.runtime.spawn_blocking(move || {
            let result = if hide {
                std::fs::File::create(&marker).map(|_| ())
            } else {
                match std::fs::remove_file(&marker) {
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    other => other,
                }
            };
            (marker, result)
        });
        self.runtime.spawn(async move {
            match task.await {
                Ok((marker, Ok(()))) => {
                    debug!("{} {}", if hide { "Created" } else { "Removed" }, marker.display());
                    done.done();
                }
                Ok((marker, Err(e))) => warn!("Failed to update {}: {}", marker.display(), e),
                Err(e) => warn!("Task join error: {}", e),
            }
        });
    }
}

impl FolderMarker for NoMediaMarker {
    fn is_hidden(&self, path: &str) -> bool {
        has_nomedia_in_tree(Path::new(path))
    }

    fn mark_hidden(&self, path: &str, done: Completion) {
        self.spawn(path, true, done);
    }

    fn unmark_hidden(&self, path: &str, done: Completion) {
        self.spawn(path, false, done);
    }
}
