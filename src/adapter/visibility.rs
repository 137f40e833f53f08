//! Hide and unhide folders
//!
//! Once the marker service confirms, the list either relabels hidden folders
//! in place ("show hidden" on) or drops them incrementally.

use tracing::info;

use super::pending::ActionGuard;
use super::DirectoryAdapter;
use crate::error::ActionError;
use crate::state::data::{filename_from_path, is_pseudo_path, Directory, RECYCLE_BIN};

/// One-time explanation shown before the first hide
pub const HIDE_FOLDER_DESCRIPTION: &str = "This function hides the folder by adding a '.nomedia' file into it, \
it will hide all subfolders too. You can see them by toggling the 'Show hidden items' option in Settings. Continue?";

/// Suffix appended to the name of hidden folders while they are shown
pub const HIDDEN_SUFFIX: &str = " (hidden)";

/// Display name of `dir` for the given hidden state
pub fn hidden_label(dir: &Directory, hidden: bool) -> String {
    let name = filename_from_path(&dir.path);
    if hidden {
        format!("{}{}", name, HIDDEN_SUFFIX)
    } else {
        name.to_string()
    }
}

impl DirectoryAdapter {
    pub(super) fn toggle_folders_visibility(&mut self, hide: bool, guard: &ActionGuard) -> Result<(), ActionError> {
        let selected = self.list.selected_paths();
        if hide && selected.iter().any(|path| path == RECYCLE_BIN) {
            self.services.config.set_recycle_bin_at_folders(false);
            if selected.len() == 1 {
                self.refresh_and_finish();
                return Ok(());
            }
        }

        let targets: Vec<String> = selected.into_iter().filter(|path| !is_pseudo_path(path)).collect();
        if targets.is_empty() {
            return Err(ActionError::NotApplicable(if hide { "hide" } else { "unhide" }));
        }

        for path in targets {
            let guard = guard.clone();
            if !hide {
                let done = self.ui.completion(move |adapter| {
                    let _guard = guard;
                    adapter.on_visibility_changed(false);
                });
                self.services.marker.unmark_hidden(&path, done);
            } else if self.services.config.hide_tooltip_shown() {
                self.hide_folder(&path, guard);
            } else {
                self.services.config.set_hide_tooltip_shown(true);
                let confirmed = self.ui.completion(move |adapter| adapter.hide_folder(&path, guard));
                self.services.prompts.confirm(HIDE_FOLDER_DESCRIPTION.to_string(), confirmed);
            }
        }
        Ok(())
    }

    fn hide_folder(&self, path: &str, guard: ActionGuard) {
        info!("Hiding {}", path);
        let done = self.ui.completion(move |adapter| {
            let _guard = guard;
            adapter.on_visibility_changed(true);
        });
        self.services.marker.mark_hidden(path, done);
    }

    /// A marker was added (`hidden`) or removed on disk
    fn on_visibility_changed(&mut self, hidden: bool) {
        if self.services.config.show_hidden() {
            self.relabel_hidden();
        } else if hidden {
            self.remove_hidden();
        } else {
            self.refresh_and_finish();
        }
    }

    /// Is `dir` hidden from a list that does not show hidden folders?
    fn is_concealed(&self, dir: &Directory, included: &std::collections::HashSet<String>) -> bool {
        !dir.is_pseudo() && !included.contains(&dir.path) && self.services.marker.is_hidden(&dir.path)
    }

    /// Recompute every name for its hidden state, keeping the order
    fn relabel_hidden(&mut self) {
        let included = self.services.config.included();
        let labels: Vec<Option<String>> = self
            .list
            .dirs()
            .iter()
            .map(|dir| (!dir.is_pseudo()).then(|| hidden_label(dir, self.is_concealed(dir, &included))))
            .collect();

        let mut labels = labels.into_iter();
        let result = self.list.update_each(|dir| {
            if let Some(Some(label)) = labels.next() {
                dir.name = label;
            }
        });
        self.services.listener.update_directories(self.list.dirs().to_vec());
        self.apply(result);
    }

    /// Drop hidden folders from the list, shifting the rest
    fn remove_hidden(&mut self) {
        let included = self.services.config.included();
        let concealed: Vec<bool> = self
            .list
            .dirs()
            .iter()
            .map(|dir| self.is_concealed(dir, &included))
            .collect();

        let mut concealed = concealed.into_iter();
        let result = self.list.remove_where(|_| concealed.next().unwrap_or(false));
        self.apply(result);
        self.services.listener.update_directories(self.list.dirs().to_vec());
    }
}
