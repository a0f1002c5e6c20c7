//! History recording and the history picker.

use std::path::Path;

use crate::history::{HistoryEntry, HistoryPayload, NavigationState};
use crate::search::SearchState;
use crate::view::{Notice, ViewId};

use super::{Navigator, NavigatorError};

impl Navigator {
    /// Record a state the user is leaving.
    pub fn on_new_history(&mut self, payload: HistoryPayload) -> HistoryEntry {
        let entry = self.history.record(payload);
        self.sync_up_affordance();
        entry
    }

    /// Move `view` to `path` on the user's request, remembering where it was.
    pub fn open_directory(&mut self, view: ViewId, path: &Path) -> Result<(), NavigatorError> {
        self.move_to(view, path, None)
    }

    /// Change directory and record the left location.
    ///
    /// When the move comes out of a search, the search is recorded instead so
    /// that going back re-opens it.
    pub(super) fn move_to(
        &mut self,
        view: ViewId,
        path: &Path,
        from_search: Option<SearchState>,
    ) -> Result<(), NavigatorError> {
        self.require_backend()?;
        if !self.filesystem.stat(path)?.is_dir() {
            return Err(NavigatorError::NotADirectory(path.to_path_buf()));
        }

        let previous = self.view.current_directory(view);
        self.view.change_directory(view, path)?;

        let payload = match from_search {
            Some(state) => Some(HistoryPayload::Search(state)),
            None => previous
                .filter(|previous| previous != path)
                .map(|previous| HistoryPayload::Navigation(NavigationState::new(view, previous))),
        };
        if let Some(payload) = payload {
            self.on_new_history(payload);
        }
        Ok(())
    }

    pub fn clear_history(&mut self) {
        tracing::debug!(entries = self.history.len(), "history: clear");
        self.history.clear();
        self.sync_up_affordance();
    }

    /// Serialized history handed to the history picker.
    pub fn open_history(&self) -> Result<String, NavigatorError> {
        self.history
            .export_json()
            .map_err(NavigatorError::UnknownHistoryKind)
    }

    /// The history picker returned one of the entries it was given.
    ///
    /// An entry that does not decode is a programming error and is returned
    /// as [`NavigatorError::UnknownHistoryKind`]. An entry that no longer
    /// matches the live history is a navigation failure.
    pub fn on_history_selected(&mut self, raw: &str) -> Result<bool, NavigatorError> {
        let selected =
            HistoryEntry::from_json(raw).map_err(NavigatorError::UnknownHistoryKind)?;

        if self.history.get(selected.position) != Some(&selected) {
            tracing::error!(
                "Failed to navigate to history {}: entry is gone",
                selected.position
            );
            self.view.notify(Notice::HistoryUnknown);
            return Ok(false);
        }
        Ok(self.navigate_to_history(selected.position))
    }

    /// The history picker cleared the history.
    pub fn on_history_cleared(&mut self) {
        self.clear_history();
    }
}
