//! Back resolution for the Navigator.
//!
//! A back action is resolved in this order:
//! - an open overlay is closed and nothing else happens
//! - stale navigation entries are dropped from the top of the history
//! - the remaining top entry is dispatched and truncated away
//! - with no history left, the exit guard decides

use crate::exit_guard::ExitDecision;
use crate::history::{HistoryEntry, HistoryPayload};
use crate::search::SearchRequest;
use crate::view::Notice;

use super::{Navigator, NavigatorError};

/// What a back action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    OverlayClosed,
    /// Went back to a previous location or search.
    Navigated,
    /// There was history to go back to but dispatching it failed.
    NotApplied,
    /// Back at the root; the user was asked to press again.
    ExitIntercepted,
    /// Second root-level back within the window. The caller terminates.
    Exit,
}

impl Navigator {
    /// Handle one back action from the user.
    pub fn handle_back_action(&mut self) -> BackOutcome {
        if self.view.is_overlay_open() {
            self.view.close_overlay();
            return BackOutcome::OverlayClosed;
        }

        if self.back() {
            self.exit_guard.disarm();
            return BackOutcome::Navigated;
        }

        if !self.history.is_empty() {
            return BackOutcome::NotApplied;
        }

        match self.exit_guard.on_root_back() {
            ExitDecision::Intercepted => {
                self.view.notify(Notice::PushAgainToExit);
                BackOutcome::ExitIntercepted
            }
            ExitDecision::AllowExit => BackOutcome::Exit,
        }
    }

    /// Go back to the newest entry that still exists.
    ///
    /// Returns false when the history runs out or the dispatch fails. Without
    /// a console nothing is checked and the history is left as it is.
    pub fn back(&mut self) -> bool {
        if let Err(e) = self.require_backend() {
            tracing::error!("Failed to go back: {}", e);
            self.view.notify(Notice::HistoryUnknown);
            return false;
        }

        while let Some(top) = self.history.top() {
            if self.validate_navigable(top) {
                break;
            }
            if let Some(stale) = self.history.pop() {
                tracing::debug!(
                    position = stale.position,
                    "history: dropped stale entry {}",
                    stale.payload.title()
                );
            }
        }

        let Some(position) = self.history.top().map(|entry| entry.position) else {
            self.sync_up_affordance();
            return false;
        };
        self.navigate_to_history(position)
    }

    /// Whether `entry` can still be navigated to.
    ///
    /// Search entries are always considered valid. Nothing is valid while
    /// there is no console to query with.
    pub fn validate_navigable(&self, entry: &HistoryEntry) -> bool {
        if !self.backend.is_active() {
            return false;
        }
        match &entry.payload {
            HistoryPayload::Navigation(state) => {
                match self.filesystem.stat(&state.current_directory_path) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!(position = entry.position, "history: stale entry: {}", e);
                        false
                    }
                }
            }
            HistoryPayload::Search(_) => true,
        }
    }

    /// Navigate to the live entry at `position` and drop it together with
    /// everything newer.
    ///
    /// On failure the history is left untouched and the user is told.
    pub fn navigate_to_history(&mut self, position: usize) -> bool {
        let result = match self.history.get(position).cloned() {
            Some(entry) => self.dispatch(&entry.payload),
            None => Err(NavigatorError::NoSuchHistoryEntry(position)),
        };

        match result {
            Ok(()) => {
                self.history.truncate_to(position);
                self.sync_up_affordance();
                true
            }
            Err(e) => {
                tracing::error!("Failed to navigate to history {}: {}", position, e);
                self.view.notify(Notice::HistoryUnknown);
                false
            }
        }
    }

    fn dispatch(&mut self, payload: &HistoryPayload) -> Result<(), NavigatorError> {
        self.require_backend()?;
        match payload {
            HistoryPayload::Navigation(state) => self.view.restore_navigation_state(state)?,
            HistoryPayload::Search(state) => {
                self.search.launch(SearchRequest::Restore(state.clone()))?
            }
        }
        Ok(())
    }
}
