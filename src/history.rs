//! Navigation history for the back action.
//!
//! The store is a plain stack of visited states. Each entry remembers the
//! position it was recorded at, which is also its index, so going back to an
//! entry means dropping it and everything newer in one suffix truncation.
//! Nothing is ever inserted or removed in the middle.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::search::SearchState;
use crate::view::ViewId;

/// A snapshot of a browseable location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub view_id: ViewId,
    pub current_directory_path: PathBuf,
}

impl NavigationState {
    pub fn new(view_id: ViewId, current_directory_path: impl Into<PathBuf>) -> Self {
        Self {
            view_id,
            current_directory_path: current_directory_path.into(),
        }
    }
}

/// What a history entry points back to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryPayload {
    Navigation(NavigationState),
    Search(SearchState),
}

impl HistoryPayload {
    /// Short human readable label, used by the history picker and in logs.
    pub fn title(&self) -> String {
        match self {
            HistoryPayload::Navigation(state) => {
                state.current_directory_path.display().to_string()
            }
            HistoryPayload::Search(state) => format!(
                "search \"{}\" in {}",
                state.query,
                state.directory_path.display()
            ),
        }
    }
}

/// A single entry in the navigation history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Index of the entry at the time it was recorded
    pub position: usize,
    pub payload: HistoryPayload,
}

impl HistoryEntry {
    /// Decode one entry handed back by the history picker.
    pub fn from_json(raw: &str) -> Result<Self, HistoryError> {
        serde_json::from_str(raw).map_err(HistoryError::Malformed)
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        serde_json::to_string(self).map_err(HistoryError::Malformed)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}  {}", self.position, self.payload.title())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("malformed history entry: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Stack of navigation and search states, newest last.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new state on top of the stack.
    ///
    /// The entry's position is the store length before the call.
    pub fn record(&mut self, payload: HistoryPayload) -> HistoryEntry {
        let entry = HistoryEntry {
            position: self.entries.len(),
            payload,
        };
        tracing::debug!(position = entry.position, title = %entry.payload.title(), "history: record");
        self.entries.push(entry.clone());
        entry
    }

    /// Drop the entry at `position` and every entry recorded after it.
    ///
    /// Does nothing if `position` is past the end.
    pub fn truncate_to(&mut self, position: usize) {
        if position >= self.entries.len() {
            return;
        }
        tracing::debug!(
            position,
            removed = self.entries.len() - position,
            "history: truncate"
        );
        self.entries.truncate(position);
    }

    /// Remove the newest entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The newest entry.
    pub fn top(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn get(&self, position: usize) -> Option<&HistoryEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the whole stack for the history picker.
    pub fn export_json(&self) -> Result<String, HistoryError> {
        serde_json::to_string(&self.entries).map_err(HistoryError::Malformed)
    }
}
