//! Search snapshots and the round-trip with the search collaborator.
//!
//! Query execution is not done here. The navigator only asks the search
//! collaborator to start (or restore) a search and later receives the
//! outcome back through [`crate::app::Navigator::on_search_result`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A snapshot of an executed search.
///
/// Opaque to the history machine beyond dispatching it back to the search
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub directory_path: PathBuf,
    /// Marker the search collaborator uses to find its cached results.
    pub result_marker: String,
}

impl SearchState {
    pub fn new(
        query: impl Into<String>,
        directory_path: impl Into<PathBuf>,
        result_marker: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            directory_path: directory_path.into(),
            result_marker: result_marker.into(),
        }
    }
}

/// Something the navigator asks the search collaborator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Run a new search rooted at `directory_path`.
    New {
        query: Option<String>,
        directory_path: PathBuf,
    },
    /// Re-open a previous search with its results.
    Restore(SearchState),
}

/// How a search session ended, as reported by the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The user picked a result; the browser should open `target`.
    Selected {
        target: PathBuf,
        state: Option<SearchState>,
    },
    /// The user left the search without picking anything.
    Cancelled {
        state: Option<SearchState>,
        /// The search screen was itself reached by a successful back
        /// navigation, so leaving it should continue going back.
        success_navigation: bool,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("search request rejected: {0}")]
    Rejected(String),
}

/// The search collaborator.
pub trait SearchLauncher {
    fn launch(&mut self, request: SearchRequest) -> Result<(), SearchError>;
}
