//! The navigation controller.
//!
//! [`Navigator`] owns the history store, the exit guard and the backend slot,
//! and talks to everything else through the collaborator traits. Its methods
//! are spread over several files by concern:
//! - `back_actions`: the back resolver and the stale-entry validator
//! - `bookmark_actions`: opening a directory picked from the bookmarks
//! - `history_actions`: recording, the history picker and directory moves
//! - `search_actions`: the round-trip with the search collaborator
//! - `settings_actions`: reactions to changed settings and initial navigation

mod back_actions;
mod bookmark_actions;
mod history_actions;
mod search_actions;
mod settings_actions;
pub mod session;

pub use back_actions::BackOutcome;

use std::path::PathBuf;

use crate::bootstrap::{Bootstrap, BootstrapFailure, FallbackPrompt};
use crate::config::ConfigError;
use crate::config_io::SettingsStore;
use crate::exit_guard::ExitGuard;
use crate::history::{HistoryError, HistoryStore};
use crate::model::backend::{BackendProvider, BackendSlot};
use crate::model::filesystem::{FileSystem, FsError};
use crate::search::{SearchError, SearchLauncher};
use crate::services::time_source::SharedTimeSource;
use crate::view::{ViewError, ViewHost};

#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    /// A history entry handed back from outside could not be decoded into
    /// a known payload.
    #[error("unknown history entry kind: {0}")]
    UnknownHistoryKind(#[source] HistoryError),
    #[error("no console is active")]
    NoBackend,
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("no history entry at position {0}")]
    NoSuchHistoryEntry(usize),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything the navigator drives but does not own.
pub struct Collaborators {
    pub filesystem: Box<dyn FileSystem>,
    pub view: Box<dyn ViewHost>,
    pub search: Box<dyn SearchLauncher>,
    pub settings: Box<dyn SettingsStore>,
    pub backend_provider: Box<dyn BackendProvider>,
    pub fallback_prompt: Box<dyn FallbackPrompt>,
}

pub struct Navigator {
    history: HistoryStore,
    exit_guard: ExitGuard,
    backend: BackendSlot,

    filesystem: Box<dyn FileSystem>,
    view: Box<dyn ViewHost>,
    search: Box<dyn SearchLauncher>,
    settings: Box<dyn SettingsStore>,
    backend_provider: Box<dyn BackendProvider>,
    fallback_prompt: Box<dyn FallbackPrompt>,

    /// Replaces the `initial_directory` setting for this session only
    start_directory: Option<String>,
}

impl Navigator {
    pub fn new(collaborators: Collaborators, time_source: SharedTimeSource) -> Self {
        Self::with_exit_guard(collaborators, ExitGuard::new(time_source))
    }

    pub fn with_exit_guard(collaborators: Collaborators, exit_guard: ExitGuard) -> Self {
        let Collaborators {
            filesystem,
            view,
            search,
            settings,
            backend_provider,
            fallback_prompt,
        } = collaborators;

        Self {
            history: HistoryStore::new(),
            exit_guard,
            backend: BackendSlot::new(),
            filesystem,
            view,
            search,
            settings,
            backend_provider,
            fallback_prompt,
            start_directory: None,
        }
    }

    /// Start in `directory` instead of the configured initial directory.
    pub fn set_start_directory(&mut self, directory: impl Into<String>) {
        self.start_directory = Some(directory.into());
    }

    /// Make sure a console is installed, negotiating a fallback if needed.
    pub fn ensure_backend(&mut self) -> Result<(), BootstrapFailure> {
        Bootstrap {
            provider: self.backend_provider.as_mut(),
            settings: self.settings.as_mut(),
            prompt: self.fallback_prompt.as_mut(),
        }
        .ensure_backend(&mut self.backend)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn exit_guard(&self) -> &ExitGuard {
        &self.exit_guard
    }

    pub fn backend(&self) -> &BackendSlot {
        &self.backend
    }

    pub fn view(&self) -> &dyn ViewHost {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn ViewHost {
        self.view.as_mut()
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn settings_mut(&mut self) -> &mut dyn SettingsStore {
        self.settings.as_mut()
    }

    /// Nothing that touches the filesystem may run without a console.
    fn require_backend(&self) -> Result<(), NavigatorError> {
        if self.backend.is_active() {
            Ok(())
        } else {
            Err(NavigatorError::NoBackend)
        }
    }

    fn sync_up_affordance(&mut self) {
        self.view.set_up_affordance(!self.history.is_empty());
    }
}
