//! View collaborator boundary.
//!
//! Rendering of listings, breadcrumbs and dialogs lives outside this crate.
//! The navigator drives the presentation layer only through [`ViewHost`].

pub mod terminal;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LongClickAction;
use crate::history::NavigationState;

/// Identifier of one navigation view (one browsing pane).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ViewId(pub usize);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Short user-facing messages the navigator asks the view layer to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PushAgainToExit,
    HistoryUnknown,
    CantCreateConsole,
    InvalidInitialDirectory(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PushAgainToExit => write!(f, "Press back again to exit"),
            Notice::HistoryUnknown => write!(f, "Unable to navigate to the history entry"),
            Notice::CantCreateConsole => {
                write!(f, "Unable to create a console. The application will close")
            }
            Notice::InvalidInitialDirectory(dir) => write!(
                f,
                "The initial directory \"{dir}\" is not valid. Using the root directory"
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("no such view: {0}")]
    UnknownView(ViewId),
    #[error("cannot change {view} to {}: {reason}", path.display())]
    ChangeDirectory {
        view: ViewId,
        path: PathBuf,
        reason: String,
    },
}

/// The view collaborator.
pub trait ViewHost {
    /// Number of navigation views the host manages.
    fn view_count(&self) -> usize;

    /// The view that currently has focus.
    fn current_view(&self) -> ViewId;

    /// Directory shown by `view`, if it has navigated anywhere yet.
    fn current_directory(&self, view: ViewId) -> Option<PathBuf>;

    fn change_directory(&mut self, view: ViewId, path: &Path) -> Result<(), ViewError>;

    /// Put a view back into a previously recorded state.
    fn restore_navigation_state(&mut self, state: &NavigationState) -> Result<(), ViewError> {
        self.change_directory(state.view_id, &state.current_directory_path)
    }

    /// Reload the listing of the current view.
    fn refresh(&mut self);

    /// Whether an overlay (such as the view configuration bar) is showing.
    fn is_overlay_open(&self) -> bool;

    /// Show the view configuration overlay.
    fn open_overlay(&mut self);

    fn close_overlay(&mut self);

    fn notify(&mut self, notice: Notice);

    /// Show or hide the "up" affordance that triggers a back action.
    fn set_up_affordance(&mut self, enabled: bool);

    fn set_disk_usage_warning_level(&mut self, level: u8);

    fn set_long_click_action(&mut self, action: LongClickAction);

    fn set_console_selection_available(&mut self, available: bool);
}
