//! Bookmark picker results for the Navigator.

use std::path::Path;

use super::{Navigator, NavigatorError};

impl Navigator {
    /// The bookmark picker returned `path`; open it in the focused view.
    ///
    /// Bookmarks are stored elsewhere. This only moves, so the left location
    /// is recorded like any other directory change.
    pub fn on_bookmark_selected(&mut self, path: &Path) -> Result<(), NavigatorError> {
        let view = self.view.current_view();
        tracing::debug!("bookmark: opening {:?} in {:?}", path, view);
        self.move_to(view, path, None)
    }
}
