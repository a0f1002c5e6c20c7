//! Search round-trips for the Navigator.

use std::path::PathBuf;

use crate::config::SettingKey;
use crate::search::{SearchOutcome, SearchRequest};

use super::{Navigator, NavigatorError};

impl Navigator {
    /// Start a new search in the current directory of the focused view.
    ///
    /// Without a query the last search is offered again.
    pub fn request_search(&mut self, query: Option<String>) -> Result<(), NavigatorError> {
        let view = self.view.current_view();
        let directory_path = self
            .view
            .current_directory(view)
            .unwrap_or_else(|| PathBuf::from(crate::ROOT_DIRECTORY));

        let query = query.filter(|q| !q.is_empty()).or_else(|| {
            let last = self.settings.get_text(SettingKey::LastSearch);
            (!last.is_empty()).then_some(last)
        });
        if let Some(query) = &query {
            self.settings
                .set(SettingKey::LastSearch, query.as_str().into(), false)?;
        }

        tracing::debug!(?query, "search: new request in {:?}", directory_path);
        self.search.launch(SearchRequest::New {
            query,
            directory_path,
        })?;
        Ok(())
    }

    /// The search collaborator finished.
    pub fn on_search_result(&mut self, outcome: SearchOutcome) -> Result<(), NavigatorError> {
        match outcome {
            SearchOutcome::Selected { target, state } => {
                let view = self.view.current_view();
                self.move_to(view, &target, state)
            }
            SearchOutcome::Cancelled {
                success_navigation: true,
                ..
            } => {
                // The search was re-opened by going back; leaving it keeps going
                if !self.back() {
                    tracing::debug!("search: nothing left to go back to");
                }
                Ok(())
            }
            SearchOutcome::Cancelled { .. } => {
                self.view.refresh();
                Ok(())
            }
        }
    }
}
