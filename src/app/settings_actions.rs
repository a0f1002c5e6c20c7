//! Settings reactions and initial navigation for the Navigator.

use std::path::{Path, PathBuf};

use crate::config::{LongClickAction, SettingKey};
use crate::view::{Notice, ViewId};

use super::{Navigator, NavigatorError};

impl Navigator {
    /// React to a setting changed by someone else.
    pub fn on_setting_changed(&mut self, key: SettingKey) {
        tracing::debug!(%key, "setting changed");
        match key {
            SettingKey::DiskUsageWarningLevel => {
                let level = self
                    .settings
                    .get(key)
                    .as_int()
                    .or_else(|| key.default_value().as_int())
                    .and_then(|level| u8::try_from(level).ok())
                    .unwrap_or(u8::MAX)
                    .min(100);
                self.view.set_disk_usage_warning_level(level);
            }
            SettingKey::DefaultLongClickAction => {
                let action = self
                    .settings
                    .get(key)
                    .as_text()
                    .and_then(LongClickAction::from_id)
                    .unwrap_or_default();
                self.view.set_long_click_action(action);
            }
            SettingKey::CaseSensitiveSort => self.view.refresh(),
            SettingKey::AllowConsoleSelection => {
                let available = self.settings.get_bool(key);
                self.view.set_console_selection_available(available);
            }
            SettingKey::SuperuserMode
            | SettingKey::InitialDirectory
            | SettingKey::LastSearch => {}
        }
    }

    /// Push every setting the view cares about.
    pub fn apply_view_settings(&mut self) {
        for key in [
            SettingKey::DiskUsageWarningLevel,
            SettingKey::DefaultLongClickAction,
            SettingKey::AllowConsoleSelection,
        ] {
            self.on_setting_changed(key);
        }
    }

    /// First navigation of `view` once the console is ready.
    ///
    /// A restored view keeps the directory it already shows.
    pub fn init_navigation(&mut self, view: ViewId, restore: bool) -> Result<(), NavigatorError> {
        self.require_backend()?;
        if restore {
            tracing::debug!(%view, "initial navigation: restoring");
            return Ok(());
        }

        let configured = self
            .start_directory
            .clone()
            .unwrap_or_else(|| self.settings.get_text(SettingKey::InitialDirectory));
        let directory = match self.resolve_initial_directory(&configured) {
            Some(directory) => directory,
            None => {
                self.view
                    .notify(Notice::InvalidInitialDirectory(configured.clone()));
                PathBuf::from(crate::ROOT_DIRECTORY)
            }
        };

        tracing::info!(%view, "initial directory {:?}", directory);
        self.view.change_directory(view, &directory)?;
        self.sync_up_affordance();
        Ok(())
    }

    fn resolve_initial_directory(&self, configured: &str) -> Option<PathBuf> {
        let resolved = match self.filesystem.resolve_absolute(Path::new(configured)) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("invalid initial directory {:?}: {}", configured, e);
                return None;
            }
        };
        match self.filesystem.stat(&resolved) {
            Ok(metadata) if metadata.is_dir() => Some(resolved),
            Ok(_) => {
                tracing::warn!("initial directory {:?} is not a directory", resolved);
                None
            }
            Err(e) => {
                tracing::warn!("invalid initial directory {:?}: {}", resolved, e);
                None
            }
        }
    }
}
