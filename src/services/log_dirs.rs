//! XDG-compliant log directory management
//!
//! Logs are stored in `$XDG_STATE_HOME/burrow/logs/` (typically
//! `~/.local/state/burrow/logs/`), one PID-named file per process so several
//! browsers can run side by side.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Cached log directory path
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the base log directory, creating it if necessary.
///
/// Falls back to the system temp directory when neither `XDG_STATE_HOME`
/// nor `HOME` is usable or the directory cannot be created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("burrow-logs");
        let dir = xdg_log_dir(
            std::env::var_os("XDG_STATE_HOME").as_deref().map(Path::new),
            std::env::var_os("HOME").as_deref().map(Path::new),
        )
        .unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            return fallback;
        }

        dir
    })
}

/// Resolve the log directory from the XDG state home and the home directory.
fn xdg_log_dir(state_home: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    // Relative XDG paths are invalid and ignored
    if let Some(state_home) = state_home.filter(|p| p.is_absolute()) {
        return Some(state_home.join("burrow").join("logs"));
    }

    home.map(|home| home.join(".local").join("state").join("burrow").join("logs"))
}

/// Get the path for the main log file for this process.
///
/// Returns `{log_dir}/burrow-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("burrow-{}.log", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_state_home_wins() {
        let dir = xdg_log_dir(Some(Path::new("/state")), Some(Path::new("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/state/burrow/logs")));
    }

    #[test]
    fn relative_state_home_falls_back_to_home() {
        let dir = xdg_log_dir(Some(Path::new("state")), Some(Path::new("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/home/u/.local/state/burrow/logs")));
    }

    #[test]
    fn nothing_known_yields_none() {
        assert_eq!(xdg_log_dir(None, None), None);
    }

    #[test]
    fn main_log_path_contains_pid() {
        let path = main_log_path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("burrow-{}.log", std::process::id()));
    }
}
