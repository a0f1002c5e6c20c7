//! Shell sessions backed by real processes.
//!
//! Allocation only proves a session can be opened: it runs a no-op through
//! the shell (through `sudo -n` for the privileged console) and keeps the
//! command line as the handle description.

use std::process::{Command, Stdio};

use crate::model::backend::{AllocError, BackendError, BackendHandle, BackendKind, BackendProvider};

/// [`BackendProvider`] that opens `sh` sessions.
#[derive(Debug, Clone)]
pub struct ProcessBackendProvider {
    shell: String,
    /// Command prefix that elevates the shell, e.g. `["sudo", "-n"]`
    elevate: Vec<String>,
    /// Set once the user agreed to fall back to the unprivileged console
    unprivileged_only: bool,
}

impl Default for ProcessBackendProvider {
    fn default() -> Self {
        Self::new(detect_shell())
    }
}

impl ProcessBackendProvider {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            elevate: vec!["sudo".to_string(), "-n".to_string()],
            unprivileged_only: false,
        }
    }

    /// Use a different elevation prefix (e.g. `["doas", "-n"]`).
    pub fn with_elevation<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elevate = prefix.into_iter().map(Into::into).collect();
        self
    }

    fn command_line(&self, kind: BackendKind) -> Vec<String> {
        let mut argv = Vec::new();
        if kind.is_privileged() {
            argv.extend(self.elevate.iter().cloned());
        }
        argv.push(self.shell.clone());
        argv
    }

    fn probe(&self, kind: BackendKind) -> Result<BackendHandle, AllocError> {
        let argv = self.command_line(kind);
        let description = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Err(AllocError::Unavailable {
                kind,
                reason: "empty command line".to_string(),
            });
        };

        tracing::debug!(%kind, "probing console: {}", description);
        let status = Command::new(program)
            .args(args)
            .args(["-c", "true"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AllocError::Unavailable {
                kind,
                reason: format!("failed to spawn {program}: {e}"),
            })?;

        if status.success() {
            Ok(BackendHandle::new(kind, description))
        } else {
            Err(AllocError::PermissionDenied {
                kind,
                reason: format!("{description} exited with {:?}", status.code()),
            })
        }
    }
}

impl BackendProvider for ProcessBackendProvider {
    fn allocate(&mut self, privileged: bool) -> Result<BackendHandle, AllocError> {
        let kind = BackendKind::from_privileged(privileged && !self.unprivileged_only);
        self.probe(kind)
    }

    fn change_to_unprivileged(&mut self) -> Result<(), BackendError> {
        self.unprivileged_only = true;
        Ok(())
    }
}

/// Detect the shell to use for the console.
fn detect_shell() -> String {
    // Try SHELL environment variable first
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.is_empty() {
            return shell;
        }
    }
    "/bin/sh".to_string()
}
