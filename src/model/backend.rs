//! Command execution backend
//!
//! Every filesystem operation of the browser runs through a shell session,
//! either privileged (superuser) or unprivileged. The transport itself lives
//! behind [`BackendProvider`]; this module only models which session is
//! active and the slot that owns it.

use std::fmt;

/// Privilege level of a shell session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Privileged,
    Unprivileged,
}

impl BackendKind {
    pub fn from_privileged(privileged: bool) -> Self {
        if privileged {
            BackendKind::Privileged
        } else {
            BackendKind::Unprivileged
        }
    }

    pub fn is_privileged(self) -> bool {
        self == BackendKind::Privileged
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Privileged => f.write_str("privileged"),
            BackendKind::Unprivileged => f.write_str("unprivileged"),
        }
    }
}

/// A live shell session handed out by a [`BackendProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendHandle {
    pub kind: BackendKind,
    /// Provider specific description, e.g. the shell command line
    pub description: String,
}

impl BackendHandle {
    pub fn new(kind: BackendKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// What is currently installed in the [`BackendSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionBackend {
    Absent,
    Privileged,
    Unprivileged,
}

#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    #[error("{kind} console is not available: {reason}")]
    Unavailable { kind: BackendKind, reason: String },
    #[error("{kind} console was denied: {reason}")]
    PermissionDenied { kind: BackendKind, reason: String },
}

#[derive(Debug, thiserror::Error)]
#[error("cannot switch to the unprivileged console: {0}")]
pub struct BackendError(pub String);

/// Backend collaborator: creates shell sessions.
pub trait BackendProvider {
    fn allocate(&mut self, privileged: bool) -> Result<BackendHandle, AllocError>;

    /// Reconfigure the provider so future allocations use the unprivileged
    /// console.
    fn change_to_unprivileged(&mut self) -> Result<(), BackendError>;
}

/// Owner of the single active backend.
///
/// The handle is replaced wholesale; nothing mutates it in place.
#[derive(Debug, Default)]
pub struct BackendSlot {
    active: Option<BackendHandle>,
}

impl BackendSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handle`, returning whatever was active before
    pub fn replace(&mut self, handle: BackendHandle) -> Option<BackendHandle> {
        tracing::debug!(kind = %handle.kind, "backend slot: installing {}", handle.description);
        self.active.replace(handle)
    }

    pub fn active(&self) -> Option<&BackendHandle> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> ExecutionBackend {
        match self.active.as_ref().map(|handle| handle.kind) {
            None => ExecutionBackend::Absent,
            Some(BackendKind::Privileged) => ExecutionBackend::Privileged,
            Some(BackendKind::Unprivileged) => ExecutionBackend::Unprivileged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_is_absent() {
        let slot = BackendSlot::new();
        assert!(!slot.is_active());
        assert_eq!(slot.state(), ExecutionBackend::Absent);
    }

    #[test]
    fn replace_swaps_the_whole_handle() {
        let mut slot = BackendSlot::new();
        assert!(slot
            .replace(BackendHandle::new(BackendKind::Privileged, "su"))
            .is_none());
        assert_eq!(slot.state(), ExecutionBackend::Privileged);

        let previous = slot.replace(BackendHandle::new(BackendKind::Unprivileged, "sh"));
        assert_eq!(previous.map(|h| h.kind), Some(BackendKind::Privileged));
        assert_eq!(slot.state(), ExecutionBackend::Unprivileged);
        assert_eq!(slot.active().map(|h| h.description.as_str()), Some("sh"));
    }
}
