//! Execution backend bootstrap.
//!
//! Before anything touches the filesystem the browser needs a console. The
//! preferred console is privileged when `superuser_mode` is set. If it cannot
//! be created and console selection is allowed, the user is asked whether to
//! continue with the unprivileged console; that choice is saved so the
//! question is not asked again. There is no tier below the unprivileged
//! console: a second failure ends the session.

use std::fmt;

use crate::config::SettingKey;
use crate::config_io::SettingsStore;
use crate::model::backend::{AllocError, BackendProvider, BackendSlot};

/// Answer to the fallback question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackChoice {
    FallBackToUnprivileged,
    Abort,
}

/// Asks the user what to do when the preferred console cannot be created.
pub trait FallbackPrompt {
    fn ask_fallback(&mut self, error: &AllocError) -> FallbackChoice;
}

/// Why no console could be installed.
#[derive(Debug, thiserror::Error)]
pub enum NoBackendReason {
    /// The preferred console failed and selection is not allowed.
    #[error("{0}")]
    AllocationFailed(#[source] AllocError),
    /// The user chose to abort instead of falling back.
    #[error("the unprivileged console was declined")]
    NegotiationDeclined,
    /// Falling back to the unprivileged console failed too.
    #[error("fallback failed: {0}")]
    FallbackFailed(String),
}

/// Bootstrap failures are always fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapFailure {
    #[error("no usable console: {reason}")]
    NoUsableBackend {
        #[source]
        reason: NoBackendReason,
    },
}

impl BootstrapFailure {
    fn no_backend(reason: NoBackendReason) -> Self {
        BootstrapFailure::NoUsableBackend { reason }
    }

    /// True when the session ends because the user said no.
    pub fn is_declined(&self) -> bool {
        matches!(
            self,
            BootstrapFailure::NoUsableBackend {
                reason: NoBackendReason::NegotiationDeclined
            }
        )
    }
}

/// Collaborators needed to create a console.
pub struct Bootstrap<'a> {
    pub provider: &'a mut dyn BackendProvider,
    pub settings: &'a mut dyn SettingsStore,
    pub prompt: &'a mut dyn FallbackPrompt,
}

impl Bootstrap<'_> {
    /// Make sure `slot` holds a console.
    ///
    /// A no-op once a console is active.
    pub fn ensure_backend(&mut self, slot: &mut BackendSlot) -> Result<(), BootstrapFailure> {
        if slot.is_active() {
            return Ok(());
        }

        let privileged = self.settings.get_bool(SettingKey::SuperuserMode);
        let error = match self.provider.allocate(privileged) {
            Ok(handle) => {
                tracing::info!(kind = %handle.kind, "console ready: {}", handle.description);
                slot.replace(handle);
                return Ok(());
            }
            Err(error) => error,
        };

        tracing::error!(privileged, "cannot create console: {}", error);
        if !self.settings.get_bool(SettingKey::AllowConsoleSelection) {
            return Err(BootstrapFailure::no_backend(
                NoBackendReason::AllocationFailed(error),
            ));
        }

        self.negotiate(slot, &error)
    }

    fn negotiate(
        &mut self,
        slot: &mut BackendSlot,
        error: &AllocError,
    ) -> Result<(), BootstrapFailure> {
        match self.prompt.ask_fallback(error) {
            FallbackChoice::Abort => {
                tracing::warn!("user declined the unprivileged console");
                Err(BootstrapFailure::no_backend(
                    NoBackendReason::NegotiationDeclined,
                ))
            }
            FallbackChoice::FallBackToUnprivileged => {
                tracing::warn!("falling back to the unprivileged console");
                let fallback_failed = |e: &dyn fmt::Display| {
                    BootstrapFailure::no_backend(NoBackendReason::FallbackFailed(e.to_string()))
                };

                self.provider
                    .change_to_unprivileged()
                    .map_err(|e| fallback_failed(&e))?;
                let handle = self
                    .provider
                    .allocate(false)
                    .map_err(|e| fallback_failed(&e))?;

                self.settings
                    .set(SettingKey::AllowConsoleSelection, true.into(), true)
                    .map_err(|e| fallback_failed(&e))?;
                self.settings
                    .set(SettingKey::SuperuserMode, false.into(), true)
                    .map_err(|e| fallback_failed(&e))?;

                tracing::info!(kind = %handle.kind, "console ready: {}", handle.description);
                slot.replace(handle);
                Ok(())
            }
        }
    }
}
