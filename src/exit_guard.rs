//! Double-confirmation gate for leaving the browser with "back".
//!
//! The first back press at the navigation root only arms the gate and asks
//! the caller to show a "press again to exit" notice. A second press within
//! [`RELEASE_EXIT_CHECK_TIMEOUT`] lets the exit through. Once the window has
//! elapsed the next press re-arms the gate and the notice is shown again.

use std::time::{Duration, Instant};

use crate::services::time_source::SharedTimeSource;

/// Window during which a second root-level back press exits.
pub const RELEASE_EXIT_CHECK_TIMEOUT: Duration = Duration::from_millis(3500);

/// Result of a root-level back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// The press was swallowed; the caller shows the "press again" notice.
    Intercepted,
    /// The press confirms a previous one; the caller terminates.
    AllowExit,
}

/// Snapshot of the gate, mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitGuardState {
    pub armed: bool,
    pub armed_at: Option<Instant>,
}

#[derive(Debug)]
pub struct ExitGuard {
    state: ExitGuardState,
    timeout: Duration,
    time_source: SharedTimeSource,
}

impl ExitGuard {
    pub fn new(time_source: SharedTimeSource) -> Self {
        Self::with_timeout(time_source, RELEASE_EXIT_CHECK_TIMEOUT)
    }

    pub fn with_timeout(time_source: SharedTimeSource, timeout: Duration) -> Self {
        Self {
            state: ExitGuardState::default(),
            timeout,
            time_source,
        }
    }

    /// Handle a back press that found nothing left to go back to.
    pub fn on_root_back(&mut self) -> ExitDecision {
        if self.is_armed() {
            tracing::debug!("exit guard: confirmed within window, allowing exit");
            return ExitDecision::AllowExit;
        }

        let now = self.time_source.now();
        self.state = ExitGuardState {
            armed: true,
            armed_at: Some(now),
        };
        tracing::debug!("exit guard: armed");
        ExitDecision::Intercepted
    }

    /// Forget any pending confirmation.
    ///
    /// Called whenever a back press actually navigated somewhere, so the
    /// next root-level press starts a fresh cycle.
    pub fn disarm(&mut self) {
        if self.state.armed {
            tracing::trace!("exit guard: disarmed");
        }
        self.state = ExitGuardState::default();
    }

    /// True while a confirming press would exit.
    pub fn is_armed(&self) -> bool {
        match (self.state.armed, self.state.armed_at) {
            (true, Some(at)) => self.time_source.elapsed_since(at) <= self.timeout,
            _ => false,
        }
    }

    pub fn state(&self) -> ExitGuardState {
        self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
