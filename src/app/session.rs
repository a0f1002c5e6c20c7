//! Session lifecycle.
//!
//! Slow work (console bootstrap, initial navigation) is never done inside an
//! input handler. It is posted as a [`Task`] and run later by
//! [`Session::run_pending`] on the same thread, strictly in post order. A
//! failed bootstrap terminates the session and discards whatever was still
//! queued, so navigation never runs without a console.

use std::collections::VecDeque;

use crate::bootstrap::BootstrapFailure;
use crate::view::{Notice, ViewId};

use super::{BackOutcome, Navigator};

/// Deferred work for the control thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Bootstrap,
    InitialNavigation { view: ViewId, restore: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapFailure),
    #[error("the session has terminated")]
    Terminated,
}

pub struct Session {
    navigator: Navigator,
    queue: VecDeque<Task>,
    terminated: bool,
}

impl Session {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator,
            queue: VecDeque::new(),
            terminated: false,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter()
    }

    pub fn post(&mut self, task: Task) {
        if self.terminated {
            tracing::debug!(?task, "session terminated, dropping task");
            return;
        }
        self.queue.push_back(task);
    }

    /// The session starts: bootstrap first, then every view's first
    /// navigation.
    pub fn on_create(&mut self) {
        self.navigator.apply_view_settings();
        self.post(Task::Bootstrap);
        for view in 0..self.navigator.view().view_count() {
            self.post(Task::InitialNavigation {
                view: ViewId(view),
                restore: false,
            });
        }
    }

    /// The session comes back to the foreground.
    ///
    /// Nothing already queued is cancelled.
    pub fn on_resume(&mut self) {
        self.post(Task::Bootstrap);
        for view in 0..self.navigator.view().view_count() {
            self.post(Task::InitialNavigation {
                view: ViewId(view),
                restore: true,
            });
        }
    }

    /// Run queued tasks in post order until the queue is empty.
    ///
    /// Returns how many tasks ran.
    pub fn run_pending(&mut self) -> Result<usize, SessionError> {
        if self.terminated {
            return Err(SessionError::Terminated);
        }

        let mut ran = 0;
        while let Some(task) = self.queue.pop_front() {
            ran += 1;
            match task {
                Task::Bootstrap => {
                    if let Err(e) = self.navigator.ensure_backend() {
                        tracing::error!("bootstrap failed: {}", e);
                        self.navigator.view_mut().notify(Notice::CantCreateConsole);
                        self.terminate();
                        return Err(e.into());
                    }
                }
                Task::InitialNavigation { view, restore } => {
                    if let Err(e) = self.navigator.init_navigation(view, restore) {
                        tracing::error!(%view, "initial navigation failed: {}", e);
                    }
                }
            }
        }
        Ok(ran)
    }

    /// Handle a back action, terminating on a confirmed exit.
    pub fn back(&mut self) -> BackOutcome {
        let outcome = self.navigator.handle_back_action();
        if outcome == BackOutcome::Exit {
            tracing::info!("exit confirmed");
            self.terminate();
        }
        outcome
    }

    pub fn terminate(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!(dropped = self.queue.len(), "session: dropping pending tasks");
        }
        self.queue.clear();
        self.terminated = true;
    }
}
