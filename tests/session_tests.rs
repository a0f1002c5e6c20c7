// Session lifecycle - deferred tasks and console bootstrap

mod common;

use std::path::PathBuf;

use burrow::app::session::{SessionError, Task};
use burrow::app::BackOutcome;
use burrow::bootstrap::{BootstrapFailure, FallbackChoice, NoBackendReason};
use burrow::config::{SettingKey, SettingValue, Settings};
use burrow::config_io::SettingWrite;
use burrow::model::backend::ExecutionBackend;
use burrow::view::{Notice, ViewId};
use common::fakes::{FakeView, Harness};

fn superuser(allow_console_selection: bool) -> Settings {
    Settings {
        superuser_mode: true,
        allow_console_selection,
        ..Settings::default()
    }
}

#[test]
fn test_on_create_posts_bootstrap_before_navigation() {
    let mut h = Harness::new();
    h.view = FakeView::new(2);
    let mut session = h.session();

    session.on_create();

    let pending: Vec<Task> = session.pending().cloned().collect();
    assert_eq!(
        pending,
        [
            Task::Bootstrap,
            Task::InitialNavigation {
                view: ViewId(0),
                restore: false
            },
            Task::InitialNavigation {
                view: ViewId(1),
                restore: false
            },
        ]
    );

    assert_eq!(session.run_pending().unwrap(), 3);
    assert_eq!(
        session.navigator().backend().state(),
        ExecutionBackend::Unprivileged
    );
    assert_eq!(
        h.view.log().directories,
        [Some(PathBuf::from("/")), Some(PathBuf::from("/"))]
    );
}

#[test]
fn test_on_create_pushes_view_settings() {
    let h = Harness::new();
    let mut session = h.session();

    session.on_create();

    let log = h.view.log();
    assert_eq!(log.disk_usage_warning_level, Some(95));
    assert_eq!(log.console_selection_available, Some(true));
    assert!(log.long_click_action.is_some());
}

#[test]
fn test_fatal_bootstrap_drops_pending_navigation() {
    let h = Harness::with_settings(superuser(false));
    h.backend.privileged_ok.set(false);
    let mut session = h.session();
    session.on_create();

    let err = session.run_pending().unwrap_err();

    assert!(matches!(
        err,
        SessionError::Bootstrap(BootstrapFailure::NoUsableBackend {
            reason: NoBackendReason::AllocationFailed(_)
        })
    ));
    assert!(session.is_terminated());
    assert_eq!(session.pending().count(), 0);
    assert!(h.view.changes().is_empty());
    assert_eq!(h.view.notices(), [Notice::CantCreateConsole]);
    assert!(h.settings.writes().is_empty());
    assert_eq!(h.prompt.asked.get(), 0);

    session.post(Task::Bootstrap);
    assert_eq!(session.pending().count(), 0);
    assert!(matches!(
        session.run_pending(),
        Err(SessionError::Terminated)
    ));
}

#[test]
fn test_fallback_to_unprivileged_persists_both_flags_once() {
    let h = Harness::with_settings(superuser(true));
    h.backend.privileged_ok.set(false);
    let mut session = h.session();
    session.on_create();

    session.run_pending().unwrap();

    assert_eq!(
        session.navigator().backend().state(),
        ExecutionBackend::Unprivileged
    );
    assert_eq!(h.backend.allocations.borrow().as_slice(), [true, false]);
    assert_eq!(
        h.settings.writes(),
        [
            SettingWrite {
                key: SettingKey::AllowConsoleSelection,
                value: SettingValue::Bool(true),
                persist_immediately: true,
            },
            SettingWrite {
                key: SettingKey::SuperuserMode,
                value: SettingValue::Bool(false),
                persist_immediately: true,
            },
        ]
    );
    assert_eq!(h.view.changes(), [PathBuf::from("/")]);
}

#[test]
fn test_declined_fallback_terminates() {
    let mut h = Harness::with_settings(superuser(true));
    h.prompt.answer = FallbackChoice::Abort;
    h.backend.privileged_ok.set(false);
    let mut session = h.session();
    session.on_create();

    match session.run_pending() {
        Err(SessionError::Bootstrap(failure)) => assert!(failure.is_declined()),
        other => panic!("expected a declined bootstrap, got {other:?}"),
    }
    assert!(session.is_terminated());
    assert!(h.settings.writes().is_empty());
    assert!(h.view.changes().is_empty());
}

#[test]
fn test_failing_fallback_terminates() {
    let h = Harness::with_settings(superuser(true));
    h.backend.privileged_ok.set(false);
    h.backend.unprivileged_ok.set(false);
    let mut session = h.session();
    session.on_create();

    assert!(matches!(
        session.run_pending(),
        Err(SessionError::Bootstrap(BootstrapFailure::NoUsableBackend {
            reason: NoBackendReason::FallbackFailed(_)
        }))
    ));
    assert_eq!(h.prompt.asked.get(), 1);
}

#[test]
fn test_resume_restores_without_moving() {
    let h = Harness::new();
    let mut session = h.session();
    session.on_create();
    session.run_pending().unwrap();

    session.on_resume();
    assert_eq!(session.run_pending().unwrap(), 2);

    // The console is already there, so nothing is allocated again
    assert_eq!(h.backend.allocations.borrow().len(), 1);
    assert_eq!(h.view.changes(), [PathBuf::from("/")]);
}

#[test]
fn test_confirmed_exit_terminates_session() {
    let h = Harness::new();
    let mut session = h.session();
    session.on_create();
    session.run_pending().unwrap();

    assert_eq!(session.back(), BackOutcome::ExitIntercepted);
    assert!(!session.is_terminated());
    assert_eq!(session.back(), BackOutcome::Exit);
    assert!(session.is_terminated());
}
