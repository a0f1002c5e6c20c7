//! In-memory collaborators for driving a `Navigator` in tests.
//!
//! Every fake is a cheap handle around shared state so a test can hand one
//! clone to the navigator and keep another to inspect what happened.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use burrow::app::session::Session;
use burrow::app::{Collaborators, Navigator};
use burrow::bootstrap::{FallbackChoice, FallbackPrompt};
use burrow::config::{ConfigError, LongClickAction, SettingKey, SettingValue, Settings};
use burrow::config_io::{MemorySettingsStore, SettingWrite, SettingsStore};
use burrow::model::backend::{
    AllocError, BackendError, BackendHandle, BackendKind, BackendProvider,
};
use burrow::model::filesystem::{FileMetadata, FileSystem, FsError};
use burrow::search::{SearchError, SearchLauncher, SearchRequest};
use burrow::services::time_source::TestTimeSource;
use burrow::view::{Notice, ViewError, ViewHost, ViewId};

/// Filesystem that only knows a set of directories.
#[derive(Clone, Default)]
pub struct FakeFileSystem {
    directories: Rc<RefCell<HashSet<PathBuf>>>,
    /// Paths whose query fails with an I/O error
    failing: Rc<RefCell<HashSet<PathBuf>>>,
    pub stats: Rc<Cell<usize>>,
}

impl FakeFileSystem {
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.directories.borrow_mut().insert(path.into());
    }

    pub fn remove_dir(&self, path: impl AsRef<Path>) {
        self.directories.borrow_mut().remove(path.as_ref());
    }

    pub fn fail_path(&self, path: impl Into<PathBuf>) {
        self.failing.borrow_mut().insert(path.into());
    }
}

impl FileSystem for FakeFileSystem {
    fn stat(&self, path: &Path) -> Result<FileMetadata, FsError> {
        self.stats.set(self.stats.get() + 1);
        if self.failing.borrow().contains(path) {
            return Err(FsError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "fake"),
            });
        }
        if self.directories.borrow().contains(path) {
            Ok(FileMetadata::directory())
        } else {
            Err(FsError::NotFound(path.to_path_buf()))
        }
    }

    fn resolve_absolute(&self, path: &Path) -> Result<PathBuf, FsError> {
        if path.is_absolute() && self.directories.borrow().contains(path) {
            Ok(path.to_path_buf())
        } else {
            Err(FsError::NotFound(path.to_path_buf()))
        }
    }
}

/// Everything the navigator asked the view to do.
#[derive(Debug, Default)]
pub struct ViewLog {
    pub directories: Vec<Option<PathBuf>>,
    pub current: usize,
    pub overlay_open: bool,
    pub changes: Vec<(ViewId, PathBuf)>,
    pub notices: Vec<Notice>,
    pub refreshes: usize,
    pub up_affordance: bool,
    pub disk_usage_warning_level: Option<u8>,
    pub long_click_action: Option<LongClickAction>,
    pub console_selection_available: Option<bool>,
    /// Paths the view refuses to show
    pub broken: HashSet<PathBuf>,
}

#[derive(Clone)]
pub struct FakeView(pub Rc<RefCell<ViewLog>>);

impl FakeView {
    pub fn new(view_count: usize) -> Self {
        Self(Rc::new(RefCell::new(ViewLog {
            directories: vec![None; view_count],
            ..ViewLog::default()
        })))
    }

    pub fn log(&self) -> std::cell::Ref<'_, ViewLog> {
        self.0.borrow()
    }

    pub fn changes(&self) -> Vec<PathBuf> {
        self.0.borrow().changes.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.0.borrow().notices.clone()
    }

    pub fn show_overlay(&self) {
        self.0.borrow_mut().overlay_open = true;
    }

    pub fn break_path(&self, path: impl Into<PathBuf>) {
        self.0.borrow_mut().broken.insert(path.into());
    }
}

impl ViewHost for FakeView {
    fn view_count(&self) -> usize {
        self.0.borrow().directories.len()
    }

    fn current_view(&self) -> ViewId {
        ViewId(self.0.borrow().current)
    }

    fn current_directory(&self, view: ViewId) -> Option<PathBuf> {
        self.0.borrow().directories.get(view.0).cloned().flatten()
    }

    fn change_directory(&mut self, view: ViewId, path: &Path) -> Result<(), ViewError> {
        let mut log = self.0.borrow_mut();
        if view.0 >= log.directories.len() {
            return Err(ViewError::UnknownView(view));
        }
        if log.broken.contains(path) {
            return Err(ViewError::ChangeDirectory {
                view,
                path: path.to_path_buf(),
                reason: "broken".to_string(),
            });
        }
        log.directories[view.0] = Some(path.to_path_buf());
        log.changes.push((view, path.to_path_buf()));
        Ok(())
    }

    fn refresh(&mut self) {
        self.0.borrow_mut().refreshes += 1;
    }

    fn is_overlay_open(&self) -> bool {
        self.0.borrow().overlay_open
    }

    fn open_overlay(&mut self) {
        self.0.borrow_mut().overlay_open = true;
    }

    fn close_overlay(&mut self) {
        self.0.borrow_mut().overlay_open = false;
    }

    fn notify(&mut self, notice: Notice) {
        self.0.borrow_mut().notices.push(notice);
    }

    fn set_up_affordance(&mut self, enabled: bool) {
        self.0.borrow_mut().up_affordance = enabled;
    }

    fn set_disk_usage_warning_level(&mut self, level: u8) {
        self.0.borrow_mut().disk_usage_warning_level = Some(level);
    }

    fn set_long_click_action(&mut self, action: LongClickAction) {
        self.0.borrow_mut().long_click_action = Some(action);
    }

    fn set_console_selection_available(&mut self, available: bool) {
        self.0.borrow_mut().console_selection_available = Some(available);
    }
}

/// Search collaborator that remembers every request.
#[derive(Clone, Default)]
pub struct FakeSearch {
    pub requests: Rc<RefCell<Vec<SearchRequest>>>,
    pub unavailable: Rc<Cell<bool>>,
}

impl SearchLauncher for FakeSearch {
    fn launch(&mut self, request: SearchRequest) -> Result<(), SearchError> {
        if self.unavailable.get() {
            return Err(SearchError::Unavailable("offline".to_string()));
        }
        self.requests.borrow_mut().push(request);
        Ok(())
    }
}

/// A `MemorySettingsStore` the test can still look at.
#[derive(Clone, Default)]
pub struct SharedSettings(pub Rc<RefCell<MemorySettingsStore>>);

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self(Rc::new(RefCell::new(MemorySettingsStore::new(settings))))
    }

    pub fn writes(&self) -> Vec<SettingWrite> {
        self.0.borrow().writes().to_vec()
    }
}

impl SettingsStore for SharedSettings {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.0.borrow().get(key)
    }

    fn set(
        &mut self,
        key: SettingKey,
        value: SettingValue,
        persist_immediately: bool,
    ) -> Result<(), ConfigError> {
        self.0.borrow_mut().set(key, value, persist_immediately)
    }
}

/// Backend provider with scripted availability.
#[derive(Clone)]
pub struct FakeBackend {
    pub privileged_ok: Rc<Cell<bool>>,
    pub unprivileged_ok: Rc<Cell<bool>>,
    pub allocations: Rc<RefCell<Vec<bool>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            privileged_ok: Rc::new(Cell::new(true)),
            unprivileged_ok: Rc::new(Cell::new(true)),
            allocations: Rc::default(),
        }
    }
}

impl BackendProvider for FakeBackend {
    fn allocate(&mut self, privileged: bool) -> Result<BackendHandle, AllocError> {
        self.allocations.borrow_mut().push(privileged);
        let kind = BackendKind::from_privileged(privileged);
        let ok = if privileged {
            self.privileged_ok.get()
        } else {
            self.unprivileged_ok.get()
        };
        if ok {
            Ok(BackendHandle::new(kind, "fake"))
        } else {
            Err(AllocError::PermissionDenied {
                kind,
                reason: "fake".to_string(),
            })
        }
    }

    fn change_to_unprivileged(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Fallback prompt with a fixed answer.
#[derive(Clone)]
pub struct FixedPrompt {
    pub answer: FallbackChoice,
    pub asked: Rc<Cell<usize>>,
}

impl FallbackPrompt for FixedPrompt {
    fn ask_fallback(&mut self, _error: &AllocError) -> FallbackChoice {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}

/// All fakes wired together.
pub struct Harness {
    pub fs: FakeFileSystem,
    pub view: FakeView,
    pub search: FakeSearch,
    pub settings: SharedSettings,
    pub backend: FakeBackend,
    pub prompt: FixedPrompt,
    pub time: Rc<TestTimeSource>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let fs = FakeFileSystem::default();
        fs.add_dir("/");
        Self {
            fs,
            view: FakeView::new(1),
            search: FakeSearch::default(),
            settings: SharedSettings::new(settings),
            backend: FakeBackend::default(),
            prompt: FixedPrompt {
                answer: FallbackChoice::FallBackToUnprivileged,
                asked: Rc::default(),
            },
            time: TestTimeSource::shared(),
        }
    }

    pub fn dirs(self, paths: &[&str]) -> Self {
        for path in paths {
            self.fs.add_dir(*path);
        }
        self
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(
            Collaborators {
                filesystem: Box::new(self.fs.clone()),
                view: Box::new(self.view.clone()),
                search: Box::new(self.search.clone()),
                settings: Box::new(self.settings.clone()),
                backend_provider: Box::new(self.backend.clone()),
                fallback_prompt: Box::new(self.prompt.clone()),
            },
            self.time.clone(),
        )
    }

    /// A navigator with a console installed and `view#0` at `/`.
    pub fn ready_navigator(&self) -> Navigator {
        let mut navigator = self.navigator();
        navigator.ensure_backend().unwrap();
        navigator.init_navigation(ViewId(0), false).unwrap();
        navigator
    }

    pub fn session(&self) -> Session {
        Session::new(self.navigator())
    }
}

/// Visit every path in order from the current location.
pub fn visit(navigator: &mut Navigator, paths: &[&str]) {
    for path in paths {
        navigator.open_directory(ViewId(0), Path::new(path)).unwrap();
    }
}
