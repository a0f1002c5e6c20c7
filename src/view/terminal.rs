//! Line-oriented view host.
//!
//! Used by the `burrow` binary. Every view is just a remembered directory and
//! every change is reported as one line on the output.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Notice, ViewError, ViewHost, ViewId};
use crate::config::LongClickAction;

pub struct TerminalView<W: Write> {
    out: W,
    directories: Vec<Option<PathBuf>>,
    current: ViewId,
    overlay_open: bool,
    up_affordance: bool,
    disk_usage_warning_level: u8,
    long_click_action: LongClickAction,
    console_selection_available: bool,
}

impl<W: Write> TerminalView<W> {
    /// Create a host with `view_count` views (at least one).
    pub fn new(out: W, view_count: usize) -> Self {
        Self {
            out,
            directories: vec![None; view_count.max(1)],
            current: ViewId(0),
            overlay_open: false,
            up_affordance: false,
            disk_usage_warning_level: 0,
            long_click_action: LongClickAction::default(),
            console_selection_available: false,
        }
    }

    /// Give focus to `view`.
    pub fn focus(&mut self, view: ViewId) -> Result<(), ViewError> {
        self.check(view)?;
        self.current = view;
        Ok(())
    }

    pub fn has_up_affordance(&self) -> bool {
        self.up_affordance
    }

    pub fn disk_usage_warning_level(&self) -> u8 {
        self.disk_usage_warning_level
    }

    pub fn long_click_action(&self) -> LongClickAction {
        self.long_click_action
    }

    pub fn console_selection_available(&self) -> bool {
        self.console_selection_available
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn check(&self, view: ViewId) -> Result<(), ViewError> {
        if view.0 < self.directories.len() {
            Ok(())
        } else {
            Err(ViewError::UnknownView(view))
        }
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!("failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> ViewHost for TerminalView<W> {
    fn view_count(&self) -> usize {
        self.directories.len()
    }

    fn current_view(&self) -> ViewId {
        self.current
    }

    fn current_directory(&self, view: ViewId) -> Option<PathBuf> {
        self.directories.get(view.0).cloned().flatten()
    }

    fn change_directory(&mut self, view: ViewId, path: &Path) -> Result<(), ViewError> {
        self.check(view)?;
        self.directories[view.0] = Some(path.to_path_buf());
        self.emit(format_args!("{view}: {}", path.display()));
        Ok(())
    }

    fn refresh(&mut self) {
        let view = self.current;
        match self.current_directory(view) {
            Some(path) => self.emit(format_args!("{view}: {} (refreshed)", path.display())),
            None => self.emit(format_args!("{view}: nothing to refresh")),
        }
    }

    fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    fn open_overlay(&mut self) {
        self.overlay_open = true;
        self.emit(format_args!("[configuration open, back closes it]"));
    }

    fn close_overlay(&mut self) {
        self.overlay_open = false;
        self.emit(format_args!("[configuration closed]"));
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(format_args!("! {notice}"));
    }

    fn set_up_affordance(&mut self, enabled: bool) {
        self.up_affordance = enabled;
    }

    fn set_disk_usage_warning_level(&mut self, level: u8) {
        self.disk_usage_warning_level = level;
    }

    fn set_long_click_action(&mut self, action: LongClickAction) {
        self.long_click_action = action;
    }

    fn set_console_selection_available(&mut self, available: bool) {
        self.console_selection_available = available;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn change_directory_is_reported_per_view() {
        let mut view = TerminalView::new(Vec::new(), 2);
        view.change_directory(ViewId(1), Path::new("/tmp")).unwrap();

        assert_eq!(view.current_directory(ViewId(0)), None);
        assert_eq!(view.current_directory(ViewId(1)), Some(PathBuf::from("/tmp")));
        assert_eq!(output(view), "view#1: /tmp\n");
    }

    #[test]
    fn unknown_view_is_rejected() {
        let mut view = TerminalView::new(Vec::new(), 1);
        assert!(matches!(
            view.change_directory(ViewId(3), Path::new("/")),
            Err(ViewError::UnknownView(ViewId(3)))
        ));
        assert!(view.focus(ViewId(1)).is_err());
    }

    #[test]
    fn notices_are_prefixed() {
        let mut view = TerminalView::new(Vec::new(), 1);
        view.notify(Notice::PushAgainToExit);
        assert_eq!(output(view), "! Press back again to exit\n");
    }

    #[test]
    fn overlay_opens_and_closes() {
        let mut view = TerminalView::new(Vec::new(), 1);
        view.open_overlay();
        assert!(view.is_overlay_open());
        view.close_overlay();
        assert!(!view.is_overlay_open());
    }
}
