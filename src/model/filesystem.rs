//! Filesystem queries used by navigation
//!
//! Navigation never reads or writes file contents. It only needs to know
//! whether a remembered directory still exists and to turn a configured
//! directory into an absolute path. [`FileSystem`] is that narrow contract;
//! [`StdFileSystem`] implements it over `std::fs`.
//!
//! The trait is synchronous. Callers on the control thread run it from a
//! deferred task rather than from input handling.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// ============================================================================
// Metadata Types
// ============================================================================

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
    Symlink,
}

/// Metadata about a file or directory
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub entry_type: EntryType,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Last modification time
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn new(entry_type: EntryType, size: u64) -> Self {
        Self {
            entry_type,
            size,
            modified: None,
        }
    }

    /// Metadata of an empty directory, handy for fakes
    pub fn directory() -> Self {
        Self::new(EntryType::Directory, 0)
    }

    /// Builder: set modified time
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    fn from_std(meta: &std::fs::Metadata) -> Self {
        let entry_type = if meta.is_dir() {
            EntryType::Directory
        } else if meta.file_type().is_symlink() {
            EntryType::Symlink
        } else {
            EntryType::File
        };
        let metadata = Self::new(entry_type, if meta.is_dir() { 0 } else { meta.len() });
        match meta.modified() {
            Ok(modified) => metadata.with_modified(modified),
            Err(_) => metadata,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot query {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FsError::NotFound(path.to_path_buf())
        } else {
            FsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

// ============================================================================
// FileSystem Trait
// ============================================================================

/// Filesystem query collaborator
pub trait FileSystem {
    /// Get file/directory metadata, following symlinks
    fn stat(&self, path: &Path) -> Result<FileMetadata, FsError>;

    /// Turn `path` into an absolute, normalized path that exists
    fn resolve_absolute(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }
}

/// Native filesystem using `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn stat(&self, path: &Path) -> Result<FileMetadata, FsError> {
        std::fs::metadata(path)
            .map(|meta| FileMetadata::from_std(&meta))
            .map_err(|e| FsError::from_io(path, e))
    }

    fn resolve_absolute(&self, path: &Path) -> Result<PathBuf, FsError> {
        std::fs::canonicalize(path).map_err(|e| FsError::from_io(path, e))
    }
}
