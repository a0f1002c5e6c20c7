//! Settings persistence.
//!
//! [`SettingsStore`] is the configuration collaborator the navigator and the
//! bootstrap talk to. The file-backed store keeps the whole [`Settings`]
//! document in memory and rewrites the JSON file either immediately or on
//! [`SettingsStore::flush`].

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, SettingKey, SettingValue, Settings};

/// Read/write access to persisted settings.
pub trait SettingsStore {
    /// Current value of `key`, or its default when it was never set.
    fn get(&self, key: SettingKey) -> SettingValue;

    /// Change `key`. With `persist_immediately` the change reaches storage
    /// before this returns.
    fn set(
        &mut self,
        key: SettingKey,
        value: SettingValue,
        persist_immediately: bool,
    ) -> Result<(), ConfigError>;

    fn get_bool(&self, key: SettingKey) -> bool {
        self.get(key)
            .as_bool()
            .or_else(|| key.default_value().as_bool())
            .unwrap_or(false)
    }

    fn get_text(&self, key: SettingKey) -> String {
        match self.get(key) {
            SettingValue::Text(text) => text,
            other => other.to_string(),
        }
    }

    /// Write changes that were not persisted immediately.
    fn flush(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Settings backed by a JSON file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    settings: Settings,
    dirty: bool,
}

impl FileSettingsStore {
    /// Open the settings file at `path`.
    ///
    /// A missing file yields defaults; it is created on the first persisted
    /// write. A present but unreadable or invalid file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = if path.exists() {
            Settings::load_from_file(&path)?
        } else {
            tracing::debug!("settings file {:?} not found, using defaults", path);
            Settings::default()
        };
        Ok(Self {
            path,
            settings,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.settings.get(key)
    }

    fn set(
        &mut self,
        key: SettingKey,
        value: SettingValue,
        persist_immediately: bool,
    ) -> Result<(), ConfigError> {
        self.settings.apply(key, value)?;
        self.dirty = true;
        if persist_immediately {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.settings.save_to_file(&self.path)?;
        self.dirty = false;
        tracing::debug!("settings written to {:?}", self.path);
        Ok(())
    }
}

/// One write made through [`MemorySettingsStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingWrite {
    pub key: SettingKey,
    pub value: SettingValue,
    pub persist_immediately: bool,
}

/// Settings that live only for the session.
///
/// Every write is remembered so callers can see what would have been
/// persisted.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
    writes: Vec<SettingWrite>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            writes: Vec::new(),
        }
    }

    pub fn writes(&self) -> &[SettingWrite] {
        &self.writes
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.settings.get(key)
    }

    fn set(
        &mut self,
        key: SettingKey,
        value: SettingValue,
        persist_immediately: bool,
    ) -> Result<(), ConfigError> {
        self.settings.apply(key, value.clone())?;
        self.writes.push(SettingWrite {
            key,
            value,
            persist_immediately,
        });
        Ok(())
    }
}

/// Directories used by burrow
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Config directory for user configuration
    /// e.g., ~/.config/burrow on Linux
    pub config_dir: PathBuf,

    /// User's home directory
    pub home_dir: Option<PathBuf>,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    /// This should ONLY be called from main()
    #[cfg(feature = "runtime")]
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("burrow");

        Ok(Self {
            config_dir,
            home_dir: dirs::home_dir(),
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            home_dir: Some(temp_dir.join("home")),
        }
    }

    /// Path of the settings file
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}
