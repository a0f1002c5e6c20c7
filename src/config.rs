use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Persisted browser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    /// Open the shell backend with superuser privileges
    #[serde(default = "default_false")]
    pub superuser_mode: bool,

    /// Let the user pick the console type; also gates the fallback
    /// negotiation when the preferred console cannot be created
    #[serde(default = "default_true")]
    pub allow_console_selection: bool,

    /// Directory shown when the browser starts
    #[serde(default = "default_initial_directory")]
    pub initial_directory: String,

    /// Percentage of used disk space that triggers the breadcrumb warning
    #[serde(default = "default_disk_usage_warning_level")]
    pub disk_usage_warning_level: u8,

    #[serde(default)]
    pub default_long_click_action: LongClickAction,

    #[serde(default = "default_true")]
    pub case_sensitive_sort: bool,

    /// Query of the most recent search
    #[serde(default)]
    pub last_search: String,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_initial_directory() -> String {
    crate::ROOT_DIRECTORY.to_string()
}

fn default_disk_usage_warning_level() -> u8 {
    95
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            superuser_mode: default_false(),
            allow_console_selection: default_true(),
            initial_directory: default_initial_directory(),
            disk_usage_warning_level: default_disk_usage_warning_level(),
            default_long_click_action: LongClickAction::default(),
            case_sensitive_sort: default_true(),
            last_search: String::new(),
        }
    }
}

/// What a long press on a listing item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LongClickAction {
    None,
    #[default]
    SelectDeselect,
    ShowContentDescription,
    OpenWith,
    ShowActions,
}

impl LongClickAction {
    pub fn id(self) -> &'static str {
        match self {
            LongClickAction::None => "none",
            LongClickAction::SelectDeselect => "select_deselect",
            LongClickAction::ShowContentDescription => "show_content_description",
            LongClickAction::OpenWith => "open_with",
            LongClickAction::ShowActions => "show_actions",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        [
            LongClickAction::None,
            LongClickAction::SelectDeselect,
            LongClickAction::ShowContentDescription,
            LongClickAction::OpenWith,
            LongClickAction::ShowActions,
        ]
        .into_iter()
        .find(|action| action.id() == id)
    }
}

/// Identifier of one setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    SuperuserMode,
    AllowConsoleSelection,
    InitialDirectory,
    DiskUsageWarningLevel,
    DefaultLongClickAction,
    CaseSensitiveSort,
    LastSearch,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::SuperuserMode,
        SettingKey::AllowConsoleSelection,
        SettingKey::InitialDirectory,
        SettingKey::DiskUsageWarningLevel,
        SettingKey::DefaultLongClickAction,
        SettingKey::CaseSensitiveSort,
        SettingKey::LastSearch,
    ];

    /// The JSON field name of this setting
    pub fn id(self) -> &'static str {
        match self {
            SettingKey::SuperuserMode => "superuser_mode",
            SettingKey::AllowConsoleSelection => "allow_console_selection",
            SettingKey::InitialDirectory => "initial_directory",
            SettingKey::DiskUsageWarningLevel => "disk_usage_warning_level",
            SettingKey::DefaultLongClickAction => "default_long_click_action",
            SettingKey::CaseSensitiveSort => "case_sensitive_sort",
            SettingKey::LastSearch => "last_search",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.id() == id)
    }

    pub fn default_value(self) -> SettingValue {
        Settings::default().get(self)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(value) => Some(*value),
            // Older settings files stored numbers as strings
            SettingValue::Text(text) => text.trim().parse().ok(),
            SettingValue::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(value) => write!(f, "{value}"),
            SettingValue::Int(value) => write!(f, "{value}"),
            SettingValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl Settings {
    /// Read one setting
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::SuperuserMode => self.superuser_mode.into(),
            SettingKey::AllowConsoleSelection => self.allow_console_selection.into(),
            SettingKey::InitialDirectory => self.initial_directory.clone().into(),
            SettingKey::DiskUsageWarningLevel => {
                SettingValue::Int(i64::from(self.disk_usage_warning_level))
            }
            SettingKey::DefaultLongClickAction => self.default_long_click_action.id().into(),
            SettingKey::CaseSensitiveSort => self.case_sensitive_sort.into(),
            SettingKey::LastSearch => self.last_search.clone().into(),
        }
    }

    /// Write one setting, rejecting values of the wrong type or range
    pub fn apply(&mut self, key: SettingKey, value: SettingValue) -> Result<(), ConfigError> {
        let mismatch = || ConfigError::TypeMismatch {
            key,
            value: value.to_string(),
        };
        match key {
            SettingKey::SuperuserMode => self.superuser_mode = value.as_bool().ok_or_else(mismatch)?,
            SettingKey::AllowConsoleSelection => {
                self.allow_console_selection = value.as_bool().ok_or_else(mismatch)?
            }
            SettingKey::InitialDirectory => {
                self.initial_directory = value.as_text().ok_or_else(mismatch)?.to_string()
            }
            SettingKey::DiskUsageWarningLevel => {
                let level = value.as_int().ok_or_else(mismatch)?;
                self.disk_usage_warning_level = u8::try_from(level)
                    .ok()
                    .filter(|level| *level <= 100)
                    .ok_or_else(|| {
                        ConfigError::Validation(format!(
                            "disk_usage_warning_level must be within 0..=100, got {level}"
                        ))
                    })?;
            }
            SettingKey::DefaultLongClickAction => {
                let id = value.as_text().ok_or_else(mismatch)?;
                self.default_long_click_action =
                    LongClickAction::from_id(id).ok_or_else(mismatch)?;
            }
            SettingKey::CaseSensitiveSort => {
                self.case_sensitive_sort = value.as_bool().ok_or_else(mismatch)?
            }
            SettingKey::LastSearch => {
                self.last_search = value.as_text().ok_or_else(mismatch)?.to_string()
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disk_usage_warning_level > 100 {
            return Err(ConfigError::Validation(
                "disk_usage_warning_level must be <= 100".to_string(),
            ));
        }

        if self.initial_directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "initial_directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// JSON schema of the settings file, for editors and `--print-schema`
pub fn settings_schema() -> schemars::Schema {
    schemars::schema_for!(Settings)
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("setting {key} cannot hold {value}")]
    TypeMismatch { key: SettingKey, value: String },
}
