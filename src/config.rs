//! Configuration file support for the viewer.
//!
//! This module provides serialization and deserialization of viewer settings
//! (preferences, keybindings and gesture thresholds) as JSON.

use serde::{Deserialize, Serialize};
use vitrine_gesture::GestureConfig;

use crate::constants::{
    DEFAULT_HOVER_ZOOM_SCALE, DEFAULT_THUMBNAIL_HIDE_MS, MOBILE_BREAKPOINT, THUMBNAIL_HIDE_MAX_MS,
    THUMBNAIL_HIDE_MIN_MS,
};
use crate::keybindings::KeyBindings;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which shell to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Pick by viewport width
    #[default]
    Auto,
    Desktop,
    Mobile,
}

/// Concrete device class after resolving a [`DevicePreference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DevicePreference {
    /// Resolve against the current viewport width.
    pub fn resolve(&self, viewport_width: f32) -> DeviceClass {
        match self {
            DevicePreference::Desktop => DeviceClass::Desktop,
            DevicePreference::Mobile => DeviceClass::Mobile,
            DevicePreference::Auto if viewport_width < MOBILE_BREAKPOINT => DeviceClass::Mobile,
            DevicePreference::Auto => DeviceClass::Desktop,
        }
    }
}

/// Layout of the desktop thumbnail strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailOrientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Gesture classification thresholds
    #[serde(default)]
    pub gesture: GestureConfig,
}

fn default_app_name() -> String {
    "Vitrine".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Desktop, mobile, or pick by viewport width
    #[serde(default)]
    pub device: DevicePreference,

    /// Desktop thumbnail strip layout
    #[serde(default)]
    pub thumbnail_orientation: ThumbnailOrientation,

    /// Show the hover-zoom lens on desktop while unzoomed
    #[serde(default = "default_true")]
    pub hover_zoom: bool,

    /// Magnification of the hover-zoom lens
    #[serde(default = "default_hover_zoom_scale")]
    pub hover_zoom_scale: f32,

    /// Mobile thumbnail auto-hide delay in milliseconds
    #[serde(default = "default_thumbnail_hide_delay_ms")]
    pub thumbnail_hide_delay_ms: u64,

    /// Preload the neighbours of the displayed image
    #[serde(default = "default_true")]
    pub preload: bool,
}

fn default_true() -> bool {
    true
}

fn default_hover_zoom_scale() -> f32 {
    DEFAULT_HOVER_ZOOM_SCALE
}

fn default_thumbnail_hide_delay_ms() -> u64 {
    DEFAULT_THUMBNAIL_HIDE_MS
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            device: DevicePreference::default(),
            thumbnail_orientation: ThumbnailOrientation::default(),
            hover_zoom: default_true(),
            hover_zoom_scale: default_hover_zoom_scale(),
            thumbnail_hide_delay_ms: default_thumbnail_hide_delay_ms(),
            preload: default_true(),
        }
    }
}

impl UserPreferences {
    /// Auto-hide delay clamped to the supported range.
    pub fn thumbnail_hide_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(
            self.thumbnail_hide_delay_ms
                .clamp(THUMBNAIL_HIDE_MIN_MS, THUMBNAIL_HIDE_MAX_MS),
        )
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
            gesture: GestureConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "vitrine-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("vitrine").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("vitrine")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        self.save_to(&path)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
