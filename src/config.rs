//! Configuration module for the parent-resolution engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - Host-driven refresh on a configuration-changed event
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `OVERLENS_` and use double
//! underscores to separate nested levels:
//! - `OVERLENS_ANNOTATIONS__DEBOUNCE_MS=250` sets `annotations.debounce_ms`
//! - `OVERLENS_ANNOTATIONS__OPEN_SIDE_BY_SIDE=true` sets `annotations.open_side_by_side`
//! - `OVERLENS_DEBUG=true` sets `debug`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbose flag, mirrored from `Settings.debug` so `debug_print!`
/// works without threading settings everywhere.
static GLOBAL_DEBUG: AtomicBool = AtomicBool::new(false);

pub fn set_global_debug(enabled: bool) {
    GLOBAL_DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn is_global_debug_enabled() -> bool {
    GLOBAL_DEBUG.load(Ordering::Relaxed)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .overlens is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Verbose logging
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Annotation behavior
    #[serde(default)]
    pub annotations: AnnotationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnnotationConfig {
    /// Open the navigation target in a split view
    #[serde(default = "default_false")]
    pub open_side_by_side: bool,

    /// Quiet window after a document change before an analysis pass runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            open_side_by_side: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            annotations: AnnotationConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_false() -> bool {
    false
}

fn default_debounce_ms() -> u64 {
    500
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .overlens directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".overlens/settings.toml"));

        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with OVERLENS_ prefix
            // Use double underscore (__) to separate nested levels
            .merge(Env::prefixed("OVERLENS_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                set_global_debug(settings.debug);
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("OVERLENS_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
            .map(|settings: Settings| {
                set_global_debug(settings.debug);
                settings
            })
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = if let Some(path) = Self::find_workspace_config() {
            path
        } else {
            PathBuf::from(".overlens/settings.toml")
        };

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!("Configuration file is corrupted: {e}"));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Find the workspace config by looking for a .overlens directory,
    /// searching from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".overlens");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Get the workspace root directory (where .overlens is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".overlens");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }
}
