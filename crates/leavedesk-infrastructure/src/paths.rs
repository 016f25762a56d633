//! Unified path management for LeaveDesk files.
//!
//! Paths follow the platform conventions reported by the `dirs` crate (XDG on
//! Linux, `Library/Application Support` on macOS, `AppData` on Windows).

use std::path::PathBuf;

const APP_DIR: &str = "leavedesk";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path helpers for LeaveDesk.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/leavedesk/         # Config directory
/// ├── config.toml              # Application configuration
/// └── holidays.json            # Optional company holiday calendar
///
/// ~/.local/share/leavedesk/    # Data directory
/// └── records.json             # Optional record store seed
/// ```
pub struct LeaveDeskPaths;

impl LeaveDeskPaths {
    /// Returns the LeaveDesk configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/leavedesk/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the LeaveDesk data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Holiday calendar used when the config names none.
    pub fn holidays_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("holidays.json"))
    }

    /// Record store seed used when the config names none.
    pub fn seed_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("records.json"))
    }
}
