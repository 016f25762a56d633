//! Configuration service implementation.
//!
//! Loads [`LeaveDeskConfig`] from `$LEAVEDESK_CONFIG` or
//! `~/.config/leavedesk/config.toml` and caches it. A missing file yields the
//! defaults.

use crate::paths::LeaveDeskPaths;
use leavedesk_core::config::LeaveDeskConfig;
use leavedesk_core::error::{LeaveDeskError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "LEAVEDESK_CONFIG";

/// Environment variable that turns on backdated leave.
pub const ALLOW_BACKDATED_ENV: &str = "ALLOW_BACKDATED_LEAVE";

/// Reads one environment variable.
pub type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Configuration service that loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<LeaveDeskConfig>>>,
    /// Explicit file, bypassing env and platform lookup
    path: Option<PathBuf>,
    env: EnvLookup,
}

impl ConfigService {
    /// Creates a service reading the process environment.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: None,
            env: process_env,
        }
    }

    /// Reads `path` instead of the default location.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self.invalidate_cache();
        self
    }

    /// Replaces the environment lookup.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self.invalidate_cache();
        self
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// An unreadable or malformed file is logged and replaced by defaults.
    pub fn get_config(&self) -> LeaveDeskConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = read_lock.as_ref() {
                return cached.clone();
            }
        }

        let loaded = self.load().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load config, using defaults");
            self.apply_env(LeaveDeskConfig::default())
        });

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Loads the configuration without touching the cache.
    ///
    /// # Returns
    ///
    /// - `Ok(config)`: File parsed, or defaults when the file does not exist
    /// - `Err(_)`: Path unresolvable, file unreadable or not valid TOML
    pub fn load(&self) -> Result<LeaveDeskConfig> {
        let path = self.config_path()?;
        let config = if path.exists() {
            debug!(path = %path.display(), "loading config");
            Self::read_file(&path)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            LeaveDeskConfig::default()
        };
        Ok(self.apply_env(config))
    }

    /// Resolved location of the config file.
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Some(path) = (self.env)(CONFIG_PATH_ENV).filter(|path| !path.trim().is_empty()) {
            return Ok(PathBuf::from(path));
        }
        LeaveDeskPaths::config_file().map_err(|e| LeaveDeskError::config(e.to_string()))
    }

    fn read_file(path: &Path) -> Result<LeaveDeskConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: LeaveDeskConfig = toml::from_str(&content)?;

        // Relative data paths are relative to the config file.
        if let Some(base) = path.parent() {
            config.holidays_file = config.holidays_file.map(|file| base.join(file));
            config.seed_file = config.seed_file.map(|file| base.join(file));
        }
        Ok(config)
    }

    fn apply_env(&self, mut config: LeaveDeskConfig) -> LeaveDeskConfig {
        if let Some(value) = (self.env)(ALLOW_BACKDATED_ENV) {
            if value.trim().eq_ignore_ascii_case("true") {
                config.allow_backdated_leave = true;
            }
        }
        config
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn backdating_env(key: &str) -> Option<String> {
        (key == ALLOW_BACKDATED_ENV).then(|| "TRUE".to_string())
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new()
            .with_path(dir.path().join("config.toml"))
            .with_env(no_env);

        assert_eq!(service.get_config(), LeaveDeskConfig::default());
    }

    #[test]
    fn reads_file_and_resolves_data_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            company_name = "Acme"
            email_domain = "acme.test"
            holidays_file = "holidays.json"
            "#,
        )
        .unwrap();

        let config = ConfigService::new().with_path(&path).with_env(no_env).get_config();
        assert_eq!(config.company_name, "Acme");
        assert_eq!(config.email_domain, "acme.test");
        assert_eq!(config.holidays_file, Some(dir.path().join("holidays.json")));
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn env_turns_on_backdating() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new()
            .with_path(dir.path().join("config.toml"))
            .with_env(backdating_env);

        assert!(service.get_config().allow_backdated_leave);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "company_name = [").unwrap();

        let service = ConfigService::new().with_path(&path).with_env(no_env);
        assert!(service.load().is_err());
        assert_eq!(service.get_config().company_name, "Winfomi");
    }

    #[test]
    fn cache_is_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::new().with_path(&path).with_env(no_env);
        assert_eq!(service.get_config().max_email_attempts, 3);

        std::fs::write(&path, "max_email_attempts = 5").unwrap();
        assert_eq!(service.get_config().max_email_attempts, 3);

        service.invalidate_cache();
        assert_eq!(service.get_config().max_email_attempts, 5);
    }
}
