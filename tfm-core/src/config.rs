//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Manages all user-editable settings for the file manager. Loads and saves
//! settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Features
//! - XDG-compliant config discovery and writing (Linux, macOS, Windows)
//! - Defaults written out on first start
//! - Durations in human form (`"100ms"`, `"10s"`) via `humantime-serde`
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

/// Timing knobs of the event loop and pointer handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long one input poll waits before reporting an idle tick
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Period of the idle directory / drive / disk-usage refresh
    #[serde(with = "humantime_serde")]
    pub background_refresh: Duration,

    /// Minimum time between two non-forced drive enumerations
    #[serde(with = "humantime_serde")]
    pub drive_refresh_interval: Duration,

    /// Maximum gap between two clicks on one row to count as a double click
    #[serde(with = "humantime_serde")]
    pub double_click_window: Duration,

    /// How long a status message stays visible
    #[serde(with = "humantime_serde")]
    pub message_duration: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            background_refresh: Duration::from_secs(10),
            drive_refresh_interval: Duration::from_secs(5),
            double_click_window: Duration::from_millis(400),
            message_duration: Duration::from_secs(5),
        }
    }
}

/// External programs used for drive enumeration and (un)mounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Block device lister, must understand `-Jb -o NAME,TYPE,...`
    pub lsblk: String,

    /// Mount helper, invoked as `<helper> mount|unmount --block-device <dev>`
    pub helper: String,

    /// Privilege-escalation wrapper, reads the credential from stdin
    pub escalation: Vec<String>,

    #[serde(with = "humantime_serde")]
    pub unprivileged_timeout: Duration,

    #[serde(with = "humantime_serde")]
    pub escalated_timeout: Duration,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            lsblk: "lsblk".to_string(),
            helper: "udisksctl".to_string(),
            escalation: vec!["sudo".to_string(), "-S".to_string(), "-k".to_string()],
            unprivileged_timeout: Duration::from_secs(10),
            escalated_timeout: Duration::from_secs(15),
        }
    }
}

/// One entry of the shortcuts panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutConfig {
    pub label: String,

    /// Absolute, or relative to the home directory
    pub path: PathBuf,
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_hidden: bool,

    /// Editor for `e`; the first of nvim, vim, nano on PATH when unset
    pub editor: Option<String>,

    /// Shell command run by the update button; a message when unset
    pub update_command: Option<String>,

    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,

    /// Empty means the standard home folders
    pub shortcuts: Vec<ShortcutConfig>,

    pub timing: TimingConfig,

    pub mount: MountConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: false,
            editor: None,
            update_command: None,
            log_level: "info".to_string(),
            shortcuts: Vec::new(),
            timing: TimingConfig::default(),
            mount: MountConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the app config dir, or writes and returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/tfm/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    /// Loads config from an explicit file; a missing file is created with defaults.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    /// Saves config to the app config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        let io_err = |source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await.map_err(io_err)?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.data_local_dir().join("logs"))
    }

    /// The user's home directory, or `/` when the platform reports none.
    #[must_use]
    pub fn home_dir() -> PathBuf {
        UserDirs::new().map_or_else(|| PathBuf::from("/"), |u| u.home_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from("org", "tfm", "tfm")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_dir_is_absolute() {
        assert!(Config::home_dir().is_absolute());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            show_hidden = true

            [timing]
            double_click_window = "250ms"

            [mount]
            helper = "my-udisks"
            "#,
        )
        .expect("valid toml");

        assert!(cfg.show_hidden);
        assert_eq!(cfg.timing.double_click_window, Duration::from_millis(250));
        assert_eq!(cfg.timing.drive_refresh_interval, Duration::from_secs(5));
        assert_eq!(cfg.mount.helper, "my-udisks");
        assert_eq!(cfg.mount.lsblk, "lsblk");
        assert_eq!(cfg.mount.escalated_timeout, Duration::from_secs(15));
        assert!(cfg.shortcuts.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).await.expect("load");
        assert!(path.exists());
        assert_eq!(cfg.timing.poll_interval, Duration::from_millis(100));

        let again = Config::load_from(&path).await.expect("reload");
        assert_eq!(again.mount.escalation, vec!["sudo", "-S", "-k"]);
        assert_eq!(again.timing.background_refresh, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "show_hidden = \"yes please\"").expect("write");

        assert!(matches!(
            Config::load_from(&path).await,
            Err(AppError::Config(_))
        ));
    }
}
