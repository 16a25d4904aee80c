//! Shared configuration for Fleetline frontends.
//!
//! TOML settings with environment overrides, file-backed session
//! persistence, and a one-call [`bootstrap`] that wires a ready-to-use
//! [`fleetline_core::Hub`].

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use fleetline_api::{RestClient, TransportConfig};
use fleetline_core::model::Session;
use fleetline_core::{Hub, SessionStore, StoreError};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Top-level TOML settings shared by every Fleetline frontend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Backend base URL, including the API prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override for the session file location. Defaults to the platform
    /// data directory.
    pub session_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            session_file: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:5000/api".into()
}
fn default_timeout() -> u64 {
    10
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("io", "fleetline", "fleetline").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("fleetline.toml");
            p
        },
        |dirs| dirs.config_dir().join("fleetline.toml"),
    )
}

/// Default location for the persisted session.
pub fn session_path() -> PathBuf {
    ProjectDirs::from("io", "fleetline", "fleetline").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("session.toml");
            p
        },
        |dirs| dirs.data_dir().join("session.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fleetline");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load settings from the canonical path plus `FLEETLINE_`-prefixed
/// environment variables.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&settings_path())
}

/// Load settings from an explicit file, still honoring env overrides.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLEETLINE_"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Load settings, falling back to defaults when nothing is configured.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_default()
}

/// Serialize settings to TOML at the canonical path.
pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    let path = settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Session persistence ─────────────────────────────────────────────

/// File-backed [`SessionStore`]: one TOML file holding the bearer token
/// and profile of the signed-in user. A missing file reads as "no
/// session"; a corrupt one does too, after a log line, so a bad write
/// never wedges startup.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Self {
        Self::new(session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::OperationFailed {
                    message: format!("failed to read session file: {e}"),
                });
            }
        };

        match toml::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "discarding unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::OperationFailed {
                message: format!("failed to create session directory: {e}"),
            })?;
        }
        let toml_str = toml::to_string_pretty(session).map_err(|e| StoreError::OperationFailed {
            message: format!("failed to serialize session: {e}"),
        })?;
        std::fs::write(&self.path, toml_str).map_err(|e| StoreError::OperationFailed {
            message: format!("failed to write session file: {e}"),
        })?;

        // The file holds a bearer token; keep it owner-readable only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::OperationFailed {
                message: format!("failed to remove session file: {e}"),
            }),
        }
    }
}

// ── Bootstrap ───────────────────────────────────────────────────────

/// Wire a [`Hub`] from settings: REST client, file-backed session store,
/// every slice pointed at the configured backend.
pub fn bootstrap(settings: &Settings) -> Result<Hub, ConfigError> {
    let transport = TransportConfig {
        timeout: std::time::Duration::from_secs(settings.timeout_secs),
    };
    let client = RestClient::new(&settings.api_url, &transport).map_err(|e| {
        ConfigError::Validation {
            field: "api_url".into(),
            reason: e.to_string(),
        }
    })?;

    let sessions = settings
        .session_file
        .clone()
        .map_or_else(FileSessionStore::at_default_location, FileSessionStore::new);

    debug!(api_url = %settings.api_url, "hub wired");
    Ok(Hub::new(client, std::sync::Arc::new(sessions)))
}
