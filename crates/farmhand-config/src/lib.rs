//! Shared configuration for the farmhand panel.
//!
//! TOML profiles merged with `FARMHAND_`-prefixed environment variables,
//! and translation to `farmhand_core::PanelConfig`. The backend needs no
//! credentials, so a profile is little more than a server URL plus
//! pacing knobs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use farmhand_core::PanelConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in config")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration for the panel.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Delay between a mutation and its follow-up re-sync, in ms.
    #[serde(default = "default_sync_delay_ms")]
    pub sync_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            sync_delay_ms: default_sync_delay_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_sync_delay_ms() -> u64 {
    500
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://localhost:8080").
    pub server: String,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override sync delay (milliseconds).
    pub sync_delay_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "farmhand", "farmhand").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("farmhand");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit path (tests use this directly).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FARMHAND_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to PanelConfig ──────────────────────────────────────

/// Build a `PanelConfig` from a named profile, falling back to the
/// config-wide defaults for unset pacing knobs.
pub fn profile_to_panel_config(
    config: &Config,
    profile_name: &str,
) -> Result<PanelConfig, ConfigError> {
    let profile =
        config
            .profiles
            .get(profile_name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: profile_name.into(),
            })?;

    let server: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(config.defaults.timeout));
    let sync_delay =
        Duration::from_millis(profile.sync_delay_ms.unwrap_or(config.defaults.sync_delay_ms));

    Ok(PanelConfig {
        server,
        timeout,
        sync_delay,
    })
}

/// Resolve the default profile into a `PanelConfig`, if one is set.
pub fn default_panel_config(config: &Config) -> Option<PanelConfig> {
    let name = config.default_profile.as_deref()?;
    profile_to_panel_config(config, name).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from(std::path::Path::new("/nonexistent/farmhand.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults.timeout, 30);
        assert_eq!(config.defaults.sync_delay_ms, 500);
    }

    #[test]
    fn profile_overrides_defaults() {
        let file = write_config(
            r#"
            default_profile = "barn"

            [defaults]
            timeout = 10

            [profiles.barn]
            server = "http://barn.local:8080"
            sync_delay_ms = 250
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        let panel = profile_to_panel_config(&config, "barn").unwrap();

        assert_eq!(panel.server.as_str(), "http://barn.local:8080/");
        assert_eq!(panel.timeout, Duration::from_secs(10));
        assert_eq!(panel.sync_delay, Duration::from_millis(250));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        let result = profile_to_panel_config(&config, "ghost");
        assert!(matches!(result, Err(ConfigError::UnknownProfile { .. })));
    }

    #[test]
    fn invalid_server_url_is_a_validation_error() {
        let file = write_config(
            r#"
            [profiles.bad]
            server = "not a url"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        let result = profile_to_panel_config(&config, "bad");
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn default_panel_config_follows_default_profile() {
        let file = write_config(
            r#"
            default_profile = "main"

            [profiles.main]
            server = "http://localhost:8080"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        let panel = default_panel_config(&config).unwrap();
        assert_eq!(panel.sync_delay, Duration::from_millis(500));
    }
}
