// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading using Figment for layered merging.
//!
//! Supports XDG hierarchy: `./lifequest.toml` > `~/.config/lifequest/lifequest.toml`
//! > `/etc/lifequest/lifequest.toml`, with environment variable overrides via
//! the `LIFEQUEST_` prefix.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifequestConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Default user identity for commands that act on a user.
    #[serde(default)]
    pub user: UserConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Default user identity.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// User name assumed when `--user` is not given on the command line.
    #[serde(default)]
    pub name: Option<String>,
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lifequest/lifequest.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lifequest/lifequest.toml` (system-wide)
/// 3. `~/.config/lifequest/lifequest.toml` (user XDG config)
/// 4. `./lifequest.toml` (local directory)
/// 5. `LIFEQUEST_*` environment variables
pub fn load_config() -> Result<LifequestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LifequestConfig::default()))
        .merge(Toml::file("/etc/lifequest/lifequest.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lifequest/lifequest.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("lifequest.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from one explicit file with env var overrides, skipping
/// the XDG lookup.
pub fn load_config_from_path(path: &Path) -> Result<LifequestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LifequestConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment variable provider using explicit `map()` for section-to-dot
/// mapping, so `LIFEQUEST_LOG_LEVEL` maps to `log.level` rather than
/// `log.le.vel` style splits.
fn env_provider() -> Env {
    Env::prefixed("LIFEQUEST_").map(|key| {
        let mapped = key
            .as_str()
            .to_lowercase()
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1)
            .replacen("user_", "user.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LifequestConfig::default();
        assert_eq!(config.log.level, "info");
        assert!(config.storage.path.ends_with("lifequest/lifequest.db"));
        assert!(config.user.name.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: LifequestConfig = Figment::new()
            .merge(Serialized::defaults(LifequestConfig::default()))
            .merge(Toml::string(
                r#"
                [storage]
                path = "/tmp/test.db"

                [user]
                name = "ada"
                "#,
            ))
            .extract()
            .expect("valid config");
        assert_eq!(config.storage.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.user.name.as_deref(), Some("ada"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn env_vars_override_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LIFEQUEST_LOG_LEVEL", "debug");
            jail.set_env("LIFEQUEST_STORAGE_PATH", "/tmp/env.db");
            jail.set_env("LIFEQUEST_USER_NAME", "ada");
            let config: LifequestConfig = Figment::new()
                .merge(Serialized::defaults(LifequestConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.log.level, "debug");
            assert_eq!(config.storage.path, PathBuf::from("/tmp/env.db"));
            assert_eq!(config.user.name.as_deref(), Some("ada"));
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<LifequestConfig, _> = Figment::new()
            .merge(Serialized::defaults(LifequestConfig::default()))
            .merge(Toml::string("[storage]\nptah = \"typo.db\""))
            .extract();
        assert!(res.is_err());
    }
}
