//! Load configuration from XDG `config.toml` and project `.env`, then apply it to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! Consumers read typed settings back with [`env_parse`] / [`env_string`], so a value can come
//! from any of the three layers.

mod env_file;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

pub use xdg_toml::config_path;

/// Serializes tests that point `XDG_CONFIG_HOME` somewhere else.
#[cfg(test)]
pub(crate) static XDG_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Sets environment variables from `.env` and `$XDG_CONFIG_HOME/<app_name>/config.toml`
/// `[env]`, only for keys that are **not** already set.
///
/// * `app_name`: e.g. `"docchat"`; used for the XDG path.
/// * `override_dir`: look for `.env` here instead of the current directory.
///
/// Returns the keys that were set.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = env_file::load_env_map(override_dir)?;

    let mut keys: HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    let mut applied = Vec::new();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
            applied.push(key.clone());
        }
    }
    applied.sort();
    tracing::debug!(count = applied.len(), "config values applied to environment");
    Ok(applied)
}

/// Parses `key` from the environment; unset, empty or unparsable values yield `default`.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Non-empty string value of `key`, or `default`.
pub fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
