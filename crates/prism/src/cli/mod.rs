//! Subcommand implementations.

pub mod config;
pub mod generate;
pub mod refine;
pub mod serve;

use anyhow::Context;
use prism_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Resolve the config file location, preferring an explicit `--config` path.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned()),
        None => Config::default_path(),
    }
}

/// Load configuration from `--config` if given, else the default location.
///
/// An explicit path that doesn't exist is an error; a missing default file
/// yields the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(_) => Config::load_from(&config_path(explicit)),
        None => Config::load(),
    }
}

/// Configuration for a command run.
///
/// A broken `--config` file is fatal. A broken file at the default location
/// only warns (on stderr, logging isn't up yet) and falls back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match load_config(explicit) {
        Ok(config) => Ok(config),
        Err(e) if explicit.is_some() => Err(e).with_context(|| {
            format!("Failed to load config {}", config_path(explicit).display())
        }),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prism config path`."
            );
            Ok(Config::default())
        }
    }
}
