//! Configuration discovery and loading.
//!
//! The projects file lives at `$XDG_CONFIG_HOME/<app>/projects.yaml`, falling
//! back to `$HOME/.config/<app>/projects.yaml`. `<app>` is `muxify` unless
//! `MUXIFY_APPNAME` says otherwise. All environment access goes through the
//! `Environment` trait so tests never touch the process environment.

pub mod configuration;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

pub use configuration::{decode, read_configuration, read_file, Configuration};

pub const DEFAULT_APP_NAME: &str = "muxify";
pub const PROJECTS_FILE: &str = "projects.yaml";

/// Read-only view of environment variables.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// A variable that is set counts, even when empty.
pub fn config_dir(env: &dyn Environment) -> Result<PathBuf> {
    let base = match env.var("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => match env.var("HOME") {
            Some(home) => PathBuf::from(home).join(".config"),
            None => return Err(ConfigError::HomeDirNotConfigured.into()),
        },
    };
    let app = env
        .var("MUXIFY_APPNAME")
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
    Ok(base.join(app))
}

pub fn projects_file(env: &dyn Environment) -> Result<PathBuf> {
    Ok(config_dir(env)?.join(PROJECTS_FILE))
}
