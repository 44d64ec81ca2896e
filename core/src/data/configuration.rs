//! Decoding of `projects.yaml`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::project::Project;

use super::{projects_file, Environment};

/// Every project defined in the projects file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Configuration {
    /// First project named `name`.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn project_names(&self) -> Vec<String> {
        self.projects.iter().map(|p| p.name.clone()).collect()
    }

    /// Like `project`, but a miss is an error listing every valid name.
    pub fn require_project(&self, name: &str) -> Result<&Project> {
        self.project(name).ok_or_else(|| {
            ConfigError::ProjectNotFound {
                name: name.to_string(),
                available: self.project_names(),
            }
            .into()
        })
    }
}

/// Parse the projects file, attach window ids and expand `$VAR` references
/// in working directories.
pub fn decode(text: &str, env: &dyn Environment) -> Result<Configuration> {
    if text.trim().is_empty() {
        return Ok(Configuration::default());
    }
    let mut config: Configuration =
        serde_yaml::from_str(text).map_err(ConfigError::Malformed)?;
    for project in &mut config.projects {
        expand_dir(&mut project.working_dir, env);
        for window in &mut project.windows {
            window.ensure_id();
        }
        for task in project.tasks.values_mut() {
            expand_dir(&mut task.working_dir, env);
        }
    }
    Ok(config)
}

/// Load the projects file from its discovered location.
pub fn read_configuration(env: &dyn Environment) -> Result<Configuration> {
    let path = projects_file(env)?;
    read_file(&path, env)
}

pub fn read_file(path: &Path, env: &dyn Environment) -> Result<Configuration> {
    debug!(path = %path.display(), "reading projects file");
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&text, env)
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("valid variable pattern")
    })
}

/// Replace `$NAME` and `${NAME}` with the variable's value; unset variables
/// expand to nothing.
pub fn expand_vars(input: &str, env: &dyn Environment) -> String {
    variable_pattern()
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            env.var(name).unwrap_or_default()
        })
        .into_owned()
}

fn expand_dir(dir: &mut Option<PathBuf>, env: &dyn Environment) {
    let expanded = match dir.as_deref().map(Path::to_string_lossy) {
        Some(raw) if raw.contains('$') => expand_vars(&raw, env),
        _ => return,
    };
    *dir = Some(PathBuf::from(expanded));
}
