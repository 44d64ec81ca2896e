//! Error types shared by every muxify component.
//!
//! Errors are never retried: each one is returned to the immediate caller and
//! aborts the remaining steps of the current operation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MuxifyError>;

#[derive(Debug, Error)]
pub enum MuxifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tmux listing line did not match the expected record pattern. This
    /// points at a tmux version or environment mismatch.
    #[error("bad result from tmux: {line:?}")]
    MultiplexerProtocol { line: String },

    /// tmux could not be spawned or exited with a failure status.
    #[error("tmux {command} failed: {message}")]
    MultiplexerExecution { command: String, message: String },

    /// The project cannot be applied: a broken model invariant or a name tmux
    /// cannot round-trip.
    #[error("invalid project: {0}")]
    Validation(String),
}

impl MuxifyError {
    pub fn protocol(line: impl Into<String>) -> Self {
        MuxifyError::MultiplexerProtocol { line: line.into() }
    }

    pub fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        MuxifyError::MultiplexerExecution {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home dir not configured: neither XDG_CONFIG_HOME nor HOME is set")]
    HomeDirNotConfigured,

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid projects configuration: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("{}", ProjectList(.available))]
    ProjectNotFound {
        name: String,
        available: Vec<String>,
    },
}

struct ProjectList<'a>(&'a [String]);

impl fmt::Display for ProjectList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The project was not found. Valid project names are:")?;
        for name in self.0 {
            writeln!(f, " - {}", name)?;
        }
        Ok(())
    }
}
