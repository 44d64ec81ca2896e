//! Verbosity setting shared by the CLI's subscriber and the tmux client.

use tracing::Level;

/// How chatty muxify is. Built once from the command line and passed to
/// whoever needs it, instead of living in process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }

    /// Maximum level the subscriber should emit.
    pub fn level(self) -> Level {
        match self {
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}
