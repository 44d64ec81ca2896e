//! muxify core: project model, configuration, tmux client and the engine
//! that converges a tmux session onto a project.

pub mod convergence;
pub mod data;
pub mod error;
pub mod harness;
pub mod infrastructure;
pub mod logging;
pub mod types;

pub use convergence::ensure_started;
pub use data::{Configuration, Environment, SystemEnvironment};
pub use error::{ConfigError, MuxifyError, Result};
pub use infrastructure::tmux::{TmuxClient, TmuxServer};
pub use infrastructure::Multiplexer;
pub use logging::Verbosity;
pub use types::project::{Layout, Project, Task, Window};
