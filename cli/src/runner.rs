//! The step that actually starts a project, kept behind a trait so the
//! command-line flow can be tested without a tmux server.

use muxify_core::convergence::ensure_started;
use muxify_core::infrastructure::tmux::{TmuxClient, TmuxServer};
use muxify_core::types::project::Project;
use muxify_core::Result;
use tracing::info;

pub trait Runner {
    fn run(&self, project: &Project) -> Result<()>;
}

/// Converges the project onto a tmux server.
pub struct TmuxRunner {
    server: TmuxServer,
}

impl TmuxRunner {
    pub fn new(server: TmuxServer) -> Self {
        TmuxRunner { server }
    }
}

impl Runner for TmuxRunner {
    fn run(&self, project: &Project) -> Result<()> {
        let client = TmuxClient::new(self.server.clone());
        let session = ensure_started(project, &client)?;
        info!(project = %project.name, session = %session.id, "project is running");
        Ok(())
    }
}
