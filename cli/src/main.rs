//! muxify: start or update the tmux session of a configured project.
//!
//! # Usage
//!
//! ```text
//! muxify my-project
//! muxify -v my-project
//! ```
//!
//! Projects are read from `$XDG_CONFIG_HOME/muxify/projects.yaml` (or
//! `~/.config/muxify/projects.yaml`). Running it again converges the session
//! without repeating work.

mod runner;

use std::process;

use clap::Parser;
use muxify_core::data::{read_configuration, Environment, SystemEnvironment};
use muxify_core::infrastructure::tmux::TmuxServer;
use muxify_core::logging::Verbosity;
use muxify_core::Result;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use runner::{Runner, TmuxRunner};

#[derive(Debug, Parser)]
#[command(name = "muxify", version, about = "Start or update a tmux session from a project definition")]
struct Args {
    /// Log every decision and tmux command
    #[arg(short, long)]
    verbose: bool,

    /// Name of the project in projects.yaml
    project: String,
}

fn main() {
    let args = Args::parse();
    let verbosity = Verbosity::from_flag(args.verbose);
    init_logging(verbosity);

    let runner = TmuxRunner::new(TmuxServer::new().with_verbosity(verbosity));
    if let Err(e) = run(&args, &SystemEnvironment, &runner) {
        eprintln!("muxify: {}", e.to_string().trim_end());
        process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(verbosity.level()).into())
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args, env: &dyn Environment, runner: &dyn Runner) -> Result<()> {
    let configuration = read_configuration(env)?;
    let project = configuration.require_project(&args.project)?;
    debug!(project = %project.name, "found project");
    runner.run(project)
}
