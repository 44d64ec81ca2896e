//! Command runner abstraction for invoking the tmux binary.
//!
//! `CommandRunner` is the trait the tmux client uses to execute one tmux
//! invocation. `ProcessRunner` is the production implementation that spawns
//! the binary. `MockRunner` is the test double that records argument vectors
//! and returns preset responses.

use std::cell::RefCell;
use std::io::ErrorKind;
use std::process::Command;

use crate::error::{MuxifyError, Result};

/// Trait for executing a single tmux invocation. `args` excludes the program.
pub trait CommandRunner: Send {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// Production runner that spawns the tmux binary directly (no shell).
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::with_program("tmux")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        ProcessRunner {
            program: program.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            let message = if e.kind() == ErrorKind::NotFound {
                format!("{} is not installed or not on PATH", self.program)
            } else {
                format!("failed to execute: {}", e)
            };
            MuxifyError::execution(args.join(" "), message)
        })?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MuxifyError::execution(
                args.join(" "),
                format!("{} ({})", stderr.trim(), output.status),
            ))
        }
    }
}

/// Test-double runner that records invocations and returns pre-configured
/// responses. An `Err(message)` response surfaces as an execution error.
pub struct MockRunner {
    responses: RefCell<Vec<std::result::Result<String, String>>>,
    commands: RefCell<Vec<Vec<String>>>,
}

impl MockRunner {
    pub fn with_responses(responses: Vec<std::result::Result<String, String>>) -> Self {
        let mut reversed = responses;
        reversed.reverse();
        MockRunner {
            responses: RefCell::new(reversed),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn executed_commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }

    /// The most recent invocation, joined with spaces.
    pub fn last_command(&self) -> Option<String> {
        self.commands.borrow().last().map(|c| c.join(" "))
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        self.commands.borrow_mut().push(args.to_vec());
        match self.responses.borrow_mut().pop() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(MuxifyError::execution(args.join(" "), message)),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_socket_args_with_each_invocation() {
        let runner = MockRunner::new();
        let start = args(&["-L", "muxify-test", "new-session", "-d", "-s", "work"]);
        let stop = args(&["-L", "muxify-test", "kill-server"]);
        runner.run(&start).unwrap();
        runner.run(&stop).unwrap();
        assert_eq!(runner.executed_commands(), vec![start, stop]);
        assert_eq!(
            runner.last_command().as_deref(),
            Some("-L muxify-test kill-server")
        );
    }

    #[test]
    fn replays_listing_then_failure_in_script_order() {
        let runner = MockRunner::with_responses(vec![
            Ok("\"$0\":\"work\"\n".into()),
            Err("duplicate session: work".into()),
        ]);
        let listing = runner.run(&args(&["list-sessions", "-F", "\"#{session_id}\":\"#{session_name}\""]));
        assert_eq!(listing.unwrap(), "\"$0\":\"work\"\n");
        let err = runner.run(&args(&["new-session", "-d", "-s", "work"])).unwrap_err();
        assert!(err.to_string().contains("duplicate session"));
    }

    #[test]
    fn unscripted_commands_print_nothing() {
        let runner = MockRunner::new();
        assert_eq!(runner.run(&args(&["select-window", "-t", "@3"])).unwrap(), "");
        assert_eq!(runner.run(&args(&["send-keys", "-t", "%1", "-l", "ls\n"])).unwrap(), "");
        assert_eq!(runner.executed_commands().len(), 2);
    }

    #[test]
    fn mock_runner_errors_are_execution_errors() {
        let runner = MockRunner::with_responses(vec![Err("can't find session: nope".into())]);
        let err = runner.run(&args(&["kill-session", "-t", "nope"])).unwrap_err();
        match err {
            MuxifyError::MultiplexerExecution { command, message } => {
                assert_eq!(command, "kill-session -t nope");
                assert_eq!(message, "can't find session: nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn process_runner_reports_missing_binary() {
        let runner = ProcessRunner::with_program("muxify-no-such-binary");
        let err = runner.run(&args(&["-V"])).unwrap_err();
        assert!(matches!(err, MuxifyError::MultiplexerExecution { .. }));
        assert!(err.to_string().contains("not installed"));
    }
}
