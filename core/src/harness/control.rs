//! A tmux control-mode client attached to one session.

use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::Receiver;

use tracing::debug;

use crate::error::{MuxifyError, Result};
use crate::infrastructure::tmux::TmuxServer;
use crate::types::session::Session;

use super::pipeline::{output_events, output_lines, read_lines};

pub struct ControlMode {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
}

impl ControlMode {
    /// Run `tmux -C attach -t <session>` against `server`.
    pub fn attach(server: &TmuxServer, session: &Session) -> Result<Self> {
        let args = server.control_mode_args(&session.id);
        debug!(?args, "attaching control mode client");
        let mut child = Command::new("tmux")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MuxifyError::execution(args.join(" "), e.to_string()))?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        Ok(ControlMode {
            child,
            stdin,
            stdout,
        })
    }

    /// Shell output lines of every pane in the session. Can be taken once.
    pub fn output_lines(&mut self) -> Option<Receiver<String>> {
        let stdout = self.stdout.take()?;
        Some(output_lines(output_events(read_lines(BufReader::new(stdout)))))
    }

    /// Detach by closing stdin and wait for the client to exit.
    pub fn close(mut self) -> Result<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| MuxifyError::execution("control mode", e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(MuxifyError::execution(
                "control mode",
                format!("client exited with {}", status),
            ))
        }
    }
}

impl Drop for ControlMode {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
