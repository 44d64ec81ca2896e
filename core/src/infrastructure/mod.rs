//! Multiplexer backends.
//!
//! Provides the `Multiplexer` trait the reconciliation engine drives, the tmux
//! implementation (production) and an in-memory fake (testing). Every call is
//! blocking: the engine needs the ids produced by one call before it can issue
//! the next.

pub mod mock;
pub mod runner;
pub mod tmux;

use std::path::Path;

use crate::error::Result;
use crate::types::session::{LiveWindow, Pane, Session, SplitDirection, WindowTarget};

pub trait Multiplexer {
    /// Sessions on the server, in tmux order. No running server yields an
    /// empty list, not an error.
    fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Start a detached session, starting the server if needed. The session
    /// comes with one default window holding one default pane.
    fn start_session(&self, name: &str, dir: Option<&Path>) -> Result<Session>;

    /// Rename a window. A session id targets the session's current window.
    fn rename_window(&self, target: &str, name: &str) -> Result<()>;

    fn move_window(&self, window_id: &str, target: &WindowTarget) -> Result<()>;

    fn create_window(
        &self,
        target: &WindowTarget,
        name: &str,
        dir: Option<&Path>,
    ) -> Result<LiveWindow>;

    fn list_windows(&self, session_id: &str) -> Result<Vec<LiveWindow>>;

    /// Panes of a window, or of a session's current window.
    fn list_panes(&self, target: &str) -> Result<Vec<Pane>>;

    fn rename_pane(&self, pane_id: &str, title: &str) -> Result<()>;

    fn split_window(
        &self,
        window_id: &str,
        direction: SplitDirection,
        dir: Option<&Path>,
    ) -> Result<Pane>;

    /// Type `text` followed by a newline into the target. There is no
    /// acknowledgement that the resulting command finished.
    fn send_keys(&self, target: &str, text: &str) -> Result<()>;

    fn select_window(&self, window_id: &str) -> Result<()>;
}
