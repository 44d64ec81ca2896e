//! In-memory multiplexer for testing.
//!
//! Models the parts of tmux the reconciliation engine relies on: sessions
//! with ordered windows, windows with ordered panes, titles, working
//! directories and typed keystrokes. Every call is recorded, and a call can
//! be made to fail once, making it easy to write deterministic tests for
//! higher-level orchestration code.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MuxifyError, Result};
use crate::types::session::{
    session_name, LiveWindow, Pane, PaneLayout, Placement, Session, SplitDirection, WindowTarget,
};

use super::Multiplexer;

/// Title tmux gives a fresh pane (the host name).
pub const DEFAULT_PANE_TITLE: &str = "fake-host";
/// Name tmux gives a fresh window (the running command).
pub const DEFAULT_WINDOW_NAME: &str = "sh";

#[derive(Debug, Clone)]
struct FakePane {
    id: String,
    title: String,
    dir: Option<PathBuf>,
    split: Option<SplitDirection>,
    typed: Vec<String>,
}

#[derive(Debug, Clone)]
struct FakeWindow {
    id: String,
    name: String,
    dir: Option<PathBuf>,
    panes: Vec<FakePane>,
    active_pane: usize,
}

#[derive(Debug, Clone)]
struct FakeSession {
    id: String,
    name: String,
    dir: Option<PathBuf>,
    windows: Vec<FakeWindow>,
    active_window: String,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u32,
    sessions: Vec<FakeSession>,
    calls: Vec<String>,
    failures: HashMap<String, String>,
}

impl FakeState {
    fn next(&mut self, prefix: char) -> String {
        let id = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn new_pane(&mut self, dir: Option<PathBuf>, split: Option<SplitDirection>) -> FakePane {
        FakePane {
            id: self.next('%'),
            title: DEFAULT_PANE_TITLE.to_string(),
            dir,
            split,
            typed: Vec::new(),
        }
    }

    fn new_window(&mut self, name: &str, dir: Option<PathBuf>) -> FakeWindow {
        let id = self.next('@');
        let pane = self.new_pane(dir.clone(), None);
        FakeWindow {
            id,
            name: name.to_string(),
            dir,
            panes: vec![pane],
            active_pane: 0,
        }
    }

    /// Record the call and trip a pending failure for `op`, if any.
    fn enter(&mut self, op: &str, detail: String) -> Result<()> {
        let call = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{} {}", op, detail)
        };
        self.calls.push(call.clone());
        match self.failures.remove(op) {
            Some(message) => Err(MuxifyError::execution(call, message)),
            None => Ok(()),
        }
    }

    fn session_index(&self, target: &str) -> Option<usize> {
        self.sessions
            .iter()
            .position(|s| s.id == target || s.name == target)
    }

    /// `(session, window)` position of a window id, or of the active window
    /// of a session id/name, or of the window holding a pane id.
    fn locate_window(&self, target: &str) -> Result<(usize, usize)> {
        for (si, session) in self.sessions.iter().enumerate() {
            for (wi, window) in session.windows.iter().enumerate() {
                if window.id == target || window.panes.iter().any(|p| p.id == target) {
                    return Ok((si, wi));
                }
            }
        }
        if let Some(si) = self.session_index(target) {
            let session = &self.sessions[si];
            if let Some(wi) = session
                .windows
                .iter()
                .position(|w| w.id == session.active_window)
            {
                return Ok((si, wi));
            }
        }
        Err(MuxifyError::execution(
            target.to_string(),
            format!("can't find window: {}", target),
        ))
    }

    /// Pane id itself, or the active pane of a window/session target.
    fn locate_pane(&self, target: &str) -> Result<(usize, usize, usize)> {
        let (si, wi) = self.locate_window(target)?;
        let window = &self.sessions[si].windows[wi];
        let pi = window
            .panes
            .iter()
            .position(|p| p.id == target)
            .unwrap_or(window.active_pane);
        Ok((si, wi, pi))
    }

    fn live_window(&self, si: usize, wi: usize) -> LiveWindow {
        let window = &self.sessions[si].windows[wi];
        LiveWindow {
            id: window.id.clone(),
            name: window.name.clone(),
            index: wi as u32,
        }
    }
}

/// Panes split below their predecessor are stacked; all others sit side by side.
fn live_pane(pane: &FakePane, position: usize) -> Pane {
    let (width, height) = (80, 24);
    let offset = position as u32;
    let (top, left) = match pane.split {
        Some(SplitDirection::Vertical) => (offset * (height + 1), 0),
        _ => (0, offset * (width + 1)),
    };
    Pane {
        id: pane.id.clone(),
        title: pane.title.clone(),
        layout: PaneLayout {
            top,
            bottom: top + height - 1,
            left,
            right: left + width - 1,
        },
    }
}

fn dir_of(dir: Option<&Path>) -> Option<PathBuf> {
    dir.filter(|d| !d.as_os_str().is_empty()).map(Path::to_path_buf)
}

/// A test double that behaves like a small tmux server.
#[derive(Debug, Default)]
pub struct FakeMultiplexer {
    state: RefCell<FakeState>,
}

impl FakeMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `op` (a tmux command name such as
    /// `"split-window"`) fail with `message`.
    pub fn fail_next(&self, op: &str, message: &str) {
        self.state
            .borrow_mut()
            .failures
            .insert(op.to_string(), message.to_string());
    }

    /// Every call made so far, as `"<tmux command> <args>"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of recorded calls of `op`.
    pub fn count_calls(&self, op: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    pub fn session_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .sessions
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn session_dir(&self, session_id: &str) -> Option<PathBuf> {
        let state = self.state.borrow();
        let si = state.session_index(session_id)?;
        state.sessions[si].dir.clone()
    }

    /// Window names of a session, in order.
    pub fn window_names(&self, session_id: &str) -> Vec<String> {
        let state = self.state.borrow();
        state
            .session_index(session_id)
            .map(|si| {
                state.sessions[si]
                    .windows
                    .iter()
                    .map(|w| w.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn window_dir(&self, window_id: &str) -> Option<PathBuf> {
        let state = self.state.borrow();
        let (si, wi) = state.locate_window(window_id).ok()?;
        state.sessions[si].windows[wi].dir.clone()
    }

    /// Id of the session's focused window.
    pub fn active_window(&self, session_id: &str) -> Option<String> {
        let state = self.state.borrow();
        let si = state.session_index(session_id)?;
        Some(state.sessions[si].active_window.clone())
    }

    /// Pane titles of a window, in order.
    pub fn pane_titles(&self, window_id: &str) -> Vec<String> {
        let state = self.state.borrow();
        match state.locate_window(window_id) {
            Ok((si, wi)) => state.sessions[si].windows[wi]
                .panes
                .iter()
                .map(|p| p.title.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn pane_dir(&self, pane_id: &str) -> Option<PathBuf> {
        let state = self.state.borrow();
        let (si, wi, pi) = state.locate_pane(pane_id).ok()?;
        state.sessions[si].windows[wi].panes[pi].dir.clone()
    }

    /// How the pane was created; `None` for a window's initial pane.
    pub fn pane_split(&self, pane_id: &str) -> Option<SplitDirection> {
        let state = self.state.borrow();
        let (si, wi, pi) = state.locate_pane(pane_id).ok()?;
        state.sessions[si].windows[wi].panes[pi].split
    }

    /// Text typed into a pane, one entry per `send_keys`.
    pub fn typed(&self, pane_id: &str) -> Vec<String> {
        let state = self.state.borrow();
        match state.locate_pane(pane_id) {
            Ok((si, wi, pi)) => state.sessions[si].windows[wi].panes[pi].typed.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Drop a window as if its last pane had exited.
    pub fn kill_window(&self, window_id: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let (si, wi) = state.locate_window(window_id)?;
        let session = &mut state.sessions[si];
        session.windows.remove(wi);
        if session.active_window == window_id {
            session.active_window = session
                .windows
                .first()
                .map(|w| w.id.clone())
                .unwrap_or_default();
        }
        Ok(())
    }
}

impl Multiplexer for FakeMultiplexer {
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut state = self.state.borrow_mut();
        state.enter("list-sessions", String::new())?;
        Ok(state
            .sessions
            .iter()
            .map(|s| Session {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect())
    }

    fn start_session(&self, name: &str, dir: Option<&Path>) -> Result<Session> {
        let mut state = self.state.borrow_mut();
        state.enter("new-session", name.to_string())?;
        let name = session_name(name);
        if state.sessions.iter().any(|s| s.name == name) {
            return Err(MuxifyError::execution(
                "new-session",
                format!("duplicate session: {}", name),
            ));
        }
        let id = state.next('$');
        let dir = dir_of(dir);
        let window = state.new_window(DEFAULT_WINDOW_NAME, dir.clone());
        state.sessions.push(FakeSession {
            id: id.clone(),
            name: name.clone(),
            dir,
            active_window: window.id.clone(),
            windows: vec![window],
        });
        Ok(Session { id, name })
    }

    fn rename_window(&self, target: &str, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enter("rename-window", format!("{} {}", target, name))?;
        let (si, wi) = state.locate_window(target)?;
        state.sessions[si].windows[wi].name = name.to_string();
        Ok(())
    }

    fn move_window(&self, window_id: &str, target: &WindowTarget) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enter("move-window", format!("{} {}", window_id, target.window_id))?;
        let (si, wi) = state.locate_window(window_id)?;
        let (ti, _) = state.locate_window(&target.window_id)?;
        if window_id == target.window_id {
            return Ok(());
        }
        let window = state.sessions[si].windows.remove(wi);
        let anchor = state.sessions[ti]
            .windows
            .iter()
            .position(|w| w.id == target.window_id)
            .ok_or_else(|| MuxifyError::execution("move-window", "anchor vanished"))?;
        let at = match target.placement {
            Placement::Before => anchor,
            Placement::After => anchor + 1,
        };
        state.sessions[ti].windows.insert(at, window);
        Ok(())
    }

    fn create_window(
        &self,
        target: &WindowTarget,
        name: &str,
        dir: Option<&Path>,
    ) -> Result<LiveWindow> {
        let mut state = self.state.borrow_mut();
        state.enter("new-window", format!("{} {}", target.window_id, name))?;
        let (si, anchor) = state.locate_window(&target.window_id)?;
        let dir = dir_of(dir).or_else(|| state.sessions[si].dir.clone());
        let window = state.new_window(name, dir);
        let at = match target.placement {
            Placement::Before => anchor,
            Placement::After => anchor + 1,
        };
        let session = &mut state.sessions[si];
        session.active_window = window.id.clone();
        session.windows.insert(at, window);
        Ok(state.live_window(si, at))
    }

    fn list_windows(&self, session_id: &str) -> Result<Vec<LiveWindow>> {
        let mut state = self.state.borrow_mut();
        state.enter("list-windows", session_id.to_string())?;
        let si = state.session_index(session_id).ok_or_else(|| {
            MuxifyError::execution("list-windows", format!("can't find session: {}", session_id))
        })?;
        Ok((0..state.sessions[si].windows.len())
            .map(|wi| state.live_window(si, wi))
            .collect())
    }

    fn list_panes(&self, target: &str) -> Result<Vec<Pane>> {
        let mut state = self.state.borrow_mut();
        state.enter("list-panes", target.to_string())?;
        let (si, wi) = state.locate_window(target)?;
        Ok(state.sessions[si].windows[wi]
            .panes
            .iter()
            .enumerate()
            .map(|(i, p)| live_pane(p, i))
            .collect())
    }

    fn rename_pane(&self, pane_id: &str, title: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enter("select-pane", format!("{} {}", pane_id, title))?;
        let (si, wi, pi) = state.locate_pane(pane_id)?;
        state.sessions[si].windows[wi].panes[pi].title = title.to_string();
        Ok(())
    }

    fn split_window(
        &self,
        window_id: &str,
        direction: SplitDirection,
        dir: Option<&Path>,
    ) -> Result<Pane> {
        let mut state = self.state.borrow_mut();
        let flag = match direction {
            SplitDirection::Horizontal => "-h",
            SplitDirection::Vertical => "-v",
        };
        state.enter("split-window", format!("{} {}", flag, window_id))?;
        let (si, wi) = state.locate_window(window_id)?;
        let dir = dir_of(dir).or_else(|| state.sessions[si].dir.clone());
        let pane = state.new_pane(dir, Some(direction));
        let window = &mut state.sessions[si].windows[wi];
        window.panes.push(pane);
        window.active_pane = window.panes.len() - 1;
        let position = window.active_pane;
        Ok(live_pane(&window.panes[position], position))
    }

    fn send_keys(&self, target: &str, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enter("send-keys", format!("{} {}", target, text))?;
        let (si, wi, pi) = state.locate_pane(target)?;
        state.sessions[si].windows[wi].panes[pi]
            .typed
            .push(text.to_string());
        Ok(())
    }

    fn select_window(&self, window_id: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enter("select-window", window_id.to_string())?;
        let (si, wi) = state.locate_window(window_id)?;
        let id = state.sessions[si].windows[wi].id.clone();
        state.sessions[si].active_window = id;
        Ok(())
    }
}
