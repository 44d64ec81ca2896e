//! Live tmux entities as observed through the multiplexer client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveWindow {
    pub id: String,
    pub name: String,
    pub index: u32,
}

/// Pane geometry in cells, as reported by `#{pane_top},#{pane_bottom},...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneLayout {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    pub id: String,
    /// Holds the task id once muxify has claimed the pane.
    pub title: String,
    pub layout: PaneLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Before,
    After,
}

/// Where a window is created or moved to, relative to an existing window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTarget {
    pub window_id: String,
    pub placement: Placement,
}

impl WindowTarget {
    pub fn before(window: &LiveWindow) -> Self {
        WindowTarget {
            window_id: window.id.clone(),
            placement: Placement::Before,
        }
    }

    pub fn after(window: &LiveWindow) -> Self {
        WindowTarget {
            window_id: window.id.clone(),
            placement: Placement::After,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDirection {
    /// New pane to the right of the current one.
    Horizontal,
    /// New pane below the current one.
    Vertical,
}

/// The name tmux gives a session created as `name`: it stores `.` and `:`
/// as `_`.
pub fn session_name(name: &str) -> String {
    name.replace(['.', ':'], "_")
}

/// Session that was created for a project called `name`.
pub fn find_session_by_name<'a>(sessions: &'a [Session], name: &str) -> Option<&'a Session> {
    let stored = session_name(name);
    sessions.iter().find(|s| s.name == stored)
}

pub fn find_window_by_name<'a>(windows: &'a [LiveWindow], name: &str) -> Option<&'a LiveWindow> {
    windows.iter().find(|w| w.name == name)
}

/// First pane in scan order whose title equals `title`.
pub fn find_pane_by_title<'a>(panes: &'a [Pane], title: &str) -> Option<&'a Pane> {
    panes.iter().find(|p| p.title == title)
}
