//! Desired-state model: projects, windows and tasks.
//!
//! Values here are produced by the configuration decoder (or built directly in
//! tests) and are never mutated by reconciliation.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{MuxifyError, Result};

pub type TaskId = String;

/// Per-parse identifier attached to a configured window. It only keys windows
/// within a single reconciliation call and carries no meaning across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        WindowId(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub commands: Vec<String>,
}

impl Task {
    pub fn with_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            working_dir: None,
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    #[serde(skip)]
    id: Option<WindowId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub panes: Vec<TaskId>,
}

impl Window {
    pub fn new(name: impl Into<String>) -> Self {
        Window {
            id: Some(WindowId::new()),
            name: name.into(),
            layout: None,
            panes: Vec::new(),
        }
    }

    pub fn with_panes<I, S>(name: impl Into<String>, panes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        let mut window = Window::new(name);
        window.panes = panes.into_iter().map(Into::into).collect();
        window
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn id(&self) -> Option<WindowId> {
        self.id
    }

    /// Attach an id if the window does not carry one yet.
    pub fn ensure_id(&mut self) -> WindowId {
        *self.id.get_or_insert_with(WindowId::new)
    }

    /// Drop the id. Only useful to exercise validation.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn layout(&self) -> Layout {
        self.layout.unwrap_or_default()
    }
}

// The synthetic id is deliberately left out: two windows are equal when their
// configuration is.
impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.layout == other.layout && self.panes == other.panes
    }
}

impl Eq for Window {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub windows: Vec<Window>,
    #[serde(default, deserialize_with = "deserialize_tasks")]
    pub tasks: HashMap<TaskId, Task>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.windows.push(window);
        self
    }

    pub fn with_task(mut self, id: impl Into<TaskId>, task: Task) -> Self {
        self.tasks.insert(id.into(), task);
        self
    }

    /// Project working directory, `None` when unset or empty.
    pub fn dir(&self) -> Option<&Path> {
        non_empty(self.working_dir.as_deref())
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Task bound to the first pane of `window`.
    pub fn first_window_task(&self, window: &Window) -> Option<&Task> {
        window.panes.first().and_then(|id| self.find_task(id))
    }

    /// Task bound to the first pane of the first window.
    pub fn first_task(&self) -> Option<&Task> {
        self.windows.first().and_then(|w| self.first_window_task(w))
    }

    /// Directory a task's pane starts in: the task's own directory joined under
    /// the project directory, or the project directory itself.
    pub fn task_directory(&self, task: &Task) -> Option<PathBuf> {
        match non_empty(task.working_dir.as_deref()) {
            Some(task_dir) => Some(join_clean(self.dir(), task_dir)),
            None => self.dir().map(Path::to_path_buf),
        }
    }

    /// Directory a freshly created window starts in, before any split.
    pub fn window_directory(&self, window: &Window) -> Option<PathBuf> {
        if !window.panes.is_empty() && self.dir().is_some() {
            let default_task = Task::default();
            let task = self.first_window_task(window).unwrap_or(&default_task);
            return self.task_directory(task);
        }
        self.dir().map(Path::to_path_buf)
    }

    /// Directory a new session for this project starts in.
    pub fn session_directory(&self) -> Option<PathBuf> {
        self.dir()?;
        match self.first_task() {
            Some(task) => self.task_directory(task),
            None => self.dir().map(Path::to_path_buf),
        }
    }

    /// Checks run before any tmux call. Window names and pane task ids end up
    /// inside quoted listing records, so they may not contain `"`.
    pub fn validate(&self) -> Result<()> {
        for window in &self.windows {
            if window.id().is_none() {
                return Err(MuxifyError::Validation(format!(
                    "window '{}' is lacking an id",
                    window.name
                )));
            }
            if window.name.contains('"') {
                return Err(MuxifyError::Validation(format!(
                    "window name {} may not contain '\"'",
                    window.name
                )));
            }
            if let Some(task) = window.panes.iter().find(|t| t.contains('"')) {
                return Err(MuxifyError::Validation(format!(
                    "task id {} in window '{}' may not contain '\"'",
                    task, window.name
                )));
            }
        }
        Ok(())
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Join `rel` under `base` and clean the result: `.` components are dropped,
/// `..` removes the preceding component and a leading `/` on `rel` does not
/// escape `base`. `./sub` under `/work` is `/work/sub`, `/abs` is `/work/abs`.
fn join_clean(base: Option<&Path>, rel: &Path) -> PathBuf {
    let rel_parts = rel
        .components()
        .filter(|c| base.is_none() || !matches!(c, Component::RootDir | Component::Prefix(_)));
    let mut cleaned = PathBuf::new();
    for component in base.into_iter().flat_map(Path::components).chain(rel_parts) {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = cleaned.components().next_back();
                match last {
                    Some(Component::Normal(_)) => {
                        cleaned.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => cleaned.push(".."),
                }
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// `tasks:` entries may have an empty body (`dev:`), which YAML reads as null.
fn deserialize_tasks<'de, D>(deserializer: D) -> std::result::Result<HashMap<TaskId, Task>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<TaskId, Option<Task>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, task)| (id, task.unwrap_or_default()))
        .collect())
}
