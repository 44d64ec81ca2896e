//! Pane step: give a window one pane per configured task.
//!
//! A pane whose title equals its task id is considered fully set up and is
//! never touched again. This is what keeps task commands from running twice.

use tracing::{debug, info, warn};

use crate::error::{MuxifyError, Result};
use crate::infrastructure::Multiplexer;
use crate::types::project::{Layout, Project, Task, Window};
use crate::types::session::{find_pane_by_title, LiveWindow, Pane, SplitDirection};

pub fn ensure_panes(
    project: &Project,
    window: &Window,
    live: &LiveWindow,
    mux: &dyn Multiplexer,
) -> Result<()> {
    let panes = mux.list_panes(&live.id)?;
    let empty = Task::default();

    for (j, task_id) in window.panes.iter().enumerate() {
        if let Some(pane) = find_pane_by_title(&panes, task_id) {
            debug!(window = %live.name, pane = %pane.id, task = %task_id, "pane already running");
            continue;
        }

        let task = project.find_task(task_id).unwrap_or_else(|| {
            warn!(project = %project.name, task = %task_id, "task is not defined, using an empty task");
            &empty
        });

        let pane = if j == 0 {
            let first = panes
                .first()
                .ok_or_else(|| MuxifyError::protocol(format!("window {} has no panes", live.id)))?;
            mux.rename_pane(&first.id, task_id)?;
            debug!(window = %live.name, pane = %first.id, task = %task_id, "claimed first pane");
            first.clone()
        } else {
            let direction = split_direction(window.layout());
            let dir = project.task_directory(task);
            let created = mux.split_window(&live.id, direction, dir.as_deref())?;
            mux.rename_pane(&created.id, task_id)?;
            info!(window = %live.name, pane = %created.id, task = %task_id, ?direction, "split pane");
            created
        };

        start_task(&pane, task, mux)?;
    }
    Ok(())
}

pub fn split_direction(layout: Layout) -> SplitDirection {
    match layout {
        Layout::Horizontal => SplitDirection::Horizontal,
        Layout::Vertical => SplitDirection::Vertical,
    }
}

fn start_task(pane: &Pane, task: &Task, mux: &dyn Multiplexer) -> Result<()> {
    for command in &task.commands {
        debug!(pane = %pane.id, command = %command, "sending command");
        mux.send_keys(&pane.id, command)?;
    }
    Ok(())
}
