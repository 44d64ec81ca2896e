//! Window step: put the configured windows, in order, into the session.
//!
//! Windows are matched to live ones by name, once, against the window list
//! captured at the start of the step. The first configured window is placed
//! before the first live window; every following one goes right after its
//! predecessor. Matched windows are always moved, even when already in place.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{MuxifyError, Result};
use crate::infrastructure::Multiplexer;
use crate::types::project::{Project, Window, WindowId};
use crate::types::session::{find_window_by_name, LiveWindow, Session, WindowTarget};

use super::panes::ensure_panes;

pub fn ensure_windows(project: &Project, session: &Session, mux: &dyn Multiplexer) -> Result<()> {
    if project.windows.is_empty() {
        return Ok(());
    }

    let captured = mux.list_windows(&session.id)?;
    let front = captured
        .first()
        .cloned()
        .ok_or_else(|| MuxifyError::protocol(format!("session {} has no windows", session.id)))?;

    let mut live: HashMap<WindowId, LiveWindow> = HashMap::new();
    for window in &project.windows {
        if let Some(found) = find_window_by_name(&captured, &window.name) {
            live.insert(window_id(window)?, found.clone());
        }
    }

    for (i, window) in project.windows.iter().enumerate() {
        let target = if i == 0 {
            WindowTarget::before(&front)
        } else {
            let previous = window_id(&project.windows[i - 1])?;
            let anchor = live.get(&previous).ok_or_else(|| {
                MuxifyError::Validation(format!("window '{}' was not placed", project.windows[i - 1].name))
            })?;
            WindowTarget::after(anchor)
        };

        let id = window_id(window)?;
        let current = match live.get(&id) {
            Some(existing) => {
                mux.move_window(&existing.id, &target)?;
                debug!(window = %window.name, id = %existing.id, ?target, "moved window");
                existing.clone()
            }
            None => {
                let dir = project.window_directory(window);
                let created = mux.create_window(&target, &window.name, dir.as_deref())?;
                info!(window = %window.name, id = %created.id, dir = ?dir, "created window");
                live.insert(id, created.clone());
                created
            }
        };

        ensure_panes(project, window, &current, mux)?;
    }

    let first = window_id(&project.windows[0])?;
    if let Some(focus) = live.get(&first) {
        mux.select_window(&focus.id)?;
    }
    Ok(())
}

fn window_id(window: &Window) -> Result<WindowId> {
    window
        .id()
        .ok_or_else(|| MuxifyError::Validation(format!("window '{}' is lacking an id", window.name)))
}
