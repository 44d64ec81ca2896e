//! Session step: find the project's session by name or start it.

use tracing::{debug, info};

use crate::error::Result;
use crate::infrastructure::Multiplexer;
use crate::types::project::Project;
use crate::types::session::{find_session_by_name, Session};

/// An existing session is reused untouched. A new one starts in the project's
/// session directory and its default window takes the first configured
/// window's name, so the window step adopts it instead of adding another.
pub fn ensure_session(project: &Project, mux: &dyn Multiplexer) -> Result<Session> {
    let sessions = mux.list_sessions()?;
    if let Some(session) = find_session_by_name(&sessions, &project.name) {
        debug!(project = %project.name, session = %session.id, "session already running");
        return Ok(session.clone());
    }

    let dir = project.session_directory();
    let session = mux.start_session(&project.name, dir.as_deref())?;
    info!(project = %project.name, session = %session.id, dir = ?dir, "started session");

    if let Some(first) = project.windows.first() {
        mux.rename_window(&session.id, &first.name)?;
        debug!(session = %session.id, window = %first.name, "renamed default window");
    }
    Ok(session)
}
