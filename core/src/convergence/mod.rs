//! Convergence engine: brings a live tmux session in line with a project.
//!
//! `ensure_started` is safe to call any number of times. Each step reads the
//! live state it needs, decides from it, and issues the minimal commands:
//!
//! - `session` finds or starts the project's session,
//! - `windows` orders (and creates) the configured windows,
//! - `panes` gives each window one titled pane per task and starts new tasks.
//!
//! Errors abort the pass immediately. Nothing is rolled back; running again
//! picks up where the failed pass stopped.

pub mod panes;
pub mod session;
pub mod windows;

use tracing::debug;

use crate::error::Result;
use crate::infrastructure::Multiplexer;
use crate::types::project::Project;
use crate::types::session::Session;

pub use session::ensure_session;
pub use windows::ensure_windows;

pub fn ensure_started(project: &Project, mux: &dyn Multiplexer) -> Result<Session> {
    project.validate()?;
    debug!(project = %project.name, windows = project.windows.len(), "reconciling project");
    let session = ensure_session(project, mux)?;
    ensure_windows(project, &session, mux)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::MuxifyError;
    use crate::infrastructure::mock::FakeMultiplexer;
    use crate::types::project::{Layout, Task, Window};

    fn with_windows(names: &[&str]) -> Project {
        names
            .iter()
            .fold(Project::new("P"), |p, name| p.with_window(Window::new(*name)))
    }

    fn pane_count(fake: &FakeMultiplexer, session: &Session) -> usize {
        fake.list_windows(&session.id)
            .unwrap()
            .iter()
            .map(|w| fake.list_panes(&w.id).unwrap().len())
            .sum()
    }

    fn echo_project() -> Project {
        Project::new("P")
            .with_window(Window::with_panes("W", ["foo", "bar"]))
            .with_task("foo", Task::with_commands(["echo \"Foo\""]))
            .with_task("bar", Task::with_commands(["echo \"Bar\""]))
    }

    #[test]
    fn project_without_windows_gets_one_pane() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&Project::new("P"), &fake).unwrap();
        assert_eq!(fake.session_names(), vec!["P"]);
        assert_eq!(pane_count(&fake, &session), 1);
    }

    #[test]
    fn session_starts_in_project_dir() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&Project::new("P").in_dir("/tmp/x"), &fake).unwrap();
        let pane = fake.list_panes(&session.id).unwrap().remove(0);
        assert_eq!(fake.pane_dir(&pane.id), Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn windows_are_created_in_order() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&with_windows(&["W1", "W2", "W3"]), &fake).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W1", "W2", "W3"]);
    }

    #[test]
    fn appended_window_keeps_existing_ids() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&with_windows(&["W1", "W2"]), &fake).unwrap();
        let before = fake.list_windows(&session.id).unwrap();

        let again = ensure_started(&with_windows(&["W1", "W2", "W3"]), &fake).unwrap();
        assert_eq!(again.id, session.id);
        let after = fake.list_windows(&session.id).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W1", "W2", "W3"]);
        assert_eq!(after[0].id, before[0].id);
        assert_eq!(after[1].id, before[1].id);
    }

    #[test]
    fn reordered_windows_converge() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&with_windows(&["W4", "W1", "W3"]), &fake).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W4", "W1", "W3"]);

        ensure_started(&with_windows(&["W1", "W2", "W3", "W4"]), &fake).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W1", "W2", "W3", "W4"]);
    }

    #[test]
    fn unknown_live_windows_are_kept_after_configured_ones() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&with_windows(&["W1"]), &fake).unwrap();
        let w1 = fake.list_windows(&session.id).unwrap().remove(0);
        fake.create_window(&crate::types::session::WindowTarget::before(&w1), "mine", None)
            .unwrap();

        ensure_started(&with_windows(&["W1", "W2"]), &fake).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W1", "W2", "mine"]);
    }

    #[test]
    fn rerun_is_idempotent() {
        let fake = FakeMultiplexer::new();
        let project = echo_project().with_window(Window::new("W2"));
        let first = ensure_started(&project, &fake).unwrap();
        let windows = fake.list_windows(&first.id).unwrap().len();
        let panes = pane_count(&fake, &first);

        let second = ensure_started(&project, &fake).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(fake.list_windows(&first.id).unwrap().len(), windows);
        assert_eq!(pane_count(&fake, &first), panes);
    }

    #[test]
    fn commands_run_once_across_runs() {
        let fake = FakeMultiplexer::new();
        let project = echo_project();
        let session = ensure_started(&project, &fake).unwrap();
        ensure_started(&project, &fake).unwrap();
        ensure_started(&project, &fake).unwrap();

        let panes = fake.list_panes(&session.id).unwrap();
        assert_eq!(panes.len(), 2);
        assert_eq!(fake.typed(&panes[0].id), vec!["echo \"Foo\""]);
        assert_eq!(fake.typed(&panes[1].id), vec!["echo \"Bar\""]);
    }

    #[test]
    fn fresh_window_has_no_extra_panes() {
        let fake = FakeMultiplexer::new();
        let project = echo_project().with_window(Window::with_panes("W2", ["foo"]));
        let session = ensure_started(&project, &fake).unwrap();
        let windows = fake.list_windows(&session.id).unwrap();
        assert_eq!(fake.list_panes(&windows[0].id).unwrap().len(), 2);
        assert_eq!(fake.list_panes(&windows[1].id).unwrap().len(), 1);
    }

    #[test]
    fn focuses_first_window() {
        let fake = FakeMultiplexer::new();
        let session = ensure_started(&with_windows(&["W1", "W2"]), &fake).unwrap();
        let first = fake.list_windows(&session.id).unwrap().remove(0);
        assert_eq!(fake.active_window(&session.id), Some(first.id));
    }

    #[test]
    fn directory_precedence() {
        let fake = FakeMultiplexer::new();
        let project = Project::new("P")
            .in_dir("/work")
            .with_window(Window::with_panes("W1", ["plain", "nested"]))
            .with_window(Window::with_panes("W2", ["nested"]))
            .with_task("plain", Task::default())
            .with_task("nested", Task::default().in_dir("./sub"));
        let session = ensure_started(&project, &fake).unwrap();
        let windows = fake.list_windows(&session.id).unwrap();
        let w1 = fake.list_panes(&windows[0].id).unwrap();
        let w2 = fake.list_panes(&windows[1].id).unwrap();
        assert_eq!(fake.pane_dir(&w1[0].id), Some(PathBuf::from("/work")));
        assert_eq!(fake.pane_dir(&w1[1].id), Some(PathBuf::from("/work/sub")));
        assert_eq!(fake.window_dir(&windows[1].id), Some(PathBuf::from("/work/sub")));
        assert_eq!(fake.pane_dir(&w2[0].id), Some(PathBuf::from("/work/sub")));
    }

    #[test]
    fn partial_failure_is_completed_by_rerun() {
        let fake = FakeMultiplexer::new();
        let project = with_windows(&["W1", "W2", "W3"]);
        fake.fail_next("new-window", "create window failed: index in use");
        let err = ensure_started(&project, &fake).unwrap_err();
        assert!(matches!(err, MuxifyError::MultiplexerExecution { .. }));
        assert_eq!(fake.count_calls("select-window"), 0);

        let session = ensure_started(&project, &fake).unwrap();
        assert_eq!(fake.window_names(&session.id), vec!["W1", "W2", "W3"]);
    }

    #[test]
    fn invalid_project_makes_no_tmux_calls() {
        let fake = FakeMultiplexer::new();
        let mut project = with_windows(&["W1"]);
        project.windows[0].clear_id();
        assert!(matches!(
            ensure_started(&project, &fake),
            Err(MuxifyError::Validation(_))
        ));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn colliding_pane_title_is_matched_first_in_order() {
        let fake = FakeMultiplexer::new();
        let project = Project::new("P").with_window(Window::with_panes("W", ["a", "b"]));
        let session = ensure_started(&project, &fake).unwrap();
        let panes = fake.list_panes(&session.id).unwrap();
        fake.rename_pane(&panes[1].id, "a").unwrap();

        ensure_started(&project, &fake).unwrap();
        assert_eq!(fake.pane_titles(&panes[0].id), vec!["a", "a", "b"]);
    }

    #[test]
    fn dotted_project_name_reuses_its_session() {
        let fake = FakeMultiplexer::new();
        let project = Project::new("my.proj").with_window(Window::new("W1"));
        let first = ensure_started(&project, &fake).unwrap();
        assert_eq!(first.name, "my_proj");

        let second = ensure_started(&project, &fake).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(fake.count_calls("new-session"), 1);
        assert_eq!(fake.window_names(&first.id), vec!["W1"]);
    }

    #[test]
    fn quoted_names_never_reach_tmux() {
        let fake = FakeMultiplexer::new();
        let window = with_windows(&["W1", "say \"hi\""]);
        assert!(matches!(ensure_started(&window, &fake), Err(MuxifyError::Validation(_))));

        let pane = Project::new("P").with_window(Window::with_panes("W", ["\"quoted\""]));
        assert!(matches!(ensure_started(&pane, &fake), Err(MuxifyError::Validation(_))));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn vertical_layout_stacks_panes() {
        let fake = FakeMultiplexer::new();
        let project = Project::new("P").with_window(
            Window::with_panes("W", ["top", "bottom"]).with_layout(Layout::Vertical),
        );
        let session = ensure_started(&project, &fake).unwrap();
        let panes = fake.list_panes(&session.id).unwrap();
        assert_eq!(panes[1].layout.left, 0);
        assert_ne!(panes[1].layout.top, 0);
    }
}
