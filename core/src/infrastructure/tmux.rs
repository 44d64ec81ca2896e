//! Tmux command builder, output parser and `Multiplexer` implementation.
//!
//! Listing commands ask tmux to print one record per line as double-quoted,
//! colon-separated fields (`"$1":"work"`). Anything else coming back is a
//! protocol error: it means the tmux in use does not behave the way the
//! formats below assume.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{MuxifyError, Result};
use crate::logging::Verbosity;
use crate::types::session::{
    LiveWindow, Pane, PaneLayout, Placement, Session, SplitDirection, WindowTarget,
};

use super::runner::{CommandRunner, ProcessRunner};
use super::Multiplexer;

pub const SESSION_FORMAT: &str = r##""#{session_id}":"#{session_name}""##;
pub const WINDOW_FORMAT: &str = r##""#{window_id}":"#{window_name}":"#{window_index}""##;
pub const PANE_FORMAT: &str =
    r##""#{pane_id}":"#{pane_title}":"#{pane_top},#{pane_bottom},#{pane_left},#{pane_right}""##;
const WINDOW_PANE_NAMES_FORMAT: &str = r##""#{window_name}":"#{pane_title}""##;

// ---------------------------------------------------------------------------
// Server options
// ---------------------------------------------------------------------------

/// Which tmux server to talk to. The default is the user's regular server;
/// tests point at a private socket with their own config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmuxServer {
    pub socket_name: Option<String>,
    pub config_file: Option<PathBuf>,
    pub verbosity: Verbosity,
}

impl TmuxServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_socket_name(mut self, name: impl Into<String>) -> Self {
        self.socket_name = Some(name.into());
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Options selecting this server, placed before the tmux command.
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(socket) = &self.socket_name {
            args.push("-L".to_string());
            args.push(socket.clone());
        }
        if let Some(config) = &self.config_file {
            args.push("-f".to_string());
            args.push(config.to_string_lossy().into_owned());
        }
        args
    }

    pub fn command_line(&self, command: Vec<String>) -> Vec<String> {
        let mut args = self.global_args();
        args.extend(command);
        args
    }

    /// Arguments for a control-mode client attached to `session_id`.
    pub fn control_mode_args(&self, session_id: &str) -> Vec<String> {
        let mut args = vec!["-C".to_string()];
        args.extend(self.global_args());
        args.extend(strings(&["attach", "-t", session_id]));
        args
    }
}

// ---------------------------------------------------------------------------
// Command builder
// ---------------------------------------------------------------------------

/// Builds tmux argument vectors (without server options) without executing them.
pub struct TmuxCommandBuilder;

impl TmuxCommandBuilder {
    pub fn new() -> Self {
        TmuxCommandBuilder
    }

    /// `tmux start ; list-sessions -F <fmt>`. Starting first makes an absent
    /// server report no sessions instead of failing.
    pub fn list_sessions(&self) -> Vec<String> {
        strings(&["start", ";", "list-sessions", "-F", SESSION_FORMAT])
    }

    /// `tmux new-session -d -P -F <fmt> -s <name> [-c <dir>]`
    pub fn new_session(&self, name: &str, dir: Option<&Path>) -> Vec<String> {
        let mut args = strings(&["new-session", "-d", "-P", "-F", SESSION_FORMAT, "-s", name]);
        push_dir(&mut args, dir);
        args
    }

    /// `tmux rename-window -t <target> <name>`
    pub fn rename_window(&self, target: &str, name: &str) -> Vec<String> {
        strings(&["rename-window", "-t", target, name])
    }

    /// `tmux move-window -s <window> (-b|-a) -t <anchor>`
    pub fn move_window(&self, window_id: &str, target: &WindowTarget) -> Vec<String> {
        let mut args = strings(&["move-window", "-s", window_id]);
        args.extend(target_args(target));
        args
    }

    /// `tmux new-window -P -F <fmt> -n <name> (-b|-a) -t <anchor> [-c <dir>]`
    pub fn new_window(&self, target: &WindowTarget, name: &str, dir: Option<&Path>) -> Vec<String> {
        let mut args = strings(&["new-window", "-P", "-F", WINDOW_FORMAT, "-n", name]);
        args.extend(target_args(target));
        push_dir(&mut args, dir);
        args
    }

    /// `tmux list-windows -t <session> -F <fmt>`
    pub fn list_windows(&self, session_id: &str) -> Vec<String> {
        strings(&["list-windows", "-t", session_id, "-F", WINDOW_FORMAT])
    }

    /// `tmux list-panes -t <target> -F <fmt>`
    pub fn list_panes(&self, target: &str) -> Vec<String> {
        strings(&["list-panes", "-t", target, "-F", PANE_FORMAT])
    }

    /// `tmux select-pane -t <pane> -T <title>`
    pub fn rename_pane(&self, pane_id: &str, title: &str) -> Vec<String> {
        strings(&["select-pane", "-t", pane_id, "-T", title])
    }

    /// `tmux split-window (-h|-v) -t <window> -P -F <fmt> [-c <dir>]`
    pub fn split_window(
        &self,
        window_id: &str,
        direction: SplitDirection,
        dir: Option<&Path>,
    ) -> Vec<String> {
        let flag = match direction {
            SplitDirection::Horizontal => "-h",
            SplitDirection::Vertical => "-v",
        };
        let mut args = strings(&["split-window", flag, "-t", window_id, "-P", "-F", PANE_FORMAT]);
        push_dir(&mut args, dir);
        args
    }

    /// `tmux send-keys -t <target> -l <text>\n`
    pub fn send_keys(&self, target: &str, text: &str) -> Vec<String> {
        vec![
            "send-keys".to_string(),
            "-t".to_string(),
            target.to_string(),
            "-l".to_string(),
            format!("{}\n", text),
        ]
    }

    /// `tmux select-window -t <window>`
    pub fn select_window(&self, window_id: &str) -> Vec<String> {
        strings(&["select-window", "-t", window_id])
    }

    /// `tmux kill-session -t <session>`
    pub fn kill_session(&self, session_id: &str) -> Vec<String> {
        strings(&["kill-session", "-t", session_id])
    }

    pub fn kill_server(&self) -> Vec<String> {
        strings(&["kill-server"])
    }

    /// `tmux capture-pane -p -t <pane>`
    pub fn capture_pane(&self, pane_id: &str) -> Vec<String> {
        strings(&["capture-pane", "-p", "-t", pane_id])
    }

    /// `tmux display-message -p -t <session> #{window_index}`
    pub fn current_window_index(&self, session_id: &str) -> Vec<String> {
        strings(&["display-message", "-p", "-t", session_id, "#{window_index}"])
    }

    /// `tmux list-panes -a -F <fmt>`
    pub fn window_and_pane_names(&self) -> Vec<String> {
        strings(&["list-panes", "-a", "-F", WINDOW_PANE_NAMES_FORMAT])
    }
}

impl Default for TmuxCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn push_dir(args: &mut Vec<String>, dir: Option<&Path>) {
    if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
        args.push("-c".to_string());
        args.push(dir.to_string_lossy().into_owned());
    }
}

fn target_args(target: &WindowTarget) -> Vec<String> {
    let flag = match target.placement {
        Placement::Before => "-b",
        Placement::After => "-a",
    };
    strings(&[flag, "-t", &target.window_id])
}

// ---------------------------------------------------------------------------
// Output parsers
// ---------------------------------------------------------------------------

fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^"[^"]*"(?::"[^"]*")*$"#).expect("valid record pattern"))
}

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("valid field pattern"))
}

fn layout_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+),(\d+),(\d+),(\d+)$").expect("valid layout pattern"))
}

/// Split one quoted record into exactly `fields` values.
pub fn parse_record(line: &str, fields: usize) -> Result<Vec<String>> {
    if !record_pattern().is_match(line) {
        return Err(MuxifyError::protocol(line));
    }
    let values: Vec<String> = field_pattern()
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect();
    if values.len() != fields {
        return Err(MuxifyError::protocol(line));
    }
    Ok(values)
}

/// Parse every non-empty line of `output` as a record of `fields` values.
pub fn parse_records(output: &str, fields: usize) -> Result<Vec<Vec<String>>> {
    output
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(|l| parse_record(l, fields))
        .collect()
}

/// Parse `top,bottom,left,right`.
pub fn parse_layout(input: &str) -> Result<PaneLayout> {
    let caps = layout_pattern()
        .captures(input)
        .ok_or_else(|| MuxifyError::protocol(input))?;
    let number = |i: usize| -> Result<u32> {
        caps[i].parse::<u32>().map_err(|_| MuxifyError::protocol(input))
    };
    Ok(PaneLayout {
        top: number(1)?,
        bottom: number(2)?,
        left: number(3)?,
        right: number(4)?,
    })
}

pub fn parse_sessions(output: &str) -> Result<Vec<Session>> {
    parse_records(output, 2)?
        .into_iter()
        .map(|mut r| {
            let name = r.pop().unwrap_or_default();
            let id = r.pop().unwrap_or_default();
            Ok(Session { id, name })
        })
        .collect()
}

pub fn parse_windows(output: &str) -> Result<Vec<LiveWindow>> {
    parse_records(output, 3)?
        .into_iter()
        .map(|r| {
            let index = r[2]
                .parse::<u32>()
                .map_err(|_| MuxifyError::protocol(r.join(":")))?;
            Ok(LiveWindow {
                id: r[0].clone(),
                name: r[1].clone(),
                index,
            })
        })
        .collect()
}

pub fn parse_panes(output: &str) -> Result<Vec<Pane>> {
    parse_records(output, 3)?
        .into_iter()
        .map(|r| {
            Ok(Pane {
                id: r[0].clone(),
                title: r[1].clone(),
                layout: parse_layout(&r[2])?,
            })
        })
        .collect()
}

fn single<T>(mut items: Vec<T>, output: &str) -> Result<T> {
    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Err(MuxifyError::protocol(output.trim_end()))
    }
}

// ---------------------------------------------------------------------------
// TmuxClient (Multiplexer implementation)
// ---------------------------------------------------------------------------

/// Drives a tmux server through its command-line interface.
pub struct TmuxClient<R: CommandRunner = ProcessRunner> {
    server: TmuxServer,
    builder: TmuxCommandBuilder,
    runner: R,
}

impl TmuxClient<ProcessRunner> {
    pub fn new(server: TmuxServer) -> Self {
        Self::with_runner(server, ProcessRunner::new())
    }
}

impl<R: CommandRunner> TmuxClient<R> {
    pub fn with_runner(server: TmuxServer, runner: R) -> Self {
        TmuxClient {
            server,
            builder: TmuxCommandBuilder::new(),
            runner,
        }
    }

    pub fn server(&self) -> &TmuxServer {
        &self.server
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, command: Vec<String>) -> Result<String> {
        let args = self.server.command_line(command);
        if self.server.verbosity.is_verbose() {
            debug!(?args, "running tmux command");
        } else {
            trace!(?args, "running tmux command");
        }
        self.runner.run(&args)
    }

    /// Run an arbitrary tmux command against this server.
    pub fn command(&self, args: &[&str]) -> Result<String> {
        self.run(strings(args))
    }

    pub fn kill_session(&self, session_id: &str) -> Result<()> {
        self.run(self.builder.kill_session(session_id)).map(drop)
    }

    pub fn kill_server(&self) -> Result<()> {
        self.run(self.builder.kill_server()).map(drop)
    }

    /// Visible content of a pane.
    pub fn capture_pane(&self, pane_id: &str) -> Result<String> {
        self.run(self.builder.capture_pane(pane_id))
    }

    pub fn current_window_index(&self, session_id: &str) -> Result<u32> {
        let output = self.run(self.builder.current_window_index(session_id))?;
        output
            .trim()
            .parse::<u32>()
            .map_err(|_| MuxifyError::protocol(output.trim_end()))
    }

    /// `(window name, pane title)` for every pane on the server.
    pub fn window_and_pane_names(&self) -> Result<Vec<(String, String)>> {
        let output = self.run(self.builder.window_and_pane_names())?;
        Ok(parse_records(&output, 2)?
            .into_iter()
            .map(|r| (r[0].clone(), r[1].clone()))
            .collect())
    }
}

impl<R: CommandRunner> Multiplexer for TmuxClient<R> {
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let output = self.run(self.builder.list_sessions())?;
        parse_sessions(&output)
    }

    fn start_session(&self, name: &str, dir: Option<&Path>) -> Result<Session> {
        let output = self.run(self.builder.new_session(name, dir))?;
        single(parse_sessions(&output)?, &output)
    }

    fn rename_window(&self, target: &str, name: &str) -> Result<()> {
        self.run(self.builder.rename_window(target, name)).map(drop)
    }

    fn move_window(&self, window_id: &str, target: &WindowTarget) -> Result<()> {
        self.run(self.builder.move_window(window_id, target)).map(drop)
    }

    fn create_window(
        &self,
        target: &WindowTarget,
        name: &str,
        dir: Option<&Path>,
    ) -> Result<LiveWindow> {
        let output = self.run(self.builder.new_window(target, name, dir))?;
        single(parse_windows(&output)?, &output)
    }

    fn list_windows(&self, session_id: &str) -> Result<Vec<LiveWindow>> {
        let output = self.run(self.builder.list_windows(session_id))?;
        parse_windows(&output)
    }

    fn list_panes(&self, target: &str) -> Result<Vec<Pane>> {
        let output = self.run(self.builder.list_panes(target))?;
        parse_panes(&output)
    }

    fn rename_pane(&self, pane_id: &str, title: &str) -> Result<()> {
        self.run(self.builder.rename_pane(pane_id, title)).map(drop)
    }

    fn split_window(
        &self,
        window_id: &str,
        direction: SplitDirection,
        dir: Option<&Path>,
    ) -> Result<Pane> {
        let output = self.run(self.builder.split_window(window_id, direction, dir))?;
        single(parse_panes(&output)?, &output)
    }

    fn send_keys(&self, target: &str, text: &str) -> Result<()> {
        self.run(self.builder.send_keys(target, text)).map(drop)
    }

    fn select_window(&self, window_id: &str) -> Result<()> {
        self.run(self.builder.select_window(window_id)).map(drop)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::runner::MockRunner;

    fn client(responses: Vec<std::result::Result<String, String>>) -> TmuxClient<MockRunner> {
        TmuxClient::with_runner(TmuxServer::new(), MockRunner::with_responses(responses))
    }

    fn window(id: &str) -> LiveWindow {
        LiveWindow {
            id: id.into(),
            name: "w".into(),
            index: 0,
        }
    }

    // -- Server options --

    #[test]
    fn default_server_has_no_global_args() {
        assert!(TmuxServer::new().global_args().is_empty());
    }

    #[test]
    fn server_global_args() {
        let server = TmuxServer::new()
            .with_socket_name("test-socket")
            .with_config_file("/tmp/tmux.conf");
        assert_eq!(
            server.command_line(strings(&["kill-server"])),
            vec!["-L", "test-socket", "-f", "/tmp/tmux.conf", "kill-server"]
        );
    }

    #[test]
    fn server_control_mode_args() {
        let server = TmuxServer::new().with_socket_name("s");
        assert_eq!(
            server.control_mode_args("$3"),
            vec!["-C", "-L", "s", "attach", "-t", "$3"]
        );
    }

    // -- Command builder --

    #[test]
    fn cmd_list_sessions_starts_server_first() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.list_sessions();
        assert_eq!(&cmd[..3], &["start", ";", "list-sessions"]);
        assert_eq!(cmd.last().unwrap(), SESSION_FORMAT);
    }

    #[test]
    fn cmd_new_session() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.new_session("work", Some(Path::new("/tmp/proj")));
        assert_eq!(
            cmd,
            vec!["new-session", "-d", "-P", "-F", SESSION_FORMAT, "-s", "work", "-c", "/tmp/proj"]
        );
    }

    #[test]
    fn cmd_new_session_unanchored() {
        let b = TmuxCommandBuilder::new();
        assert!(!b.new_session("work", None).contains(&"-c".to_string()));
        assert!(!b.new_session("work", Some(Path::new(""))).contains(&"-c".to_string()));
    }

    #[test]
    fn cmd_move_window_before() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.move_window("@4", &WindowTarget::before(&window("@1")));
        assert_eq!(cmd, vec!["move-window", "-s", "@4", "-b", "-t", "@1"]);
    }

    #[test]
    fn cmd_new_window_after_with_dir() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.new_window(&WindowTarget::after(&window("@2")), "editor", Some(Path::new("/w")));
        assert_eq!(
            cmd,
            vec!["new-window", "-P", "-F", WINDOW_FORMAT, "-n", "editor", "-a", "-t", "@2", "-c", "/w"]
        );
    }

    #[test]
    fn cmd_split_horizontal() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.split_window("@1", SplitDirection::Horizontal, None);
        assert_eq!(cmd, vec!["split-window", "-h", "-t", "@1", "-P", "-F", PANE_FORMAT]);
    }

    #[test]
    fn cmd_split_vertical() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.split_window("@1", SplitDirection::Vertical, Some(Path::new("/w/sub")));
        assert_eq!(cmd[1], "-v");
        assert_eq!(&cmd[cmd.len() - 2..], &["-c", "/w/sub"]);
    }

    #[test]
    fn cmd_send_keys_is_literal_with_newline() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.send_keys("%3", "echo \"Foo\"");
        assert_eq!(cmd, vec!["send-keys", "-t", "%3", "-l", "echo \"Foo\"\n"]);
    }

    #[test]
    fn cmd_rename_pane() {
        let b = TmuxCommandBuilder::new();
        assert_eq!(
            b.rename_pane("%1", "editor"),
            vec!["select-pane", "-t", "%1", "-T", "editor"]
        );
    }

    #[test]
    fn cmd_rename_and_select_window() {
        let b = TmuxCommandBuilder::new();
        assert_eq!(b.rename_window("$1", "main"), vec!["rename-window", "-t", "$1", "main"]);
        assert_eq!(b.select_window("@2"), vec!["select-window", "-t", "@2"]);
    }

    // -- Parser tests --

    #[test]
    fn parse_record_basic() {
        assert_eq!(parse_record(r#""$1":"work""#, 2).unwrap(), vec!["$1", "work"]);
    }

    #[test]
    fn parse_record_keeps_colons_inside_quotes() {
        let fields = parse_record(r#""@1":"a:b":"0""#, 3).unwrap();
        assert_eq!(fields[1], "a:b");
    }

    #[test]
    fn parse_record_allows_empty_field() {
        assert_eq!(parse_record(r#""%1":"""#, 2).unwrap(), vec!["%1", ""]);
    }

    #[test]
    fn parse_record_rejects_unquoted() {
        assert!(matches!(
            parse_record("$1:work", 2),
            Err(MuxifyError::MultiplexerProtocol { .. })
        ));
    }

    #[test]
    fn parse_record_rejects_wrong_field_count() {
        assert!(parse_record(r#""$1":"work":"extra""#, 2).is_err());
        assert!(parse_record(r#""$1""#, 2).is_err());
    }

    #[test]
    fn parse_records_skips_blank_lines() {
        let output = "\"$0\":\"a\"\n\n\"$1\":\"b\"\n";
        assert_eq!(parse_records(output, 2).unwrap().len(), 2);
        assert!(parse_records("", 2).unwrap().is_empty());
    }

    #[test]
    fn parse_sessions_basic() {
        let sessions = parse_sessions("\"$0\":\"main\"\n\"$4\":\"work\"\n").unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1], Session { id: "$4".into(), name: "work".into() });
    }

    #[test]
    fn parse_windows_basic() {
        let windows = parse_windows("\"@1\":\"editor\":\"0\"\n\"@7\":\"server\":\"1\"\n").unwrap();
        assert_eq!(windows[0].name, "editor");
        assert_eq!(windows[1].id, "@7");
        assert_eq!(windows[1].index, 1);
    }

    #[test]
    fn parse_windows_rejects_bad_index() {
        assert!(parse_windows("\"@1\":\"editor\":\"zero\"\n").is_err());
    }

    #[test]
    fn parse_panes_with_layout() {
        let panes = parse_panes("\"%0\":\"editor\":\"0,39,0,59\"\n\"%1\":\"tests\":\"0,39,61,120\"\n").unwrap();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[0].title, "editor");
        assert_eq!(
            panes[1].layout,
            PaneLayout { top: 0, bottom: 39, left: 61, right: 120 }
        );
    }

    #[test]
    fn parse_panes_rejects_bad_layout() {
        assert!(parse_panes("\"%0\":\"editor\":\"0,39,0\"\n").is_err());
    }

    #[test]
    fn parse_layout_rejects_garbage() {
        assert!(parse_layout("a,b,c,d").is_err());
        assert_eq!(parse_layout("1,2,3,4").unwrap().right, 4);
    }

    // -- Client tests --

    #[test]
    fn client_list_sessions() {
        let c = client(vec![Ok("\"$0\":\"one\"\n".into())]);
        let sessions = c.list_sessions().unwrap();
        assert_eq!(sessions[0].name, "one");
    }

    #[test]
    fn client_list_sessions_empty_when_no_server() {
        let c = client(vec![Ok(String::new())]);
        assert!(c.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn client_list_sessions_protocol_error() {
        let c = client(vec![Ok("no quotes here\n".into())]);
        assert!(matches!(
            c.list_sessions(),
            Err(MuxifyError::MultiplexerProtocol { .. })
        ));
    }

    #[test]
    fn client_start_session_returns_record() {
        let c = client(vec![Ok("\"$5\":\"proj\"\n".into())]);
        let session = c.start_session("proj", Some(Path::new("/w"))).unwrap();
        assert_eq!(session.id, "$5");
        let cmd = c.runner().last_command().unwrap();
        assert!(cmd.starts_with("new-session -d -P -F"));
        assert!(cmd.ends_with("-s proj -c /w"));
    }

    #[test]
    fn client_start_session_requires_one_record() {
        let c = client(vec![Ok(String::new())]);
        assert!(c.start_session("proj", None).is_err());
    }

    #[test]
    fn client_create_window_returns_record() {
        let c = client(vec![Ok("\"@9\":\"logs\":\"2\"\n".into())]);
        let w = c.create_window(&WindowTarget::after(&window("@1")), "logs", None).unwrap();
        assert_eq!(w, LiveWindow { id: "@9".into(), name: "logs".into(), index: 2 });
    }

    #[test]
    fn client_split_window_returns_pane() {
        let c = client(vec![Ok("\"%4\":\"host\":\"0,10,41,80\"\n".into())]);
        let p = c.split_window("@1", SplitDirection::Horizontal, None).unwrap();
        assert_eq!(p.id, "%4");
        assert_eq!(p.layout.left, 41);
    }

    #[test]
    fn client_prefixes_server_options() {
        let server = TmuxServer::new().with_socket_name("sock");
        let c = TmuxClient::with_runner(server, MockRunner::new());
        c.send_keys("%1", "ls").unwrap();
        assert_eq!(
            c.runner().executed_commands()[0],
            vec!["-L", "sock", "send-keys", "-t", "%1", "-l", "ls\n"]
        );
    }

    #[test]
    fn client_propagates_execution_errors() {
        let c = client(vec![Err("can't find window: @9".into())]);
        let err = c.select_window("@9").unwrap_err();
        assert!(matches!(err, MuxifyError::MultiplexerExecution { .. }));
    }

    #[test]
    fn client_current_window_index() {
        let c = client(vec![Ok("0\n".into())]);
        assert_eq!(c.current_window_index("$1").unwrap(), 0);
        let c = client(vec![Ok("x\n".into())]);
        assert!(c.current_window_index("$1").is_err());
    }

    #[test]
    fn client_window_and_pane_names() {
        let c = client(vec![Ok("\"W1\":\"P1\"\n\"W1\":\"P2\"\n".into())]);
        assert_eq!(
            c.window_and_pane_names().unwrap(),
            vec![("W1".to_string(), "P1".to_string()), ("W1".to_string(), "P2".to_string())]
        );
    }

    #[test]
    fn client_raw_command() {
        let server = TmuxServer::new().with_config_file("/tmp/t.conf");
        let c = TmuxClient::with_runner(server, MockRunner::with_responses(vec![Ok("3.4\n".into())]));
        assert_eq!(c.command(&["display-message", "-p", "#{version}"]).unwrap(), "3.4\n");
        assert_eq!(
            c.runner().last_command().as_deref(),
            Some("-f /tmp/t.conf display-message -p #{version}")
        );
    }

    #[test]
    fn client_kill_commands() {
        let c = client(vec![]);
        c.kill_session("$2").unwrap();
        c.kill_server().unwrap();
        let cmds = c.runner().executed_commands();
        assert_eq!(cmds[0], vec!["kill-session", "-t", "$2"]);
        assert_eq!(cmds[1], vec!["kill-server"]);
    }
}
