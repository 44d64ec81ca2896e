//! Line pipeline over tmux control-mode output.
//!
//! Three stages, each on its own thread, joined by rendezvous channels:
//! raw lines, `%output` events, and reassembled shell output lines. A stage
//! ends when its input closes or when its consumer hangs up.

use std::io::BufRead;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::trace;

/// Control mode escapes CR LF in `%output` data as this literal text.
pub const LINE_BREAK: &str = r"\015\012";

/// One chunk of pane output. `data` is still octal-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    pub pane_id: String,
    pub data: String,
}

fn output_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^%output ([^ ]+) (.*)").expect("valid output pattern"))
}

/// Stream the lines of `reader` until EOF or a read error.
pub fn read_lines<R>(reader: R) -> Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = sync_channel(0);
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        trace!("control mode stream closed");
    });
    rx
}

pub fn parse_output_event(line: &str) -> Option<OutputEvent> {
    output_pattern().captures(line).map(|caps| OutputEvent {
        pane_id: caps[1].to_string(),
        data: caps[2].to_string(),
    })
}

/// Keep only `%output` notifications.
pub fn output_events(lines: Receiver<String>) -> Receiver<OutputEvent> {
    let (tx, rx) = sync_channel(0);
    thread::spawn(move || {
        for line in lines {
            if let Some(event) = parse_output_event(&line) {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Join event data and cut it into lines at `LINE_BREAK`. Output from all
/// panes shares one buffer. Whatever is left when the events end is flushed
/// as lines too.
pub fn output_lines(events: Receiver<OutputEvent>) -> Receiver<String> {
    let (tx, rx) = sync_channel(0);
    thread::spawn(move || {
        let mut buffer = String::new();
        for event in events {
            buffer.push_str(&event.data);
            while let Some(end) = buffer.find(LINE_BREAK) {
                let line = decode_octal_escapes(&buffer[..end]);
                buffer.drain(..end + LINE_BREAK.len());
                if tx.send(line).is_err() {
                    return;
                }
            }
        }
        for rest in buffer.split(LINE_BREAK).filter(|l| !l.is_empty()) {
            if tx.send(decode_octal_escapes(rest)).is_err() {
                return;
            }
        }
    });
    rx
}

/// Decode `\ooo` escapes into raw bytes. Consecutive escapes may form one
/// UTF-8 character; invalid sequences are replaced.
pub fn decode_octal_escapes(input: &str) -> String {
    let src = input.as_bytes();
    let mut out = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        if src[i] == b'\\' && i + 3 < src.len() {
            let digits = &src[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(src[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Wait up to `timeout` for a line satisfying `accept`, discarding others.
pub fn wait_for_line<F>(lines: &Receiver<String>, timeout: Duration, accept: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match lines.recv_timeout(remaining) {
            Ok(line) if accept(&line) => return Some(line),
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
        }
    }
}
