//! Observing shell output through tmux control mode.
//!
//! Only used to verify, from the outside, what ran in which pane. Nothing
//! in the convergence engine depends on it.

pub mod control;
pub mod pipeline;

pub use control::ControlMode;
pub use pipeline::{
    decode_octal_escapes, output_events, output_lines, read_lines, wait_for_line, OutputEvent,
};
