//! Platform-agnostic core of the vellum rich-text editor bridge.
//!
//! The editor itself runs as embedded web content; the native shell talks to
//! it only through asynchronous script evaluation and intercepted navigation
//! events. This crate holds everything about that conversation that does not
//! need a runtime:
//!
//! - `command`: the content → host command grammar and queue decoding
//! - `script`: host → content script-call builders and string escaping
//! - `scroll`: caret visibility arithmetic
//! - `state`: the mirrored editor state record
//!
//! The asynchronous half (gateway, dispatcher, join coordinator) lives in
//! `vellum-bridge`, which re-exports this crate.

pub mod command;
pub mod script;
pub mod scroll;
pub mod state;

pub use command::{CALLBACK_SCHEME, Command, decode_command_queue};
pub use script::{Alignment, escape_js};
pub use scroll::{CaretMetrics, Point, scroll_adjustment};
pub use state::{DEFAULT_LINE_HEIGHT, EditorState};
