//! Command grammar for the content → host notification channel.
//!
//! The embedded editor cannot call host code directly. Instead it queues
//! command strings and triggers a navigation to a reserved pseudo-scheme URL;
//! the host intercepts that navigation, fetches the queue as a JSON array of
//! strings, and interprets each entry by prefix.

use smol_str::SmolStr;

/// Reserved URL scheme the content side navigates to when its command queue
/// has entries. The URL carries no payload; the queue is fetched separately.
pub const CALLBACK_SCHEME: &str = "vellum-callback://";

const ACTION_MARKER: &str = "action/";

/// A single command dequeued from the content side.
///
/// Commands are matched by prefix, so the content side is free to append
/// trailing detail the host ignores. Unknown prefixes parse to `None` and
/// are dropped without logging; they are a forward-compatible no-op, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Editor document finished loading; the host should flush mirrored state.
    Ready,
    /// User edited the document.
    Input,
    /// Content dimensions may have changed; refresh the published height.
    UpdateHeight,
    /// Editor gained focus.
    Focus,
    /// Editor lost focus.
    Blur,
    /// Content-defined custom action, identified by free-form name.
    Action(SmolStr),
}

impl Command {
    /// Parse a raw command string by prefix.
    ///
    /// For `action/` commands the payload is the raw string with the first
    /// occurrence of the marker removed, so `action/foo/bar` yields
    /// `foo/bar` verbatim.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.starts_with("ready") {
            Some(Self::Ready)
        } else if raw.starts_with("input") {
            Some(Self::Input)
        } else if raw.starts_with("updateHeight") {
            Some(Self::UpdateHeight)
        } else if raw.starts_with("focus") {
            Some(Self::Focus)
        } else if raw.starts_with("blur") {
            Some(Self::Blur)
        } else if raw.starts_with(ACTION_MARKER) {
            Some(Self::Action(SmolStr::from(raw.replacen(ACTION_MARKER, "", 1))))
        } else {
            None
        }
    }
}

/// Decode a fetched command queue into raw command strings.
///
/// Decoding is total: anything other than a JSON array of strings (wrong
/// shape, invalid JSON, empty script result) logs a warning and yields an
/// empty queue. No partial-parse recovery is attempted.
pub fn decode_command_queue(json: &str) -> Vec<SmolStr> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(entries) => entries.into_iter().map(SmolStr::from).collect(),
        Err(err) => {
            tracing::warn!("discarding malformed command queue: {err}");
            Vec::new()
        }
    }
}
