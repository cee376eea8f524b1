//! Mirrored editor state.
//!
//! The content runtime is the source of truth only after it signals
//! readiness. Until then the host mirrors the intended state here; the
//! bridge flushes the mirror into the document exactly once, on the first
//! `ready` command.

/// Line height the editor document styles itself with before the host
/// configures one.
pub const DEFAULT_LINE_HEIGHT: i32 = 28;

/// Host-side mirror of the embedded editor's state.
///
/// Plain data; all mutation policy (buffer vs. push-through) lives in the
/// bridge that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Whether the first `ready` handshake has completed its transition.
    /// Goes `false` → `true` exactly once.
    pub loaded: bool,
    /// Last known document HTML.
    pub content: String,
    /// Last published content height in pixels.
    pub height: i32,
    /// Whether the document accepts edits.
    pub editable: bool,
    /// Placeholder text shown while the document is empty.
    pub placeholder: String,
    /// Configured line height in pixels.
    pub line_height: i32,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            loaded: false,
            content: String::new(),
            height: 0,
            editable: true,
            placeholder: String::new(),
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}
