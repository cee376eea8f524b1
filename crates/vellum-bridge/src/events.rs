//! Host-facing notifications from the bridge.

/// Decision for an intercepted navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Allow,
    Cancel,
}

/// How a navigation request originated, as reported by the web view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// The user activated a link inside the content.
    LinkActivated,
    /// Anything else (initial load, reload, script-driven, ...).
    Other,
}

/// Observer for bridge notifications.
///
/// Every method has a no-op default, so implementors opt into exactly the
/// notifications they care about; an unimplemented method is not an error.
/// All methods are invoked on the bridge's coordination context.
pub trait EditorEvents {
    /// The first `ready` handshake completed; the editor accepts input.
    fn on_ready(&self) {}

    /// The document HTML changed; `html` is the freshly fetched content.
    fn on_content_changed(&self, _html: &str) {}

    /// The observed content height changed. Fires only on an actual change.
    fn on_height_changed(&self, _height: i32) {}

    /// The editor gained focus.
    fn on_took_focus(&self) {}

    /// The editor lost focus.
    fn on_lost_focus(&self) {}

    /// A content-defined `action/<name>` command arrived.
    fn on_custom_action(&self, _name: &str) {}

    /// The user activated a link; decide whether the web view may follow it.
    /// Returning `None` defaults the policy to [`NavigationPolicy::Allow`].
    fn should_open_link(&self, _url: &str) -> Option<NavigationPolicy> {
        None
    }
}

/// Observer that ignores everything. Useful for headless embeddings.
pub struct NullEvents;

impl EditorEvents for NullEvents {}
