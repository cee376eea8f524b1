//! Script gateway: the host's only way into the content runtime.
//!
//! The embedding shell implements [`ScriptHost`] over whatever web view it
//! uses; [`ScriptGateway`] wraps it with the bridge's degradation policy.
//! Callers never see an evaluation error: failures are logged and resolve to
//! the empty string, which means "no usable result" rather than a
//! distinguishable error value. Each call is a single attempt; there are no
//! retries and no timeout, so a hung evaluation hangs whatever awaits it.

use vellum_bridge_core::Point;

/// Underlying script evaluation failed in the content runtime.
#[derive(Debug, thiserror::Error)]
#[error("script evaluation failed: {0}")]
pub struct ScriptError(pub String);

/// Asynchronous script execution against the embedded content runtime.
///
/// Implementations must resolve on the bridge's coordination context; the
/// bridge never evaluates concurrently with itself from multiple threads.
#[allow(async_fn_in_trait)]
pub trait ScriptHost {
    /// Evaluate a single statement and return its textual result.
    async fn evaluate(&self, script: &str) -> Result<String, ScriptError>;
}

/// Native scroll surface hosting the web content.
///
/// Caret visibility needs the current scroll position and an animated
/// mutator; both are host capabilities, not script calls.
pub trait ScrollHost {
    /// Current scroll offset of the surface.
    fn scroll_offset(&self) -> Point;

    /// Scroll the surface to `offset`, animating when asked to.
    fn scroll_to(&self, offset: Point, animated: bool);
}

/// Wraps a [`ScriptHost`] with logging and empty-string degradation.
pub struct ScriptGateway<H> {
    host: H,
}

impl<H: ScriptHost> ScriptGateway<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Access the wrapped host for its non-script capabilities.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Evaluate `script`, resolving to `""` on failure.
    pub async fn run(&self, script: &str) -> String {
        match self.host.evaluate(script).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("{err} (script: {script})");
                String::new()
            }
        }
    }
}
