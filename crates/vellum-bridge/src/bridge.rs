//! The bridge proper: state mirror, navigation interception, and the
//! command dispatcher state machine.
//!
//! One `EditorBridge` owns the mirrored [`EditorState`] and every flag the
//! asynchronous callback chains touch. All of it lives behind `Rc` with
//! interior mutability and is only ever used from the coordination context
//! (a current-thread `LocalSet`); the futures involved are deliberately
//! `!Send`.
//!
//! Lifecycle: the bridge starts unloaded. Setters called before the content
//! side signals `ready` mutate the mirror only; the first `ready` command
//! flips `loaded` and flushes the mirror into the document exactly once.
//! After that, setters push through as they are called.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smol_str::SmolStr;
use vellum_bridge_core::command::{CALLBACK_SCHEME, Command, decode_command_queue};
use vellum_bridge_core::script::{self, Alignment};
use vellum_bridge_core::scroll::{CaretMetrics, Point, scroll_adjustment};
use vellum_bridge_core::state::EditorState;

use crate::events::{EditorEvents, NavigationKind, NavigationPolicy};
use crate::gateway::{ScriptGateway, ScriptHost, ScrollHost};
use crate::join::{JoinSlot, join};

struct BridgeInner<H> {
    gateway: ScriptGateway<H>,
    state: RefCell<EditorState>,
    /// True while a caret visibility computation is in flight; further
    /// requests are dropped, not queued.
    scroll_in_flight: Cell<bool>,
    events: Rc<dyn EditorEvents>,
}

/// Handle to the bridge. Cheap to clone; all clones share one state mirror.
pub struct EditorBridge<H> {
    inner: Rc<BridgeInner<H>>,
}

impl<H> Clone for EditorBridge<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: ScriptHost + ScrollHost + 'static> EditorBridge<H> {
    pub fn new(host: H, events: Rc<dyn EditorEvents>) -> Self {
        Self {
            inner: Rc::new(BridgeInner {
                gateway: ScriptGateway::new(host),
                state: RefCell::new(EditorState::default()),
                scroll_in_flight: Cell::new(false),
                events,
            }),
        }
    }

    // === Mirrored state ===

    pub fn is_loaded(&self) -> bool {
        self.inner.state.borrow().loaded
    }

    /// Last known document HTML (mirrored, not fetched).
    pub fn html(&self) -> String {
        self.inner.state.borrow().content.clone()
    }

    /// Last published content height.
    pub fn height(&self) -> i32 {
        self.inner.state.borrow().height
    }

    pub fn is_editable(&self) -> bool {
        self.inner.state.borrow().editable
    }

    pub fn placeholder(&self) -> String {
        self.inner.state.borrow().placeholder.clone()
    }

    pub fn line_height(&self) -> i32 {
        self.inner.state.borrow().line_height
    }

    /// Replace the document HTML.
    ///
    /// Before the `ready` handshake this only updates the mirror; the value
    /// is flushed when the content side comes up. Afterwards it is pushed
    /// into the document immediately.
    pub fn set_html(&self, html: impl Into<String>) {
        let html = html.into();
        let loaded = {
            let mut state = self.inner.state.borrow_mut();
            state.content = html.clone();
            state.loaded
        };
        if loaded {
            self.spawn_script(script::set_html(&html));
        }
    }

    pub fn set_editable(&self, editable: bool) {
        let loaded = {
            let mut state = self.inner.state.borrow_mut();
            state.editable = editable;
            state.loaded
        };
        if loaded {
            self.spawn_script(script::set_content_editable(editable));
        }
    }

    pub fn set_placeholder(&self, text: impl Into<String>) {
        let text = text.into();
        let loaded = {
            let mut state = self.inner.state.borrow_mut();
            state.placeholder = text.clone();
            state.loaded
        };
        if loaded {
            self.spawn_script(script::set_placeholder(&text));
        }
    }

    pub fn set_line_height(&self, px: i32) {
        let loaded = {
            let mut state = self.inner.state.borrow_mut();
            state.line_height = px;
            state.loaded
        };
        if loaded {
            self.spawn_script(script::set_line_height(px));
        }
    }

    // === Navigation interception ===

    /// Decide the policy for a navigation request raised by the web view.
    ///
    /// Navigations to the reserved [`CALLBACK_SCHEME`] are the content
    /// side's only way to signal the host: the command queue is fetched and
    /// dispatched, and the navigation itself is always cancelled. User link
    /// activations defer to the observer; everything else is allowed.
    ///
    /// Commands from one queue start handling strictly in array order, but
    /// each may fan out further asynchronous work, so completion across
    /// commands is unordered.
    pub async fn on_navigation_request(&self, url: &str, kind: NavigationKind) -> NavigationPolicy {
        if url.starts_with(CALLBACK_SCHEME) {
            let raw = self.inner.gateway.run(&script::poll_commands()).await;
            for entry in decode_command_queue(&raw) {
                if let Some(command) = Command::parse(&entry) {
                    self.dispatch(command);
                }
            }
            return NavigationPolicy::Cancel;
        }
        if kind == NavigationKind::LinkActivated {
            return self
                .inner
                .events
                .should_open_link(url)
                .unwrap_or(NavigationPolicy::Allow);
        }
        NavigationPolicy::Allow
    }

    // === Command dispatch ===

    /// Interpret one command. Synchronous state transitions happen inline;
    /// anything that needs the content runtime is spawned onto the
    /// coordination context.
    pub fn dispatch(&self, command: Command) {
        tracing::debug!("dispatching {command:?}");
        match command {
            Command::Ready => {
                let first = {
                    let mut state = self.inner.state.borrow_mut();
                    if state.loaded {
                        false
                    } else {
                        state.loaded = true;
                        true
                    }
                };
                if first {
                    self.run_ready_handshake();
                } else {
                    // Repeated ready is a height refresh only; the handshake
                    // never reruns.
                    self.spawn_height_refresh();
                }
            }
            Command::Input => self.handle_input(),
            Command::UpdateHeight => self.spawn_height_refresh(),
            Command::Focus => self.inner.events.on_took_focus(),
            Command::Blur => self.inner.events.on_lost_focus(),
            Command::Action(name) => self.handle_action(name),
        }
    }

    /// Flush the buffered mirror into the freshly loaded document: four
    /// concurrent pushes, then one height probe, then the ready
    /// notification.
    fn run_ready_handshake(&self) {
        let pushes = {
            let state = self.inner.state.borrow();
            [
                script::set_html(&state.content),
                script::set_content_editable(state.editable),
                script::set_line_height(state.line_height),
                script::set_placeholder(&state.placeholder),
            ]
        };
        let bridge = self.clone();
        let slots = join::<4>(move || {
            let after = bridge.clone();
            tokio::task::spawn_local(async move {
                after.refresh_height().await;
                after.inner.events.on_ready();
            });
        });
        for (push, slot) in pushes.into_iter().zip(slots) {
            let bridge = self.clone();
            tokio::task::spawn_local(async move {
                bridge.inner.gateway.run(&push).await;
                slot.signal();
            });
        }
    }

    /// `input`: caret visibility and a content re-fetch run concurrently;
    /// the height refresh waits for both.
    fn handle_input(&self) {
        let bridge = self.clone();
        let [caret_slot, content_slot] = join::<2>(move || bridge.spawn_height_refresh());
        self.ensure_caret_visible(move || caret_slot.signal());
        let bridge = self.clone();
        tokio::task::spawn_local(async move {
            bridge.sync_content().await;
            content_slot.signal();
        });
    }

    fn handle_action(&self, name: SmolStr) {
        let bridge = self.clone();
        tokio::task::spawn_local(async move {
            bridge.sync_content().await;
            bridge.inner.events.on_custom_action(&name);
        });
    }

    /// Fetch the current document HTML into the mirror and notify.
    async fn sync_content(&self) {
        let html = self.inner.gateway.run(&script::get_html()).await;
        self.inner.state.borrow_mut().content = html.clone();
        self.inner.events.on_content_changed(&html);
    }

    // === Height publication ===

    fn spawn_height_refresh(&self) {
        let bridge = self.clone();
        tokio::task::spawn_local(async move {
            bridge.refresh_height().await;
        });
    }

    async fn refresh_height(&self) {
        let result = self.inner.gateway.run(&script::client_height()).await;
        // Unusable probe result keeps the last-known height.
        if let Ok(height) = result.trim().parse::<i32>() {
            self.publish_height(height);
        }
    }

    /// Notify only when the observed height actually differs from the last
    /// published one.
    fn publish_height(&self, height: i32) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.height == height {
                false
            } else {
                state.height = height;
                true
            }
        };
        if changed {
            self.inner.events.on_height_changed(height);
        }
    }

    // === Caret visibility ===

    /// Keep the insertion point inside the visible region.
    ///
    /// Launches three independent probes (client height, line height, caret
    /// Y), joins them, computes a scroll target, and applies it with an
    /// animated scroll before invoking `on_done`.
    ///
    /// At most one computation is in flight at a time: while one is pending,
    /// further calls are dropped outright and their `on_done` is never
    /// invoked. Rapid input bursts shed excess work this way instead of
    /// queuing it.
    pub fn ensure_caret_visible(&self, on_done: impl FnOnce() + 'static) {
        if self.inner.scroll_in_flight.get() {
            return;
        }
        self.inner.scroll_in_flight.set(true);

        let visible = Rc::new(Cell::new(None));
        let line = Rc::new(Cell::new(None));
        let caret = Rc::new(Cell::new(None));

        let bridge = self.clone();
        let (v, l, c) = (Rc::clone(&visible), Rc::clone(&line), Rc::clone(&caret));
        let [visible_slot, line_slot, caret_slot] = join::<3>(move || {
            bridge.apply_caret_scroll(v.get(), l.get(), c.get());
            bridge.inner.scroll_in_flight.set(false);
            on_done();
        });

        self.spawn_probe(script::client_height(), visible, visible_slot);
        self.spawn_probe(script::get_line_height(), line, line_slot);
        self.spawn_probe(script::caret_y(), caret, caret_slot);
    }

    /// Run one integer-valued script probe, park the result, signal the slot.
    fn spawn_probe(&self, probe: String, out: Rc<Cell<Option<i32>>>, slot: JoinSlot) {
        let bridge = self.clone();
        tokio::task::spawn_local(async move {
            let result = bridge.inner.gateway.run(&probe).await;
            out.set(result.trim().parse().ok());
            slot.signal();
        });
    }

    fn apply_caret_scroll(&self, visible: Option<i32>, line: Option<i32>, caret: Option<i32>) {
        // Without a usable viewport or caret reading there is nothing to do;
        // a missing line height falls back to the configured one.
        let (Some(visible_height), Some(caret_y)) = (visible, caret) else {
            return;
        };
        let line_height = line.unwrap_or_else(|| self.inner.state.borrow().line_height);
        let offset = self.inner.gateway.host().scroll_offset();
        let metrics = CaretMetrics {
            visible_height,
            line_height,
            caret_y,
            scroll_y: offset.y,
        };
        if let Some(y) = scroll_adjustment(&metrics) {
            tracing::trace!("scrolling caret into view: y {} -> {y}", offset.y);
            self.inner
                .gateway
                .host()
                .scroll_to(Point::new(offset.x, y), true);
        }
    }

    // === Direct editor commands (host → content) ===

    /// Fetch the document's plain text.
    pub async fn text(&self) -> String {
        self.run(script::get_text()).await
    }

    pub async fn bold(&self) {
        self.run(script::set_bold()).await;
    }

    pub async fn italic(&self) {
        self.run(script::set_italic()).await;
    }

    pub async fn underline(&self) {
        self.run(script::set_underline()).await;
    }

    pub async fn strikethrough(&self) {
        self.run(script::set_strikethrough()).await;
    }

    pub async fn subscript(&self) {
        self.run(script::set_subscript()).await;
    }

    pub async fn superscript(&self) {
        self.run(script::set_superscript()).await;
    }

    pub async fn heading(&self, level: u8) {
        self.run(script::set_heading(level)).await;
    }

    pub async fn indent(&self) {
        self.run(script::indent()).await;
    }

    pub async fn outdent(&self) {
        self.run(script::outdent()).await;
    }

    pub async fn ordered_list(&self) {
        self.run(script::ordered_list()).await;
    }

    pub async fn unordered_list(&self) {
        self.run(script::unordered_list()).await;
    }

    pub async fn blockquote(&self) {
        self.run(script::blockquote()).await;
    }

    pub async fn align(&self, alignment: Alignment) {
        self.run(script::align(alignment)).await;
    }

    pub async fn set_background_color(&self, hex: &str) {
        self.run(script::set_background_color(hex)).await;
    }

    pub async fn set_text_color(&self, hex: &str) {
        self.run(script::set_text_color(hex)).await;
    }

    pub async fn set_selection_color(&self, hex: &str) {
        self.run(script::set_selection_color(hex)).await;
    }

    pub async fn set_font_size(&self, px: i32) {
        self.run(script::set_font_size(px)).await;
    }

    pub async fn insert_image(&self, src: &str, alt: &str) {
        self.run(script::insert_image(src, alt)).await;
    }

    pub async fn insert_link(&self, href: &str, title: &str) {
        self.run(script::insert_link(href, title)).await;
    }

    pub async fn undo(&self) {
        self.run(script::undo()).await;
    }

    pub async fn redo(&self) {
        self.run(script::redo()).await;
    }

    pub async fn focus(&self) {
        self.run(script::focus()).await;
    }

    pub async fn focus_at(&self, point: Point) {
        self.run(script::focus_at(point.x, point.y)).await;
    }

    pub async fn blur(&self) {
        self.run(script::blur()).await;
    }

    /// Whether a non-collapsed selection exists.
    pub async fn has_range_selection(&self) -> bool {
        self.run(script::range_selection_exists()).await == "true"
    }

    /// Whether a selection or caret exists.
    pub async fn has_range_or_caret_selection(&self) -> bool {
        self.run(script::range_or_caret_selection_exists()).await == "true"
    }

    /// Href of the link under the selection, if any.
    pub async fn selected_href(&self) -> Option<String> {
        let href = self.run(script::selected_href()).await;
        if href.is_empty() { None } else { Some(href) }
    }

    async fn run(&self, statement: String) -> String {
        self.inner.gateway.run(&statement).await
    }

    fn spawn_script(&self, statement: String) {
        let bridge = self.clone();
        tokio::task::spawn_local(async move {
            bridge.inner.gateway.run(&statement).await;
        });
    }
}
