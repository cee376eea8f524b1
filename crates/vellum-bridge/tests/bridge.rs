//! End-to-end bridge behavior against a scripted mock host.
//!
//! Every test drives the bridge on a current-thread `LocalSet`, the same
//! single coordination context an embedding would use.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tokio::task::LocalSet;
use vellum_bridge::{
    Command, EditorBridge, EditorEvents, NavigationKind, NavigationPolicy, Point, ScriptError,
    ScriptHost, ScrollHost,
};

// === Mock host ===

#[derive(Clone)]
enum Response {
    Value(&'static str),
    Fail,
    /// Never resolves; models a hung script evaluation.
    Hang,
}

#[derive(Clone, Default)]
struct MockHost {
    inner: Rc<MockHostInner>,
}

#[derive(Default)]
struct MockHostInner {
    responses: RefCell<HashMap<String, Response>>,
    log: RefCell<Vec<String>>,
    offset: Cell<Point>,
    scrolls: RefCell<Vec<(Point, bool)>>,
}

impl MockHost {
    fn respond(&self, script: &str, response: Response) {
        self.inner
            .responses
            .borrow_mut()
            .insert(script.to_string(), response);
    }

    fn log(&self) -> Vec<String> {
        self.inner.log.borrow().clone()
    }

    fn evaluations_of(&self, script: &str) -> usize {
        self.inner.log.borrow().iter().filter(|s| *s == script).count()
    }

    fn scrolls(&self) -> Vec<(Point, bool)> {
        self.inner.scrolls.borrow().clone()
    }
}

impl ScriptHost for MockHost {
    async fn evaluate(&self, script: &str) -> Result<String, ScriptError> {
        self.inner.log.borrow_mut().push(script.to_string());
        let response = self.inner.responses.borrow().get(script).cloned();
        match response {
            Some(Response::Value(value)) => Ok(value.to_string()),
            Some(Response::Fail) => Err(ScriptError("mock failure".into())),
            Some(Response::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(String::new()),
        }
    }
}

impl ScrollHost for MockHost {
    fn scroll_offset(&self) -> Point {
        self.inner.offset.get()
    }

    fn scroll_to(&self, offset: Point, animated: bool) {
        self.inner.scrolls.borrow_mut().push((offset, animated));
    }
}

// === Event recorder ===

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Ready,
    Content(String),
    Height(i32),
    TookFocus,
    LostFocus,
    Action(String),
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<Event>>,
    link_policy: Cell<Option<NavigationPolicy>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl EditorEvents for Recorder {
    fn on_ready(&self) {
        self.events.borrow_mut().push(Event::Ready);
    }

    fn on_content_changed(&self, html: &str) {
        self.events.borrow_mut().push(Event::Content(html.to_string()));
    }

    fn on_height_changed(&self, height: i32) {
        self.events.borrow_mut().push(Event::Height(height));
    }

    fn on_took_focus(&self) {
        self.events.borrow_mut().push(Event::TookFocus);
    }

    fn on_lost_focus(&self) {
        self.events.borrow_mut().push(Event::LostFocus);
    }

    fn on_custom_action(&self, name: &str) {
        self.events.borrow_mut().push(Event::Action(name.to_string()));
    }

    fn should_open_link(&self, _url: &str) -> Option<NavigationPolicy> {
        self.link_policy.get()
    }
}

fn setup() -> (EditorBridge<MockHost>, MockHost, Rc<Recorder>) {
    let host = MockHost::default();
    let recorder = Rc::new(Recorder::default());
    let bridge = EditorBridge::new(host.clone(), recorder.clone() as Rc<dyn EditorEvents>);
    (bridge, host, recorder)
}

/// Run `f` on a fresh `LocalSet` and then drain every task it spawned.
async fn drive<F: Future<Output = ()>>(f: impl FnOnce() -> F) {
    let local = LocalSet::new();
    local.run_until(f()).await;
    local.await;
}

// === Lifecycle ===

#[tokio::test]
async fn ready_handshake_flushes_buffered_state() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Value("42"));

    // Buffered writes: nothing reaches the content side before ready,
    // and only the last content value survives.
    bridge.set_html("<p>draft</p>");
    bridge.set_html("<p>final</p>");
    bridge.set_editable(false);
    bridge.set_placeholder("write here");
    bridge.set_line_height(24);
    assert!(host.log().is_empty());
    assert!(!bridge.is_loaded());

    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Ready) }).await;

    assert!(bridge.is_loaded());

    // Four pushes (in any completion order), then exactly one height probe.
    let log = host.log();
    assert_eq!(log.len(), 5);
    let mut pushes = log[..4].to_vec();
    pushes.sort();
    let mut expected = vec![
        "vellum.setHtml('<p>final</p>');".to_string(),
        "vellum.setContentEditable(false);".to_string(),
        "vellum.setLineHeight('24px');".to_string(),
        "vellum.setPlaceholder('write here');".to_string(),
    ];
    expected.sort();
    assert_eq!(pushes, expected);
    assert_eq!(log[4], "vellum.getClientHeight();");

    // Height publication precedes the ready notification.
    assert_eq!(recorder.events(), vec![Event::Height(42), Event::Ready]);
    assert_eq!(bridge.height(), 42);
}

#[tokio::test]
async fn repeated_ready_is_height_refresh_only() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Value("42"));

    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Ready) }).await;

    host.respond("vellum.getClientHeight();", Response::Value("50"));
    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Ready) }).await;

    // No second handshake: one setHtml total, no second Ready notification.
    assert_eq!(host.evaluations_of("vellum.setHtml('');"), 1);
    assert_eq!(
        recorder.events(),
        vec![Event::Height(42), Event::Ready, Event::Height(50)]
    );
}

#[tokio::test]
async fn setters_push_through_once_loaded() {
    let (bridge, host, _recorder) = setup();
    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Ready) }).await;

    let b = bridge.clone();
    drive(|| async move {
        b.set_placeholder("later");
        b.set_html("<p>live</p>");
    })
    .await;

    assert_eq!(host.evaluations_of("vellum.setPlaceholder('later');"), 1);
    assert_eq!(host.evaluations_of("vellum.setHtml('<p>live</p>');"), 1);
    assert_eq!(bridge.html(), "<p>live</p>");
}

// === Height publication ===

#[tokio::test]
async fn unchanged_height_is_not_republished() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Value("100"));

    let b = bridge.clone();
    drive(|| async move {
        b.dispatch(Command::UpdateHeight);
    })
    .await;
    let b = bridge.clone();
    drive(|| async move {
        b.dispatch(Command::UpdateHeight);
    })
    .await;

    assert_eq!(recorder.events(), vec![Event::Height(100)]);
    assert_eq!(host.evaluations_of("vellum.getClientHeight();"), 2);
}

#[tokio::test]
async fn failed_height_probe_keeps_last_known_value() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Fail);

    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::UpdateHeight) }).await;

    assert_eq!(recorder.events(), vec![]);
    assert_eq!(bridge.height(), 0);
}

// === Input and actions ===

#[tokio::test]
async fn input_syncs_content_then_refreshes_height() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getHtml();", Response::Value("<p>hi</p>"));
    host.respond("vellum.getClientHeight();", Response::Value("400"));
    host.respond("vellum.getLineHeight();", Response::Value("28"));
    host.respond("vellum.getRelativeCaretY();", Response::Value("100"));

    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Input) }).await;

    let events = recorder.events();
    assert!(events.contains(&Event::Content("<p>hi</p>".into())));
    // Height refresh runs only after both the content sync and the caret
    // computation finish, so it is the last event.
    assert_eq!(events.last(), Some(&Event::Height(400)));
    assert_eq!(bridge.html(), "<p>hi</p>");
    // Caret was already visible.
    assert!(host.scrolls().is_empty());
}

#[tokio::test]
async fn action_command_syncs_content_then_notifies() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.getHtml();", Response::Value("<b>q</b>"));

    let b = bridge.clone();
    drive(|| async move { b.dispatch(Command::Action("highlight".into())) }).await;

    assert_eq!(
        recorder.events(),
        vec![
            Event::Content("<b>q</b>".into()),
            Event::Action("highlight".into())
        ]
    );
}

#[tokio::test]
async fn focus_and_blur_notify_directly() {
    let (bridge, _host, recorder) = setup();
    let b = bridge.clone();
    drive(|| async move {
        b.dispatch(Command::Focus);
        b.dispatch(Command::Blur);
    })
    .await;
    assert_eq!(recorder.events(), vec![Event::TookFocus, Event::LostFocus]);
}

// === Caret visibility ===

#[tokio::test]
async fn caret_below_viewport_triggers_animated_scroll() {
    let (bridge, host, _recorder) = setup();
    host.inner.offset.set(Point::new(10.0, 50.0));
    host.respond("vellum.getClientHeight();", Response::Value("400"));
    host.respond("vellum.getLineHeight();", Response::Value("28"));
    host.respond("vellum.getRelativeCaretY();", Response::Value("390"));

    let done = Rc::new(Cell::new(false));
    let b = bridge.clone();
    let d = done.clone();
    drive(|| async move { b.ensure_caret_visible(move || d.set(true)) }).await;

    // (390 + 28) - 400 + 50 = 68; horizontal offset untouched.
    assert_eq!(host.scrolls(), vec![(Point::new(10.0, 68.0), true)]);
    assert!(done.get());
}

#[tokio::test]
async fn line_height_probe_falls_back_to_mirror() {
    let (bridge, host, _recorder) = setup();
    bridge.set_line_height(30);
    host.respond("vellum.getClientHeight();", Response::Value("400"));
    host.respond("vellum.getLineHeight();", Response::Fail);
    host.respond("vellum.getRelativeCaretY();", Response::Value("390"));

    let b = bridge.clone();
    drive(|| async move { b.ensure_caret_visible(|| {}) }).await;

    // (390 + 30) - 400 + 0
    assert_eq!(host.scrolls(), vec![(Point::new(0.0, 20.0), true)]);
}

#[tokio::test]
async fn concurrent_caret_requests_are_dropped() {
    let (bridge, host, _recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Value("400"));
    host.respond("vellum.getLineHeight();", Response::Value("28"));
    host.respond("vellum.getRelativeCaretY();", Response::Hang);

    let first_done = Rc::new(Cell::new(false));
    let second_done = Rc::new(Cell::new(false));

    let local = LocalSet::new();
    local
        .run_until(async {
            let d = first_done.clone();
            bridge.ensure_caret_visible(move || d.set(true));
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }

            // Still in flight: this one is a no-op, not queued.
            let d = second_done.clone();
            bridge.ensure_caret_visible(move || d.set(true));
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        })
        .await;

    assert_eq!(host.evaluations_of("vellum.getRelativeCaretY();"), 1);
    assert!(!first_done.get());
    assert!(!second_done.get());
    assert!(host.scrolls().is_empty());
}

#[tokio::test]
async fn caret_coordinator_accepts_new_requests_after_completion() {
    let (bridge, host, _recorder) = setup();
    host.respond("vellum.getClientHeight();", Response::Value("400"));
    host.respond("vellum.getLineHeight();", Response::Value("28"));
    host.respond("vellum.getRelativeCaretY();", Response::Value("100"));

    for _ in 0..2 {
        let b = bridge.clone();
        drive(|| async move { b.ensure_caret_visible(|| {}) }).await;
    }

    assert_eq!(host.evaluations_of("vellum.getRelativeCaretY();"), 2);
}

// === Navigation ===

#[tokio::test]
async fn callback_scheme_dispatches_queue_and_cancels() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.pollCommands();", Response::Value(r#"["focus","blur"]"#));

    let b = bridge.clone();
    let policy = Rc::new(Cell::new(NavigationPolicy::Allow));
    let p = policy.clone();
    drive(|| async move {
        p.set(
            b.on_navigation_request("vellum-callback://queue", NavigationKind::Other)
                .await,
        );
    })
    .await;

    assert_eq!(policy.get(), NavigationPolicy::Cancel);
    assert_eq!(recorder.events(), vec![Event::TookFocus, Event::LostFocus]);
}

#[tokio::test]
async fn callback_scheme_cancels_even_with_malformed_queue() {
    let (bridge, host, recorder) = setup();
    host.respond("vellum.pollCommands();", Response::Value("not json"));

    let b = bridge.clone();
    let policy = Rc::new(Cell::new(NavigationPolicy::Allow));
    let p = policy.clone();
    drive(|| async move {
        p.set(
            b.on_navigation_request("vellum-callback://queue", NavigationKind::Other)
                .await,
        );
    })
    .await;

    assert_eq!(policy.get(), NavigationPolicy::Cancel);
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn unrecognized_queue_entries_are_skipped() {
    let (bridge, host, recorder) = setup();
    host.respond(
        "vellum.pollCommands();",
        Response::Value(r#"["telemetry","focus"]"#),
    );

    let b = bridge.clone();
    drive(|| async move {
        b.on_navigation_request("vellum-callback://queue", NavigationKind::Other)
            .await;
    })
    .await;

    assert_eq!(recorder.events(), vec![Event::TookFocus]);
}

#[tokio::test]
async fn link_activation_defers_to_observer() {
    let (bridge, _host, recorder) = setup();

    recorder.link_policy.set(Some(NavigationPolicy::Cancel));
    let b = bridge.clone();
    let policy = Rc::new(Cell::new(NavigationPolicy::Allow));
    let p = policy.clone();
    drive(|| async move {
        p.set(
            b.on_navigation_request("https://example.com", NavigationKind::LinkActivated)
                .await,
        );
    })
    .await;
    assert_eq!(policy.get(), NavigationPolicy::Cancel);

    // No observer decision: default allow.
    recorder.link_policy.set(None);
    let b = bridge.clone();
    let p = policy.clone();
    drive(|| async move {
        p.set(
            b.on_navigation_request("https://example.com", NavigationKind::LinkActivated)
                .await,
        );
    })
    .await;
    assert_eq!(policy.get(), NavigationPolicy::Allow);
}

#[tokio::test]
async fn ordinary_navigation_is_allowed() {
    let (bridge, _host, recorder) = setup();
    recorder.link_policy.set(Some(NavigationPolicy::Cancel));

    let b = bridge.clone();
    let policy = Rc::new(Cell::new(NavigationPolicy::Cancel));
    let p = policy.clone();
    drive(|| async move {
        p.set(
            b.on_navigation_request("https://example.com", NavigationKind::Other)
                .await,
        );
    })
    .await;

    // The observer is only consulted for explicit link activations.
    assert_eq!(policy.get(), NavigationPolicy::Allow);
}
