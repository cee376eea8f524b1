//! Fan-out / fan-in coordination for independent asynchronous probes.
//!
//! [`join`] hands out `N` completion slots and runs a single continuation
//! once every slot has been signaled. Each call is independent: nothing is
//! shared across joins, and the request is consumed when the continuation
//! fires. Everything runs on the bridge's single coordination context, so
//! the continuation never executes concurrently with itself.
//!
//! Contract: each slot must be signaled exactly once. Double-signaling is
//! unrepresentable ([`JoinSlot::signal`] consumes the slot); a slot that is
//! dropped without signaling leaves the continuation pending forever, which
//! is a caller bug the coordinator does not try to recover from.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct JoinInner {
    pending: Cell<usize>,
    on_all_done: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// One completion slot of a [`join`] request.
pub struct JoinSlot {
    inner: Rc<JoinInner>,
}

impl JoinSlot {
    /// Mark this slot complete. The last signal runs the continuation
    /// inline, on the signaling context.
    pub fn signal(self) {
        let left = self.inner.pending.get() - 1;
        self.inner.pending.set(left);
        if left == 0 {
            if let Some(done) = self.inner.on_all_done.borrow_mut().take() {
                done();
            }
        }
    }
}

/// Create a join over `N` independent completions.
///
/// Returns the slots to hand to each probe; `on_all_done` runs exactly once,
/// after all of them have signaled, in whatever order they finish. With
/// `N == 0` the continuation runs immediately.
pub fn join<const N: usize>(on_all_done: impl FnOnce() + 'static) -> [JoinSlot; N] {
    if N == 0 {
        on_all_done();
        return std::array::from_fn(|_| unreachable!());
    }
    let inner = Rc::new(JoinInner {
        pending: Cell::new(N),
        on_all_done: RefCell::new(Some(Box::new(on_all_done))),
    });
    std::array::from_fn(|_| JoinSlot {
        inner: Rc::clone(&inner),
    })
}
