#![forbid(unsafe_code)]

//! Holding back signal notifications until a drag has settled.
//!
//! Moving a row between two signal-backed regions writes twice: the source
//! loses the row, then the destination gains it. A subscriber woken between
//! the two writes would see the row in neither list. While a [`BatchScope`]
//! is open the writes still land, but each subscriber is queued once and
//! runs when the outermost scope closes, reading the settled value.
//!
//! ```ignore
//! let source = Observable::new(vec![1, 2]);
//! let dest = Observable::new(vec![]);
//! {
//!     let _settle = BatchScope::new();
//!     source.set(vec![2]);
//!     dest.set(vec![1]);
//! } // subscribers of both run here, once each
//! ```
//!
//! # Invariants
//!
//! 1. Scopes nest; closing an inner scope delivers nothing.
//! 2. A subscriber queued twice keeps its first position and runs once.
//! 3. Subscribers woken by the delivery itself run in the same delivery.
//!
//! # Failure Modes
//!
//! - **Subscriber panics**: the other queued subscribers still run; the
//!   first panic is resumed once the queue is empty.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use tracing::{debug, debug_span};
use web_time::Instant;

type Wake = Box<dyn FnOnce()>;

struct Queued {
    subscriber: usize,
    wake: Wake,
}

#[derive(Default)]
struct Settle {
    depth: u32,
    queued: Vec<Queued>,
    /// Value-changing writes made since the last delivery.
    writes: u64,
}

thread_local! {
    static SETTLE: RefCell<Option<Settle>> = const { RefCell::new(None) };
}

pub(crate) fn is_batching() -> bool {
    SETTLE.with(|s| s.borrow().is_some())
}

/// Queue `wake` for `subscriber` if a scope is open and count the write.
/// Hands `wake` back when there is no scope.
pub(crate) fn hold(subscriber: usize, wake: Wake) -> Option<Wake> {
    SETTLE.with(|s| {
        let mut guard = s.borrow_mut();
        let Some(settle) = guard.as_mut() else {
            return Some(wake);
        };
        settle.writes = settle.writes.saturating_add(1);
        match settle.queued.iter_mut().find(|q| q.subscriber == subscriber) {
            Some(queued) => queued.wake = wake,
            None => settle.queued.push(Queued { subscriber, wake }),
        }
        None
    })
}

/// Wake every queued subscriber, then any they queued in turn.
fn deliver() -> Option<Box<dyn Any + Send>> {
    let mut first_panic = None;
    loop {
        let (writes, queued) = SETTLE.with(|s| match s.borrow_mut().as_mut() {
            Some(settle) => (
                std::mem::take(&mut settle.writes),
                std::mem::take(&mut settle.queued),
            ),
            None => (0, Vec::new()),
        });
        if queued.is_empty() {
            return first_panic;
        }

        let subscribers = queued.len() as u64;
        let start = Instant::now();
        let _span = debug_span!(
            "hubsort.signal.settle",
            writes,
            subscribers,
            duration_us = tracing::field::Empty
        )
        .entered();
        for q in queued {
            if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(q.wake))
                && first_panic.is_none()
            {
                first_panic = Some(payload);
            }
        }
        let duration_us = start.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        debug!(writes, subscribers, "settled signal subscribers woken");
    }
}

/// Guard holding signal notifications back while it lives.
///
/// [`BatchZone`](crate::BatchZone) opens one around every translated
/// engine callback.
pub struct BatchScope {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        SETTLE.with(|s| {
            s.borrow_mut().get_or_insert_with(Settle::default).depth += 1;
        });
        Self {
            _not_send: std::marker::PhantomData,
        }
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let outermost = SETTLE.with(|s| match s.borrow_mut().as_mut() {
            Some(settle) => {
                settle.depth -= 1;
                settle.depth == 0
            }
            None => false,
        });
        if !outermost {
            return;
        }
        let panicked = deliver();
        SETTLE.with(|s| s.borrow_mut().take());
        if let Some(payload) = panicked {
            std::panic::resume_unwind(payload);
        }
    }
}

impl fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = SETTLE.with(|s| s.borrow().as_ref().map_or(0, |settle| settle.depth));
        f.debug_struct("BatchScope").field("depth", &depth).finish()
    }
}
