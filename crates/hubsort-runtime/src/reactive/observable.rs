#![forbid(unsafe_code)]

//! Signals that can back a sortable region.
//!
//! An [`Observable<Vec<T>>`] answers [`BindingTarget::as_signal`], so a
//! binding treats it as one value: every insert or remove reads the whole
//! vector, splices a copy and writes it back through a single
//! [`SignalOps::set`]. Subscribers hear about each write that changed the
//! value. Inside a [`BatchScope`](super::BatchScope) they hear once, after
//! the gesture has settled.
//!
//! Subscribers are held weakly. A callback lives as long as the
//! [`Subscription`] returned for it.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use hubsort_core::{BindingTarget, SignalOps};
use tracing::{debug, debug_span};
use web_time::Instant;

use super::batch;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    writes: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

/// Shared value that wakes its subscribers when it changes.
///
/// Clones share one value. Writing an equal value is ignored.
pub struct Observable<T> {
    cell: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_tuple("Observable").field(&cell.value).finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Shared {
                value,
                writes: 0,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.cell.borrow().value.clone()
    }

    pub fn set(&self, value: T) {
        {
            let mut cell = self.cell.borrow_mut();
            if cell.value == value {
                return;
            }
            cell.value = value;
            cell.writes += 1;
        }
        self.wake();
    }

    /// Call `listener` after every later change.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Listener<T> = Rc::new(listener);
        self.cell.borrow_mut().listeners.push(Rc::downgrade(&strong));
        Subscription(Box::new(strong))
    }

    /// Writes that changed the value so far.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.cell.borrow().writes
    }

    fn wake(&self) {
        let live: Vec<Listener<T>> = {
            let mut cell = self.cell.borrow_mut();
            cell.listeners.retain(|w| w.strong_count() > 0);
            cell.listeners.iter().filter_map(Weak::upgrade).collect()
        };
        if live.is_empty() {
            return;
        }

        if batch::is_batching() {
            for listener in live {
                let subscriber = Rc::as_ptr(&listener).cast::<()>() as usize;
                let signal = self.clone();
                // A queued listener reads the value at delivery, not now.
                let _ = batch::hold(subscriber, Box::new(move || listener(&signal.get())));
            }
            return;
        }

        let value = self.get();
        let start = Instant::now();
        let _span = debug_span!("hubsort.signal.wake", listeners = live.len()).entered();
        for listener in &live {
            listener(&value);
        }
        debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "signal listeners woken"
        );
    }
}

impl<T: Clone + PartialEq + 'static> SignalOps<T> for Observable<Vec<T>> {
    fn get(&self) -> Vec<T> {
        Observable::get(self)
    }

    fn set(&self, next: Vec<T>) {
        Observable::set(self, next);
    }
}

impl<T: Clone + PartialEq + 'static> BindingTarget<T> for Observable<Vec<T>> {
    fn as_signal(&self) -> Option<&dyn SignalOps<T>> {
        Some(self)
    }
}

/// Keeps a listener attached until dropped.
pub struct Subscription(Box<dyn Any>);

impl Subscription {
    pub(crate) fn holding(keep_alive: Box<dyn Any>) -> Self {
        Self(keep_alive)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
