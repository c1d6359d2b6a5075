#![forbid(unsafe_code)]

//! One-shot rendezvous between the two halves of a cross-region drop.
//!
//! When an item moves between regions the engine fires `remove` on the
//! source and `add` on the destination. The source holds the values, the
//! destination knows where they go. Whichever side arrives first parks its
//! half in the shared [`HandoffSlot`]; the second side completes the
//! exchange.
//!
//! # Invariants
//!
//! 1. The slot holds at most one half at a time.
//! 2. A completed rendezvous leaves the slot idle before the sink runs.
//! 3. A sink runs at most once.
//!
//! # Failure Modes
//!
//! - **Orphaned half**: a gesture that ends without its matching event
//!   leaves a half parked. [`HandoffSlot::clear`] hands it back so the
//!   owner can dispose of it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hubsort_core::Payload;
use tracing::debug;

/// Destination half: receives the transferred values.
pub type Sink<T> = Box<dyn FnOnce(Payload<T>)>;

enum SlotState<T> {
    Idle,
    Payload(Payload<T>),
    Sink(Sink<T>),
}

/// Half left behind by a gesture that never completed.
pub enum StaleHandoff<T> {
    Payload(Payload<T>),
    Sink(Sink<T>),
}

impl<T> fmt::Debug for StaleHandoff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(payload) => f.debug_tuple("Payload").field(&payload.len()).finish(),
            Self::Sink(_) => f.write_str("Sink(<fn>)"),
        }
    }
}

/// Result of offering or accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendezvous {
    /// This half is parked, waiting for the other.
    Parked,
    /// Both halves met and the sink ran.
    Completed,
}

/// Single-slot handoff channel.
pub struct HandoffSlot<T> {
    state: RefCell<SlotState<T>>,
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self {
            state: RefCell::new(SlotState::Idle),
        }
    }
}

impl<T> fmt::Debug for HandoffSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            SlotState::Idle => "idle",
            SlotState::Payload(_) => "payload",
            SlotState::Sink(_) => "sink",
        };
        f.debug_struct("HandoffSlot").field("state", &state).finish()
    }
}

impl<T: 'static> HandoffSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(*self.state.borrow(), SlotState::Idle)
    }

    /// Source half: supply the extracted values.
    pub fn offer(&self, payload: Payload<T>) -> Rendezvous {
        let previous = self.state.replace(SlotState::Idle);
        match previous {
            SlotState::Sink(sink) => {
                debug!(items = payload.len(), "handoff completed by source");
                sink(payload);
                Rendezvous::Completed
            }
            SlotState::Idle => {
                debug!(items = payload.len(), "handoff payload parked");
                *self.state.borrow_mut() = SlotState::Payload(payload);
                Rendezvous::Parked
            }
            SlotState::Payload(stale) => {
                debug!(dropped = stale.len(), "replacing unclaimed handoff payload");
                *self.state.borrow_mut() = SlotState::Payload(payload);
                Rendezvous::Parked
            }
        }
    }

    /// Destination half: register where the values go.
    ///
    /// A sink already parked is fed an empty payload first.
    pub fn accept(&self, sink: Sink<T>) -> Rendezvous {
        let previous = self.state.replace(SlotState::Idle);
        match previous {
            SlotState::Payload(payload) => {
                debug!(items = payload.len(), "handoff completed by destination");
                sink(payload);
                Rendezvous::Completed
            }
            SlotState::Idle => {
                debug!("handoff sink parked");
                *self.state.borrow_mut() = SlotState::Sink(sink);
                Rendezvous::Parked
            }
            SlotState::Sink(stale) => {
                debug!("releasing unclaimed handoff sink");
                stale(Vec::new());
                // The stale sink may have touched the slot.
                if let Some(displaced) = self.clear() {
                    debug!(?displaced, "discarding half parked by a released sink");
                }
                *self.state.borrow_mut() = SlotState::Sink(sink);
                Rendezvous::Parked
            }
        }
    }

    /// Empty the slot, returning whatever was parked.
    pub fn clear(&self) -> Option<StaleHandoff<T>> {
        match self.state.replace(SlotState::Idle) {
            SlotState::Idle => None,
            SlotState::Payload(payload) => Some(StaleHandoff::Payload(payload)),
            SlotState::Sink(sink) => Some(StaleHandoff::Sink(sink)),
        }
    }
}

/// State shared by every region of one application.
///
/// Each region's host holds an `Rc` to the same service so that a drop
/// can cross regions.
#[derive(Debug)]
pub struct SortableService<T> {
    handoff: HandoffSlot<T>,
}

impl<T: 'static> SortableService<T> {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            handoff: HandoffSlot::new(),
        })
    }

    #[must_use]
    pub fn handoff(&self) -> &HandoffSlot<T> {
        &self.handoff
    }
}
