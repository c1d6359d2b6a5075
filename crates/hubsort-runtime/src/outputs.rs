#![forbid(unsafe_code)]

//! Outward notifications of a sortable region.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use hubsort_core::{EngineEventKind, MovePayload, SortableEvent};

use crate::engine::{DragEngine, EngineHandle};
use crate::reactive::Subscription;

type ListenerRc<E> = Rc<dyn Fn(&E)>;

/// Multicast notification source.
///
/// Listeners are held weakly; dropping the [`Subscription`] returned by
/// [`EventEmitter::subscribe`] detaches the listener.
pub struct EventEmitter<E> {
    listeners: RefCell<Vec<Weak<dyn Fn(&E)>>>,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl<E: 'static> EventEmitter<E> {
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let strong: ListenerRc<E> = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::holding(Box::new(strong))
    }

    /// Deliver `event` to every live listener, in subscription order.
    pub fn emit(&self, event: &E) {
        let live: Vec<ListenerRc<E>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener(event);
        }
    }

    /// Listeners still attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// The thirteen outputs of a region: `init` plus one per engine callback.
pub struct SortableOutputs<E: DragEngine> {
    /// Fired once with the engine handle when the engine is created.
    pub init: EventEmitter<EngineHandle<E>>,
    pub add: EventEmitter<SortableEvent<E::Node>>,
    pub remove: EventEmitter<SortableEvent<E::Node>>,
    pub update: EventEmitter<SortableEvent<E::Node>>,
    pub start: EventEmitter<SortableEvent<E::Node>>,
    pub end: EventEmitter<SortableEvent<E::Node>>,
    pub sort: EventEmitter<SortableEvent<E::Node>>,
    pub filter: EventEmitter<SortableEvent<E::Node>>,
    pub change: EventEmitter<SortableEvent<E::Node>>,
    pub choose: EventEmitter<SortableEvent<E::Node>>,
    pub unchoose: EventEmitter<SortableEvent<E::Node>>,
    pub clone: EventEmitter<SortableEvent<E::Node>>,
    /// `move` carries the raw input event too.
    pub moved: EventEmitter<MovePayload<E::Node>>,
}

impl<E: DragEngine> Default for SortableOutputs<E> {
    fn default() -> Self {
        Self {
            init: EventEmitter::default(),
            add: EventEmitter::default(),
            remove: EventEmitter::default(),
            update: EventEmitter::default(),
            start: EventEmitter::default(),
            end: EventEmitter::default(),
            sort: EventEmitter::default(),
            filter: EventEmitter::default(),
            change: EventEmitter::default(),
            choose: EventEmitter::default(),
            unchoose: EventEmitter::default(),
            clone: EventEmitter::default(),
            moved: EventEmitter::default(),
        }
    }
}

impl<E: DragEngine> fmt::Debug for SortableOutputs<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableOutputs").finish_non_exhaustive()
    }
}

impl<E: DragEngine> SortableOutputs<E> {
    /// Emitter for a non-move callback; `None` for [`EngineEventKind::Move`].
    #[must_use]
    pub fn event(&self, kind: EngineEventKind) -> Option<&EventEmitter<SortableEvent<E::Node>>> {
        Some(match kind {
            EngineEventKind::Add => &self.add,
            EngineEventKind::Remove => &self.remove,
            EngineEventKind::Update => &self.update,
            EngineEventKind::Start => &self.start,
            EngineEventKind::End => &self.end,
            EngineEventKind::Sort => &self.sort,
            EngineEventKind::Filter => &self.filter,
            EngineEventKind::Change => &self.change,
            EngineEventKind::Choose => &self.choose,
            EngineEventKind::Unchoose => &self.unchoose,
            EngineEventKind::Clone => &self.clone,
            EngineEventKind::Move => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emits_in_subscription_order() {
        let emitter = EventEmitter::<u8>::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _a = emitter.subscribe(move |v| l.borrow_mut().push(("a", *v)));
        let l = Rc::clone(&log);
        let _b = emitter.subscribe(move |v| l.borrow_mut().push(("b", *v)));

        emitter.emit(&3);
        assert_eq!(*log.borrow(), vec![("a", 3), ("b", 3)]);
    }

    #[test]
    fn dropped_subscription_detaches() {
        let emitter = EventEmitter::<u8>::default();
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let sub = emitter.subscribe(move |_| h.set(h.get() + 1));
        emitter.emit(&1);
        assert_eq!(emitter.listener_count(), 1);
        drop(sub);
        emitter.emit(&2);
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }
}
