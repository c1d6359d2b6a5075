#![forbid(unsafe_code)]

//! Seams to the drag engine, the DOM and the host's render cycle.
//!
//! The host layer never touches a real engine or document. It talks to
//! them through these traits, and `hubsort-harness` provides in-memory
//! implementations of every one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hubsort_core::{
    EngineEventKind, InputEvent, MoveEvent, MoveResult, OptionName, OptionValue, SortableEvent,
    SortableOptions,
};

/// Handler for every callback except `move`.
pub type EventCallback<N> = Rc<dyn Fn(&SortableEvent<N>)>;

/// Handler for `move`; its answer steers the engine.
pub type MoveCallback<N> = Rc<dyn Fn(&MoveEvent<N>, &InputEvent) -> MoveResult>;

/// The engine's twelve callback slots.
pub struct EngineCallbacks<N> {
    pub on_add: Option<EventCallback<N>>,
    pub on_remove: Option<EventCallback<N>>,
    pub on_update: Option<EventCallback<N>>,
    pub on_start: Option<EventCallback<N>>,
    pub on_end: Option<EventCallback<N>>,
    pub on_sort: Option<EventCallback<N>>,
    pub on_filter: Option<EventCallback<N>>,
    pub on_change: Option<EventCallback<N>>,
    pub on_choose: Option<EventCallback<N>>,
    pub on_unchoose: Option<EventCallback<N>>,
    pub on_clone: Option<EventCallback<N>>,
    pub on_move: Option<MoveCallback<N>>,
}

impl<N> Default for EngineCallbacks<N> {
    fn default() -> Self {
        Self {
            on_add: None,
            on_remove: None,
            on_update: None,
            on_start: None,
            on_end: None,
            on_sort: None,
            on_filter: None,
            on_change: None,
            on_choose: None,
            on_unchoose: None,
            on_clone: None,
            on_move: None,
        }
    }
}

impl<N> Clone for EngineCallbacks<N> {
    fn clone(&self) -> Self {
        Self {
            on_add: self.on_add.clone(),
            on_remove: self.on_remove.clone(),
            on_update: self.on_update.clone(),
            on_start: self.on_start.clone(),
            on_end: self.on_end.clone(),
            on_sort: self.on_sort.clone(),
            on_filter: self.on_filter.clone(),
            on_change: self.on_change.clone(),
            on_choose: self.on_choose.clone(),
            on_unchoose: self.on_unchoose.clone(),
            on_clone: self.on_clone.clone(),
            on_move: self.on_move.clone(),
        }
    }
}

impl<N> fmt::Debug for EngineCallbacks<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<&str> = EngineEventKind::ALL
            .into_iter()
            .filter(|&kind| self.is_set(kind))
            .map(EngineEventKind::handler_name)
            .collect();
        f.debug_struct("EngineCallbacks")
            .field("installed", &installed)
            .finish()
    }
}

impl<N> EngineCallbacks<N> {
    /// Slot for a non-move event; `None` for [`EngineEventKind::Move`].
    #[must_use]
    pub fn event(&self, kind: EngineEventKind) -> Option<&EventCallback<N>> {
        match kind {
            EngineEventKind::Add => self.on_add.as_ref(),
            EngineEventKind::Remove => self.on_remove.as_ref(),
            EngineEventKind::Update => self.on_update.as_ref(),
            EngineEventKind::Start => self.on_start.as_ref(),
            EngineEventKind::End => self.on_end.as_ref(),
            EngineEventKind::Sort => self.on_sort.as_ref(),
            EngineEventKind::Filter => self.on_filter.as_ref(),
            EngineEventKind::Change => self.on_change.as_ref(),
            EngineEventKind::Choose => self.on_choose.as_ref(),
            EngineEventKind::Unchoose => self.on_unchoose.as_ref(),
            EngineEventKind::Clone => self.on_clone.as_ref(),
            EngineEventKind::Move => None,
        }
    }

    /// Install `callback` in the slot for `kind`. Ignored for `Move`.
    pub fn set_event(&mut self, kind: EngineEventKind, callback: EventCallback<N>) {
        let slot = match kind {
            EngineEventKind::Add => &mut self.on_add,
            EngineEventKind::Remove => &mut self.on_remove,
            EngineEventKind::Update => &mut self.on_update,
            EngineEventKind::Start => &mut self.on_start,
            EngineEventKind::End => &mut self.on_end,
            EngineEventKind::Sort => &mut self.on_sort,
            EngineEventKind::Filter => &mut self.on_filter,
            EngineEventKind::Change => &mut self.on_change,
            EngineEventKind::Choose => &mut self.on_choose,
            EngineEventKind::Unchoose => &mut self.on_unchoose,
            EngineEventKind::Clone => &mut self.on_clone,
            EngineEventKind::Move => return,
        };
        *slot = Some(callback);
    }

    #[must_use]
    pub fn is_set(&self, kind: EngineEventKind) -> bool {
        match kind {
            EngineEventKind::Move => self.on_move.is_some(),
            other => self.event(other).is_some(),
        }
    }

    /// Slot-wise merge: `overlay` wins wherever it is set.
    #[must_use]
    pub fn merged_with(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        for kind in EngineEventKind::ALL {
            if let Some(cb) = overlay.event(kind) {
                merged.set_event(kind, Rc::clone(cb));
            }
        }
        if let Some(cb) = &overlay.on_move {
            merged.on_move = Some(Rc::clone(cb));
        }
        merged
    }
}

/// Everything an engine is created with.
pub struct EngineConfig<N> {
    pub options: SortableOptions,
    pub callbacks: EngineCallbacks<N>,
}

impl<N> fmt::Debug for EngineConfig<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("options", &self.options)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

/// A live drag engine bound to one container.
pub trait DragEngine {
    /// Handle to a DOM node as the engine sees it.
    type Node: Clone + 'static;

    /// Reconfigure one option; `None` restores the engine default.
    fn option(&mut self, name: OptionName, value: Option<OptionValue>);

    /// Options currently in force.
    fn options(&self) -> &SortableOptions;

    /// Detach from the container. Called once.
    fn destroy(&mut self);
}

/// Shared handle to a live engine, as published by the `init` output.
pub type EngineHandle<E> = Rc<RefCell<E>>;

/// Creates engines.
pub trait EngineFactory {
    type Engine: DragEngine;

    /// Whether engines can be created here at all. `false` when rendering
    /// on a server, where there is no document.
    fn is_available(&self) -> bool {
        true
    }

    fn create(
        &self,
        container: &<Self::Engine as DragEngine>::Node,
        config: EngineConfig<<Self::Engine as DragEngine>::Node>,
    ) -> Self::Engine;
}

/// The DOM operations the host layer performs itself.
pub trait DomRenderer<N> {
    fn parent_node(&self, node: &N) -> Option<N>;

    fn remove_child(&self, parent: &N, child: &N);

    /// Insert `node` under `parent` before `reference`, or last if `None`.
    fn insert_before(&self, parent: &N, node: &N, reference: Option<&N>);

    /// First descendant of `root` matching `selector`.
    fn query_selector(&self, root: &N, selector: &str) -> Option<N>;
}

/// Deferral until the host has rendered.
pub trait RenderScheduler {
    fn after_next_render(&self, task: Box<dyn FnOnce()>);
}
