#![forbid(unsafe_code)]

//! Host layer of one sortable region.
//!
//! A [`SortableDirective`] owns a region's inputs, creates its drag engine
//! once the host has rendered, and translates engine callbacks into data
//! operations on the bound sequences.
//!
//! # Design
//!
//! ```text
//!            choose/start          add | remove | update          end
//!   Idle ───────────────▶ Dragging ─────────────────────▶ Settled ─────▶ Idle
//! ```
//!
//! | callback | data effect                                                  |
//! |----------|--------------------------------------------------------------|
//! | update   | extract at the old index, inject at the new one              |
//! | remove   | extract (or copy, when cloning) and offer to the handoff     |
//! | add      | accept from the handoff and inject at the new index          |
//! | move     | none; the user handler's [`MoveResult`] goes to the engine   |
//! | other    | none                                                         |
//!
//! Bindings are rebuilt from the data input on every event, so swapping
//! the input between gestures needs no bookkeeping.
//!
//! Every callback runs inside the context's [`ExecutionZone`]. The user
//! handler for the event runs first, then the outward notification.
//!
//! # Invariants
//!
//! 1. At most one engine is created per directive, and it is destroyed at
//!    most once.
//! 2. `add` is emitted after the transferred values are injected.
//! 3. The handoff slot is idle after every `end`.
//!
//! # Failure Modes
//!
//! - **Missing container**: logged at `error!`, recorded, and returned
//!   from [`SortableDirective::init`]. No engine is created.
//! - **Binding errors inside a callback**: logged at `error!`. The engine
//!   has no channel to receive them, and the outward notification still
//!   fires.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use hubsort_core::{
    ClonePolicy, EngineEventKind, EventIndexes, GroupOption, InputEvent, MoveEvent, MovePayload,
    MoveResult, OptionName, OptionTypeError, OptionValue, Payload, PullContext,
    SequenceBindingGroup, SortableEvent, SortableOptions,
};
use thiserror::Error;
use tracing::{debug, debug_span, error, warn};

use crate::config::SortableConfig;
use crate::engine::{
    DomRenderer, DragEngine, EngineCallbacks, EngineConfig, EngineFactory, EngineHandle,
    RenderScheduler,
};
use crate::handoff::{Sink, SortableService, StaleHandoff};
use crate::input::SortableInput;
use crate::outputs::SortableOutputs;
use crate::zone::{BatchZone, ExecutionZone, run_in};

/// Node type of the engines a factory creates.
pub type NodeOf<F> = <<F as EngineFactory>::Engine as DragEngine>::Node;

/// Copies an item for a clone drag.
pub type CloneFn<T> = Rc<dyn Fn(&T) -> T>;

/// Where a region is in the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    /// A settle callback arrived; waiting for `end`.
    Settled,
}

/// Why a region could not be set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("container not found with selector: {selector}")]
    ContainerNotFound { selector: String },
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Collaborators shared by every region of an application.
pub struct DirectiveContext<T, F: EngineFactory> {
    pub service: Rc<SortableService<T>>,
    pub factory: Rc<F>,
    pub renderer: Rc<dyn DomRenderer<NodeOf<F>>>,
    pub scheduler: Rc<dyn RenderScheduler>,
    pub zone: Rc<dyn ExecutionZone>,
    pub config: Rc<SortableConfig>,
}

impl<T, F: EngineFactory> Clone for DirectiveContext<T, F> {
    fn clone(&self) -> Self {
        Self {
            service: Rc::clone(&self.service),
            factory: Rc::clone(&self.factory),
            renderer: Rc::clone(&self.renderer),
            scheduler: Rc::clone(&self.scheduler),
            zone: Rc::clone(&self.zone),
            config: Rc::clone(&self.config),
        }
    }
}

impl<T, F: EngineFactory> fmt::Debug for DirectiveContext<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, F: EngineFactory> DirectiveContext<T, F> {
    /// Context with a fresh service, batching zone and default config.
    #[must_use]
    pub fn new(
        factory: Rc<F>,
        renderer: Rc<dyn DomRenderer<NodeOf<F>>>,
        scheduler: Rc<dyn RenderScheduler>,
    ) -> Self {
        Self {
            service: SortableService::new(),
            factory,
            renderer,
            scheduler,
            zone: Rc::new(BatchZone),
            config: Rc::new(SortableConfig::default()),
        }
    }

    #[must_use]
    pub fn with_zone(mut self, zone: Rc<dyn ExecutionZone>) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SortableConfig) -> Self {
        self.config = Rc::new(config);
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: Rc<SortableService<T>>) -> Self {
        self.service = service;
        self
    }
}

// ---------------------------------------------------------------------------
// Directive
// ---------------------------------------------------------------------------

struct Shared<T, F: EngineFactory> {
    ctx: DirectiveContext<T, F>,
    host: NodeOf<F>,
    label: String,
    items: RefCell<SortableInput<T>>,
    container: RefCell<Option<String>>,
    options: RefCell<SortableOptions>,
    individual: RefCell<SortableOptions>,
    handlers: RefCell<EngineCallbacks<NodeOf<F>>>,
    clone_fn: RefCell<Option<CloneFn<T>>>,
    engine: RefCell<Option<EngineHandle<F::Engine>>>,
    outputs: SortableOutputs<F::Engine>,
    phase: Cell<GesturePhase>,
    setup_error: RefCell<Option<SetupError>>,
    init_requested: Cell<bool>,
    destroyed: Cell<bool>,
}

/// One sortable region.
///
/// Dropping the directive destroys its engine.
pub struct SortableDirective<T, F>
where
    T: Clone + 'static,
    F: EngineFactory + 'static,
    F::Engine: 'static,
{
    shared: Rc<Shared<T, F>>,
}

impl<T, F> fmt::Debug for SortableDirective<T, F>
where
    T: Clone + 'static,
    F: EngineFactory + 'static,
    F::Engine: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableDirective")
            .field("label", &self.shared.label)
            .field("phase", &self.shared.phase.get())
            .field("has_engine", &self.shared.engine.borrow().is_some())
            .field("destroyed", &self.shared.destroyed.get())
            .finish_non_exhaustive()
    }
}

impl<T, F> SortableDirective<T, F>
where
    T: Clone + 'static,
    F: EngineFactory + 'static,
    F::Engine: 'static,
{
    /// A region rooted at `host`. Nothing happens until [`Self::init`].
    #[must_use]
    pub fn new(ctx: DirectiveContext<T, F>, host: NodeOf<F>) -> Self {
        Self {
            shared: Rc::new(Shared {
                ctx,
                host,
                label: "region".to_string(),
                items: RefCell::new(SortableInput::Unbound),
                container: RefCell::new(None),
                options: RefCell::new(SortableOptions::default()),
                individual: RefCell::new(SortableOptions::default()),
                handlers: RefCell::new(EngineCallbacks::default()),
                clone_fn: RefCell::new(None),
                engine: RefCell::new(None),
                outputs: SortableOutputs::default(),
                phase: Cell::new(GesturePhase::Idle),
                setup_error: RefCell::new(None),
                init_requested: Cell::new(false),
                destroyed: Cell::new(false),
            }),
        }
    }

    /// Name used in log spans.
    ///
    /// Only takes effect before [`Self::init`], while nothing else holds
    /// the region.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(shared) = Rc::get_mut(&mut self.shared) {
            shared.label = label.into();
        }
        self
    }

    // -- inputs ------------------------------------------------------------

    pub fn set_items(&self, items: impl Into<SortableInput<T>>) {
        *self.shared.items.borrow_mut() = items.into();
    }

    /// Selector of the element inside the host that holds the rows.
    ///
    /// Clears a recorded [`SetupError`] so the next [`Self::init`] searches
    /// again.
    pub fn set_container(&self, selector: Option<String>) {
        *self.shared.container.borrow_mut() = selector;
        self.shared.setup_error.borrow_mut().take();
    }

    /// Replace the options input, pushing every changed key to a live
    /// engine.
    pub fn set_options(&self, options: SortableOptions) {
        let previous = self.shared.options.replace(options);
        let changed = self.shared.options.borrow().changed_keys(&previous);
        self.shared.push_options(&changed);
    }

    /// Set one individual option input; `None` clears it.
    pub fn set_option(
        &self,
        name: OptionName,
        value: Option<OptionValue>,
    ) -> Result<(), OptionTypeError> {
        self.shared.individual.borrow_mut().set(name, value)?;
        self.shared.push_options(&[name]);
        Ok(())
    }

    pub fn set_clone_function(&self, clone: impl Fn(&T) -> T + 'static) {
        *self.shared.clone_fn.borrow_mut() = Some(Rc::new(clone));
    }

    /// User handlers run before the matching outward notification.
    pub fn set_handlers(&self, handlers: EngineCallbacks<NodeOf<F>>) {
        *self.shared.handlers.borrow_mut() = handlers;
    }

    // -- lifecycle ---------------------------------------------------------

    /// Resolve the container and schedule engine creation for after the
    /// next render. Calling it again is a no-op, or returns the recorded
    /// [`SetupError`] without searching again.
    pub fn init(&self) -> Result<(), SetupError> {
        let shared = &self.shared;
        if shared.destroyed.get() || shared.init_requested.get() {
            return Ok(());
        }
        if let Some(err) = shared.setup_error.borrow().clone() {
            return Err(err);
        }
        if !shared.ctx.factory.is_available() {
            debug!(region = %shared.label, "drag engine unavailable; region stays inert");
            return Ok(());
        }

        let selector = shared.container.borrow().clone();
        let container = match &selector {
            Some(selector) => shared.ctx.renderer.query_selector(&shared.host, selector),
            None => Some(shared.host.clone()),
        };
        let Some(container) = container else {
            let selector = selector.unwrap_or_default();
            error!(region = %shared.label, %selector, "container not found");
            let err = SetupError::ContainerNotFound { selector };
            *shared.setup_error.borrow_mut() = Some(err.clone());
            return Err(err);
        };

        shared.init_requested.set(true);
        let weak = Rc::downgrade(shared);
        shared.ctx.scheduler.after_next_render(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.create_engine(&container);
            }
        }));
        Ok(())
    }

    /// Destroy the engine. Idempotent.
    pub fn destroy(&self) {
        self.shared.destroy();
    }

    // -- queries -----------------------------------------------------------

    #[must_use]
    pub fn engine(&self) -> Option<EngineHandle<F::Engine>> {
        self.shared.engine.borrow().clone()
    }

    #[must_use]
    pub fn outputs(&self) -> &SortableOutputs<F::Engine> {
        &self.shared.outputs
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.shared.phase.get()
    }

    #[must_use]
    pub fn setup_error(&self) -> Option<SetupError> {
        self.shared.setup_error.borrow().clone()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.get()
    }

    /// Globals, then the options input, then individual inputs.
    #[must_use]
    pub fn effective_options(&self) -> SortableOptions {
        self.shared.effective_options()
    }
}

impl<T, F> Drop for SortableDirective<T, F>
where
    T: Clone + 'static,
    F: EngineFactory + 'static,
    F::Engine: 'static,
{
    fn drop(&mut self) {
        self.shared.destroy();
    }
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

impl<T, F> Shared<T, F>
where
    T: Clone + 'static,
    F: EngineFactory + 'static,
    F::Engine: 'static,
{
    fn effective_options(&self) -> SortableOptions {
        self.ctx
            .config
            .globals
            .merged_with(&self.options.borrow())
            .merged_with(&self.individual.borrow())
    }

    fn push_options(&self, names: &[OptionName]) {
        let Some(engine) = self.engine.borrow().clone() else {
            return;
        };
        if names.is_empty() {
            return;
        }
        let effective = self.effective_options();
        let mut engine = engine.borrow_mut();
        for &name in names {
            debug!(region = %self.label, option = %name, "reconfiguring engine");
            engine.option(name, effective.get(name));
        }
    }

    fn create_engine(self: &Rc<Self>, container: &NodeOf<F>) {
        if self.destroyed.get() || self.engine.borrow().is_some() {
            return;
        }
        let config = EngineConfig {
            options: self.effective_options(),
            callbacks: Self::engine_callbacks(Rc::downgrade(self)),
        };
        let engine = Rc::new(RefCell::new(self.ctx.factory.create(container, config)));
        *self.engine.borrow_mut() = Some(Rc::clone(&engine));
        debug!(region = %self.label, "drag engine created");
        self.outputs.init.emit(&engine);
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let engine = self.engine.borrow_mut().take();
        if let Some(engine) = engine {
            engine.borrow_mut().destroy();
            debug!(region = %self.label, "drag engine destroyed");
        }
    }

    /// The callbacks installed on the engine. They hold the directive
    /// weakly and go quiet once it is dropped.
    fn engine_callbacks(weak: Weak<Self>) -> EngineCallbacks<NodeOf<F>> {
        let mut callbacks = EngineCallbacks::default();
        for kind in EngineEventKind::ALL {
            if kind == EngineEventKind::Move {
                continue;
            }
            let weak = weak.clone();
            callbacks.set_event(
                kind,
                Rc::new(move |event: &SortableEvent<NodeOf<F>>| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch(kind, event);
                    }
                }),
            );
        }
        callbacks.on_move = Some(Rc::new(
            move |event: &MoveEvent<NodeOf<F>>, input: &InputEvent| {
                weak.upgrade()
                    .map_or(MoveResult::Default, |shared| shared.on_move(event, input))
            },
        ));
        callbacks
    }

    fn dispatch(self: &Rc<Self>, kind: EngineEventKind, event: &SortableEvent<NodeOf<F>>) {
        let _span = debug_span!(
            "hubsort.event",
            event = kind.handler_name(),
            region = %self.label
        )
        .entered();
        run_in(self.ctx.zone.as_ref(), || match kind {
            EngineEventKind::Add => self.on_add(event),
            EngineEventKind::Remove => self.on_remove(event),
            EngineEventKind::Update => self.on_update(event),
            EngineEventKind::End => self.on_end(event),
            EngineEventKind::Choose | EngineEventKind::Start => {
                self.phase.set(GesturePhase::Dragging);
                self.proxy(kind, event);
            }
            _ => self.proxy(kind, event),
        });
    }

    /// User handler, then outward notification.
    fn proxy(&self, kind: EngineEventKind, event: &SortableEvent<NodeOf<F>>) {
        let handler = self.handlers.borrow().event(kind).cloned();
        if let Some(handler) = handler {
            handler(event);
        }
        if let Some(output) = self.outputs.event(kind) {
            output.emit(event);
        }
    }

    fn bindings(&self) -> SequenceBindingGroup<T> {
        let strict = self.ctx.config.strict_targets;
        match self.items.borrow().bindings(strict) {
            Ok(group) => group,
            Err(err) => {
                error!(region = %self.label, error = %err, "data input rejected; treating region as unbound");
                SequenceBindingGroup::empty()
            }
        }
    }

    fn on_add(self: &Rc<Self>, event: &SortableEvent<NodeOf<F>>) {
        self.phase.set(GesturePhase::Settled);
        let group = self.bindings();
        if !group.has_bindings() {
            self.proxy(EngineEventKind::Add, event);
            return;
        }

        let index = EventIndexes::from_event(event).new_position();
        let weak = Rc::downgrade(self);
        let event = event.clone();
        let sink: Sink<T> = Box::new(move |payload: Payload<T>| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match index {
                Some(index) => {
                    if let Err(err) = group.inject_payload(index, payload) {
                        error!(region = %shared.label, error = %err, "injecting transferred items failed");
                    }
                }
                None if payload.is_empty() => {}
                None => warn!(
                    region = %shared.label,
                    dropped = payload.len(),
                    "add event without a new index; transferred items dropped"
                ),
            }
            shared.proxy(EngineEventKind::Add, &event);
        });
        self.ctx.service.handoff().accept(sink);
    }

    fn on_remove(&self, event: &SortableEvent<NodeOf<F>>) {
        self.phase.set(GesturePhase::Settled);
        let group = self.bindings();
        if group.has_bindings() {
            let indexes = EventIndexes::from_event(event);
            let payload = match indexes.old_position() {
                Some(old) if self.is_cloning(indexes.old) => {
                    let clone_fn = self.clone_fn.borrow().clone();
                    let copies = group
                        .get_across_all(old)
                        .into_iter()
                        .map(|slot| {
                            slot.map(|item| match &clone_fn {
                                Some(clone) => clone(&item),
                                None => item,
                            })
                        })
                        .collect();
                    self.revert_clone_dom(event);
                    copies
                }
                Some(old) => group.remove_across_all(old),
                None => {
                    warn!(region = %self.label, "remove event without an old index");
                    Payload::new()
                }
            };
            self.ctx.service.handoff().offer(payload);
        }
        self.proxy(EngineEventKind::Remove, event);
    }

    fn on_update(&self, event: &SortableEvent<NodeOf<F>>) {
        self.phase.set(GesturePhase::Settled);
        let group = self.bindings();
        if group.has_bindings() {
            let indexes = EventIndexes::from_event(event);
            match (indexes.old_position(), indexes.new_position()) {
                (Some(old), Some(new)) => {
                    if let Err(err) = group.move_within(old, new) {
                        error!(region = %self.label, error = %err, "reordering bound items failed");
                    }
                }
                _ => warn!(region = %self.label, "update event without an index pair"),
            }
        }
        self.proxy(EngineEventKind::Update, event);
    }

    fn on_end(&self, event: &SortableEvent<NodeOf<F>>) {
        match self.ctx.service.handoff().clear() {
            Some(StaleHandoff::Sink(sink)) => {
                debug!(region = %self.label, "gesture ended with an unfed destination; releasing it empty");
                sink(Payload::new());
            }
            Some(StaleHandoff::Payload(payload)) => {
                debug!(region = %self.label, dropped = payload.len(), "gesture ended with an unclaimed payload");
            }
            None => {}
        }
        self.phase.set(GesturePhase::Idle);
        self.proxy(EngineEventKind::End, event);
    }

    fn on_move(&self, event: &MoveEvent<NodeOf<F>>, input: &InputEvent) -> MoveResult {
        let _span = debug_span!("hubsort.event", event = "onMove", region = %self.label).entered();
        run_in(self.ctx.zone.as_ref(), || {
            let handler = self.handlers.borrow().on_move.clone();
            let result = handler.map_or(MoveResult::Default, |h| h(event, input));
            self.outputs.moved.emit(&MovePayload {
                event: event.clone(),
                original: *input,
            });
            result
        })
        .unwrap_or_default()
    }

    /// Group policy as the live engine sees it, or as it would be created.
    fn group_option(&self) -> Option<GroupOption> {
        match self.engine.borrow().as_ref() {
            Some(engine) => engine.borrow().options().group.clone(),
            None => self.effective_options().group,
        }
    }

    fn is_cloning(&self, old_index: Option<usize>) -> bool {
        let group = self.group_option();
        let policy = ClonePolicy::resolve(group.as_ref());
        policy.is_cloning(&PullContext {
            group: group.as_ref().and_then(GroupOption::name),
            old_index,
        })
    }

    /// Undo the engine's DOM side of a clone drop: the destination keeps
    /// no node (bound data renders it), and the original node goes back
    /// where the engine left its clone.
    fn revert_clone_dom(&self, event: &SortableEvent<NodeOf<F>>) {
        let renderer = &self.ctx.renderer;
        if let Some(parent) = renderer.parent_node(&event.item) {
            renderer.remove_child(&parent, &event.item);
        }
        let Some(clone) = &event.clone else {
            debug!(region = %self.label, "clone drag without a clone node");
            return;
        };
        if let Some(parent) = renderer.parent_node(clone) {
            renderer.insert_before(&parent, &event.item, Some(clone));
            renderer.remove_child(&parent, clone);
        }
    }
}
