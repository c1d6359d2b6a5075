#![forbid(unsafe_code)]

//! Scripted drag gestures.
//!
//! [`DragSimulator`] replays the callback sequences a browser drag engine
//! produces, moving nodes in the [`DomTree`] first the way the engine
//! does during a drag.
//!
//! # Design
//!
//! ```text
//! reorder:   choose, start, move, change, unchoose, update, sort, end
//! transfer:  choose, [clone], start, move, change, unchoose,
//!            add + remove (order selectable), sort, sort, end
//! abort:     choose, start, unchoose, end
//! ```
//!
//! Pull and put checks follow the group rules: a bare group name only
//! exchanges with the same name, an explicit policy decides for itself.
//! Callbacks are copied out of the engine before they run, so handlers may
//! borrow the engine.

use hubsort_core::{
    EngineEventKind, Filter, GroupOption, InputEvent, MoveEvent, MoveResult, Pull, PullContext,
    PullMode, Put, SortableEvent, SortableOptions,
};
use hubsort_runtime::{DragEngine, EngineCallbacks, EngineHandle};
use tracing::{debug, debug_span};

use crate::dom::{DomTree, NodeId};
use crate::engine::SimulatedEngine;

/// Which settle callback of a transfer fires first.
///
/// Browser engines report `add` on the destination before `remove` on the
/// source. The host must cope with either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackOrder {
    #[default]
    AddFirst,
    RemoveFirst,
}

/// How a simulated gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The item changed position within its region.
    Sorted,
    /// Dropped where it started.
    Unchanged,
    Transferred { mode: PullMode },
    /// The `move` handler cancelled the drag.
    Cancelled,
    /// Pull, put or sort rules refused the drop.
    Rejected,
    /// The pointer-down hit a filtered element.
    Filtered,
    /// No item at the requested index, or the engine is disabled.
    NoDrag,
}

/// Drives gestures through [`SimulatedEngine`]s sharing one document.
#[derive(Debug, Clone)]
pub struct DragSimulator {
    dom: DomTree,
    input: InputEvent,
}

struct Region {
    container: NodeId,
    options: SortableOptions,
    callbacks: EngineCallbacks<NodeId>,
}

impl Region {
    fn of(engine: &EngineHandle<SimulatedEngine>) -> Self {
        let engine = engine.borrow();
        Self {
            container: engine.container(),
            options: engine.options().clone(),
            callbacks: engine.callbacks(),
        }
    }

    fn group_name(&self) -> Option<&str> {
        self.options.group.as_ref().and_then(GroupOption::name)
    }
}

impl DragSimulator {
    #[must_use]
    pub fn new(dom: DomTree) -> Self {
        Self {
            dom,
            input: InputEvent::pointer(0.0, 0.0),
        }
    }

    /// Raw input passed to `move` handlers.
    #[must_use]
    pub fn with_input(mut self, input: InputEvent) -> Self {
        self.input = input;
        self
    }

    /// Invoke one callback of `engine` directly.
    pub fn fire(
        &self,
        engine: &EngineHandle<SimulatedEngine>,
        kind: EngineEventKind,
        event: &SortableEvent<NodeId>,
    ) {
        let callbacks = engine.borrow().callbacks();
        fire(&callbacks, kind, event);
    }

    /// Drag item `old` of `engine`'s container to position `new`.
    pub fn reorder(
        &self,
        engine: &EngineHandle<SimulatedEngine>,
        old: usize,
        new: usize,
    ) -> GestureOutcome {
        let _span = debug_span!("hubsort.simulate", gesture = "reorder", old, new).entered();
        let region = Region::of(engine);
        let Some(item) = self.pick(&region, old) else {
            return GestureOutcome::NoDrag;
        };
        if self.filtered(&region, item) {
            return GestureOutcome::Filtered;
        }

        let at = region.container;
        let base = SortableEvent::new(at, at, item).with_indexes(old, old);
        let old_draggable = self.draggable_index(&region, item);
        fire(&region.callbacks, EngineEventKind::Choose, &base);
        fire(&region.callbacks, EngineEventKind::Start, &base);

        if region.options.sort == Some(false) {
            self.finish_without_drop(&region, &base);
            return GestureOutcome::Rejected;
        }

        let related = self.dom.children(at).get(new).copied().unwrap_or(item);
        let answer = self.ask_move(&region, at, item, related, new > old);
        if answer == MoveResult::Cancel {
            self.finish_without_drop(&region, &base);
            return GestureOutcome::Cancelled;
        }

        self.dom.insert_at(at, item, Some(new));
        let mut event = base.with_indexes(old, new);
        if let (Some(o), Some(n)) = (old_draggable, self.draggable_index(&region, item)) {
            event = event.with_draggable_indexes(o, n);
        }
        if old != new {
            fire(&region.callbacks, EngineEventKind::Change, &event);
        }
        fire(&region.callbacks, EngineEventKind::Unchoose, &event);
        if old != new {
            fire(&region.callbacks, EngineEventKind::Update, &event);
            fire(&region.callbacks, EngineEventKind::Sort, &event);
        }
        fire(&region.callbacks, EngineEventKind::End, &event);

        if old == new {
            GestureOutcome::Unchanged
        } else {
            GestureOutcome::Sorted
        }
    }

    /// Drag item `old` of `from` into `to` at position `new`.
    pub fn transfer(
        &self,
        from: &EngineHandle<SimulatedEngine>,
        to: &EngineHandle<SimulatedEngine>,
        old: usize,
        new: usize,
        order: CallbackOrder,
    ) -> GestureOutcome {
        let _span =
            debug_span!("hubsort.simulate", gesture = "transfer", old, new, ?order).entered();
        let source = Region::of(from);
        let target = Region::of(to);
        let Some(item) = self.pick(&source, old) else {
            return GestureOutcome::NoDrag;
        };
        if self.filtered(&source, item) {
            return GestureOutcome::Filtered;
        }

        let (src, dst) = (source.container, target.container);
        let base = SortableEvent::new(src, src, item).with_indexes(old, old);
        let old_draggable = self.draggable_index(&source, item);
        let mode = pull_mode(&source, &target, old);

        fire(&source.callbacks, EngineEventKind::Choose, &base);
        let clone = (mode == PullMode::Clone).then(|| {
            let clone = self.dom.deep_clone(item);
            fire(
                &source.callbacks,
                EngineEventKind::Clone,
                &base.clone().with_clone(clone),
            );
            clone
        });
        fire(&source.callbacks, EngineEventKind::Start, &base);

        if mode == PullMode::Deny || !put_allowed(&source, &target, old) {
            debug!(?mode, "drop refused by group rules");
            self.finish_without_drop(&source, &base);
            return GestureOutcome::Rejected;
        }

        let related = self.dom.children(dst).get(new).copied().unwrap_or(dst);
        if self.ask_move(&source, dst, item, related, false) == MoveResult::Cancel {
            self.finish_without_drop(&source, &base);
            return GestureOutcome::Cancelled;
        }

        self.dom.insert_at(dst, item, Some(new));
        if let Some(clone) = clone {
            self.dom.insert_at(src, clone, Some(old));
        }

        let mut event = SortableEvent::new(src, dst, item)
            .with_indexes(old, new)
            .with_pull_mode(mode);
        if let Some(clone) = clone {
            event = event.with_clone(clone);
        }
        if let (Some(o), Some(n)) = (old_draggable, self.draggable_index(&target, item)) {
            event = event.with_draggable_indexes(o, n);
        }

        fire(&target.callbacks, EngineEventKind::Change, &event);
        fire(&source.callbacks, EngineEventKind::Unchoose, &event);
        match order {
            CallbackOrder::AddFirst => {
                fire(&target.callbacks, EngineEventKind::Add, &event);
                fire(&source.callbacks, EngineEventKind::Remove, &event);
            }
            CallbackOrder::RemoveFirst => {
                fire(&source.callbacks, EngineEventKind::Remove, &event);
                fire(&target.callbacks, EngineEventKind::Add, &event);
            }
        }
        fire(&target.callbacks, EngineEventKind::Sort, &event);
        fire(&source.callbacks, EngineEventKind::Sort, &event);
        fire(&source.callbacks, EngineEventKind::End, &event);

        GestureOutcome::Transferred { mode }
    }

    /// Pick item `old` up and drop it outside any region.
    pub fn abort(&self, engine: &EngineHandle<SimulatedEngine>, old: usize) -> GestureOutcome {
        let region = Region::of(engine);
        let Some(item) = self.pick(&region, old) else {
            return GestureOutcome::NoDrag;
        };
        let base =
            SortableEvent::new(region.container, region.container, item).with_indexes(old, old);
        fire(&region.callbacks, EngineEventKind::Choose, &base);
        fire(&region.callbacks, EngineEventKind::Start, &base);
        self.finish_without_drop(&region, &base);
        GestureOutcome::Unchanged
    }

    // -- pieces ------------------------------------------------------------

    fn pick(&self, region: &Region, index: usize) -> Option<NodeId> {
        if region.options.disabled == Some(true) {
            return None;
        }
        self.dom.children(region.container).get(index).copied()
    }

    fn filtered(&self, region: &Region, item: NodeId) -> bool {
        let hit = match &region.options.filter {
            Some(Filter::Selector(selector)) => self.dom.matches(item, selector),
            Some(Filter::Predicate(predicate)) => predicate(&self.input),
            None => false,
        };
        if hit {
            let at = region.container;
            fire(
                &region.callbacks,
                EngineEventKind::Filter,
                &SortableEvent::new(at, at, item),
            );
        }
        hit
    }

    /// Index among siblings matching the `draggable` selector, if set.
    fn draggable_index(&self, region: &Region, item: NodeId) -> Option<usize> {
        let selector = region.options.draggable.as_deref()?;
        let parent = self.dom.parent(item)?;
        self.dom
            .children(parent)
            .into_iter()
            .filter(|&c| self.dom.matches(c, selector))
            .position(|c| c == item)
    }

    fn ask_move(
        &self,
        region: &Region,
        to: NodeId,
        dragged: NodeId,
        related: NodeId,
        will_insert_after: bool,
    ) -> MoveResult {
        let Some(on_move) = region.callbacks.on_move.clone() else {
            return MoveResult::Default;
        };
        on_move(
            &MoveEvent {
                from: region.container,
                to,
                dragged,
                related,
                will_insert_after,
            },
            &self.input,
        )
    }

    fn finish_without_drop(&self, region: &Region, base: &SortableEvent<NodeId>) {
        fire(&region.callbacks, EngineEventKind::Unchoose, base);
        fire(&region.callbacks, EngineEventKind::End, base);
    }
}

fn fire(callbacks: &EngineCallbacks<NodeId>, kind: EngineEventKind, event: &SortableEvent<NodeId>) {
    if let Some(callback) = callbacks.event(kind).cloned() {
        callback(event);
    }
}

fn pull_mode(source: &Region, target: &Region, old: usize) -> PullMode {
    let policy = source.options.group.as_ref().and_then(GroupOption::policy);
    let Some(policy) = policy else {
        return PullMode::Move;
    };
    match &policy.pull {
        Pull::Allow(true) => PullMode::Move,
        Pull::Allow(false) => PullMode::Deny,
        Pull::Clone => PullMode::Clone,
        Pull::Groups(groups) => match target.group_name() {
            Some(name) if groups.iter().any(|g| g == name) => PullMode::Move,
            _ => PullMode::Deny,
        },
        Pull::Decide(predicate) => {
            let ctx = PullContext {
                group: source.group_name(),
                old_index: Some(old),
            };
            predicate(&ctx).unwrap_or_else(|err| {
                debug!(error = %err, "pull predicate failed; denying");
                PullMode::Deny
            })
        }
    }
}

fn put_allowed(source: &Region, target: &Region, old: usize) -> bool {
    let policy = target.options.group.as_ref().and_then(GroupOption::policy);
    let Some(policy) = policy else {
        return matches!(
            (source.group_name(), target.group_name()),
            (Some(a), Some(b)) if a == b
        );
    };
    match &policy.put {
        Put::Allow(allow) => *allow,
        Put::Groups(groups) => source
            .group_name()
            .is_some_and(|name| groups.iter().any(|g| g == name)),
        Put::Decide(predicate) => predicate(&PullContext {
            group: source.group_name(),
            old_index: Some(old),
        }),
    }
}
