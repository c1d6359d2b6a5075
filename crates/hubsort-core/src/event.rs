#![forbid(unsafe_code)]

//! Engine event model.
//!
//! Events are generic over the engine's node handle `N`. The core never
//! looks inside a node; it only hands nodes back to the host renderer.

use crate::clone_policy::PullMode;

/// The twelve engine callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEventKind {
    Add,
    Remove,
    Update,
    Start,
    End,
    Sort,
    Filter,
    Change,
    Choose,
    Unchoose,
    Clone,
    Move,
}

impl EngineEventKind {
    pub const ALL: [Self; 12] = [
        Self::Add,
        Self::Remove,
        Self::Update,
        Self::Start,
        Self::End,
        Self::Sort,
        Self::Filter,
        Self::Change,
        Self::Choose,
        Self::Unchoose,
        Self::Clone,
        Self::Move,
    ];

    /// Callback slot name as the engine spells it.
    #[must_use]
    pub const fn handler_name(self) -> &'static str {
        match self {
            Self::Add => "onAdd",
            Self::Remove => "onRemove",
            Self::Update => "onUpdate",
            Self::Start => "onStart",
            Self::End => "onEnd",
            Self::Sort => "onSort",
            Self::Filter => "onFilter",
            Self::Change => "onChange",
            Self::Choose => "onChoose",
            Self::Unchoose => "onUnchoose",
            Self::Clone => "onClone",
            Self::Move => "onMove",
        }
    }

    /// Whether the event settles the drop and may change bound data.
    #[must_use]
    pub const fn is_settle(self) -> bool {
        matches!(self, Self::Add | Self::Remove | Self::Update)
    }
}

/// Payload of every callback except `move`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortableEvent<N> {
    /// Region the item came from.
    pub from: N,
    /// Region the item is in now.
    pub to: N,
    /// The dragged node.
    pub item: N,
    /// The engine's copy of `item` left in the source during a clone drag.
    pub clone: Option<N>,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    /// Index counting only draggable siblings.
    pub old_draggable_index: Option<usize>,
    pub new_draggable_index: Option<usize>,
    pub pull_mode: Option<PullMode>,
}

impl<N: Clone> SortableEvent<N> {
    #[must_use]
    pub fn new(from: N, to: N, item: N) -> Self {
        Self {
            from,
            to,
            item,
            clone: None,
            old_index: None,
            new_index: None,
            old_draggable_index: None,
            new_draggable_index: None,
            pull_mode: None,
        }
    }

    #[must_use]
    pub fn with_indexes(mut self, old: usize, new: usize) -> Self {
        self.old_index = Some(old);
        self.new_index = Some(new);
        self
    }

    #[must_use]
    pub fn with_draggable_indexes(mut self, old: usize, new: usize) -> Self {
        self.old_draggable_index = Some(old);
        self.new_draggable_index = Some(new);
        self
    }

    #[must_use]
    pub fn with_clone(mut self, clone: N) -> Self {
        self.clone = Some(clone);
        self
    }

    #[must_use]
    pub fn with_pull_mode(mut self, mode: PullMode) -> Self {
        self.pull_mode = Some(mode);
        self
    }
}

/// Payload of the `move` callback.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEvent<N> {
    pub from: N,
    pub to: N,
    pub dragged: N,
    /// Node the dragged one is hovering against.
    pub related: N,
    pub will_insert_after: bool,
}

/// Pointer device that produced an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Mouse,
    Touch,
    Pointer,
    Drag,
}

/// Raw input event that triggered a `move` callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub client_x: f64,
    pub client_y: f64,
}

impl InputEvent {
    #[must_use]
    pub const fn pointer(client_x: f64, client_y: f64) -> Self {
        Self {
            kind: InputKind::Pointer,
            client_x,
            client_y,
        }
    }
}

/// What a `move` handler tells the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveResult {
    /// Let the engine decide.
    #[default]
    Default,
    Cancel,
    InsertBefore,
    InsertAfter,
}

/// Outward `move` notification: the engine event plus the raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePayload<N> {
    pub event: MoveEvent<N>,
    pub original: InputEvent,
}
