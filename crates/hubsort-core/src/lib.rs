#![forbid(unsafe_code)]

//! hubsort core
//!
//! Data-side plumbing for drag-and-drop sortable regions: keeping
//! application sequences in step with what a drag engine does to the DOM.
//!
//! # Key Components
//!
//! - [`SequenceBinding`] - uniform insert/get/remove over one plain list,
//!   form array, or signal
//! - [`SequenceBindingGroup`] - index-aligned fan-out over several bindings
//! - [`ClonePolicy`] - copy-or-move decision for a drag out of a region
//! - [`SortableEvent`] / [`EventIndexes`] - engine event model
//! - [`SortableOptions`] - engine configuration, one optional field per key
//!
//! # Role in hubsort
//! This crate knows nothing about DOM nodes or engines beyond the event
//! payload shapes. `hubsort-runtime` builds the host layer on top of it.

pub mod binding;
pub mod clone_policy;
pub mod error;
pub mod event;
pub mod group;
pub mod index;
pub mod options;
pub mod target;

pub use binding::SequenceBinding;
pub use clone_policy::{ClonePolicy, PullContext, PullMode};
pub use error::{BindingError, FormError, OptionTypeError, PullCheckError};
pub use event::{
    EngineEventKind, InputEvent, InputKind, MoveEvent, MovePayload, MoveResult, SortableEvent,
};
pub use group::{Payload, SequenceBindingGroup};
pub use index::EventIndexes;
pub use options::{
    DataTransfer, Direction, Filter, GroupOption, GroupOptions, Offset, OptionName, OptionValue,
    OrderStore, Pull, PullPredicate, Put, PutPredicate, SetData, SortableOptions, Store,
};
pub use target::{
    BindingTarget, FormArrayOps, ListOps, SharedList, SignalOps, TargetKind, shared_list,
};
