#![forbid(unsafe_code)]

//! Host layer for hubsort.
//!
//! # Role
//! `hubsort-runtime` connects a drag engine to bound data. A
//! [`SortableDirective`] creates the engine after the host renders and
//! translates its callbacks into insert/remove/move operations on the
//! region's sequences, handing values between regions through a shared
//! [`SortableService`].
//!
//! # Primary responsibilities
//! - **Directive**: lifecycle, option diffing and event translation.
//! - **Targets**: [`Observable`] signals and [`FormArray`] forms that the
//!   core bindings drive.
//! - **Seams**: [`DragEngine`], [`DomRenderer`], [`RenderScheduler`] and
//!   [`ExecutionZone`], which the host supplies.
//! - **Config**: application-wide defaults via [`SortableConfig`].
//!
//! # How it fits in the system
//! The core crate holds the engine-agnostic vocabulary. This crate owns
//! every piece of state that lives across events. `hubsort-harness`
//! supplies in-memory implementations of the seams.

pub mod config;
pub mod directive;
pub mod engine;
pub mod forms;
pub mod handoff;
pub mod input;
pub mod outputs;
pub mod reactive;
pub mod zone;

pub use config::{ConfigError, SortableConfig};
pub use directive::{
    CloneFn, DirectiveContext, GesturePhase, NodeOf, SetupError, SortableDirective,
};
pub use engine::{
    DomRenderer, DragEngine, EngineCallbacks, EngineConfig, EngineFactory, EngineHandle,
    EventCallback, MoveCallback, RenderScheduler,
};
pub use forms::{FormArray, FormControl, Validator};
pub use handoff::{HandoffSlot, Rendezvous, Sink, SortableService, StaleHandoff};
pub use input::SortableInput;
pub use outputs::{EventEmitter, SortableOutputs};
pub use reactive::{BatchScope, Observable, Subscription};
pub use zone::{BatchZone, DirectZone, ExecutionZone, run_in};
