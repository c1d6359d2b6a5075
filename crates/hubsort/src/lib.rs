#![forbid(unsafe_code)]

//! hubsort public facade crate.
//!
//! Re-exports the types an application touches when it binds data to a
//! drag engine, plus a prelude for day-to-day usage.

use thiserror::Error;

// --- Core re-exports -------------------------------------------------------

pub use hubsort_core::{
    BindingTarget, ClonePolicy, EngineEventKind, GroupOption, GroupOptions, InputEvent,
    MoveEvent, MoveResult, OptionName, OptionValue, Pull, PullContext, PullMode, Put,
    SequenceBinding, SequenceBindingGroup, SharedList, SortableEvent, SortableOptions,
    TargetKind, shared_list,
};

// --- Runtime re-exports ----------------------------------------------------

pub use hubsort_runtime::{
    DirectiveContext, DomRenderer, DragEngine, EngineCallbacks, EngineFactory, EngineHandle,
    ExecutionZone, FormArray, FormControl, GesturePhase, Observable, RenderScheduler,
    SortableConfig, SortableDirective, SortableInput, SortableService, Subscription,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hubsort apps.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] hubsort_runtime::SetupError),
    #[error(transparent)]
    Config(#[from] hubsort_runtime::ConfigError),
    #[error(transparent)]
    Binding(#[from] hubsort_core::BindingError),
    #[error(transparent)]
    InvalidOption(#[from] hubsort_core::OptionTypeError),
}

/// Standard result type for hubsort APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        EngineCallbacks, Error, GroupOptions, Observable, Pull, PullMode, Result,
        SequenceBindingGroup, SortableConfig, SortableDirective, SortableEvent, SortableOptions,
        shared_list,
    };

    pub use crate::{core, runtime};
}

pub use hubsort_core as core;
pub use hubsort_runtime as runtime;

#[cfg(feature = "testing")]
pub use hubsort_harness as testing;
