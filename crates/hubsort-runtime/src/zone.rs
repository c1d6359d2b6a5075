#![forbid(unsafe_code)]

//! Where translated engine events run.
//!
//! Engine callbacks arrive from outside the host's update cycle. Each one
//! is re-entered into an [`ExecutionZone`] so the host observes its data
//! changes as a unit.

use crate::reactive::BatchScope;

/// Context that runs a task on behalf of the host.
pub trait ExecutionZone {
    /// Run `task` exactly once, synchronously.
    fn run(&self, task: &mut dyn FnMut());
}

/// Run `f` inside `zone` and return its result.
///
/// `None` only if the zone broke its contract and never ran the task.
pub fn run_in<R>(zone: &dyn ExecutionZone, f: impl FnOnce() -> R) -> Option<R> {
    let mut f = Some(f);
    let mut out = None;
    zone.run(&mut || {
        if let Some(f) = f.take() {
            out = Some(f());
        }
    });
    out
}

/// Runs tasks in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectZone;

impl ExecutionZone for DirectZone {
    fn run(&self, task: &mut dyn FnMut()) {
        task();
    }
}

/// Runs each task inside a [`BatchScope`], so observable subscribers hear
/// about the task's writes once, after it returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchZone;

impl ExecutionZone for BatchZone {
    fn run(&self, task: &mut dyn FnMut()) {
        let _batch = BatchScope::new();
        task();
    }
}
