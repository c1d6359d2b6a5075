#![forbid(unsafe_code)]

//! An execution zone that counts its entries.

use std::cell::Cell;

use hubsort_runtime::{BatchZone, ExecutionZone};

/// Batches like [`BatchZone`] and records how often, and how deeply, it
/// was entered.
#[derive(Debug, Default)]
pub struct RecordingZone {
    entries: Cell<u32>,
    depth: Cell<u32>,
    max_depth: Cell<u32>,
}

impl RecordingZone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks run so far.
    #[must_use]
    pub fn entries(&self) -> u32 {
        self.entries.get()
    }

    /// Whether a task is running right now.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.depth.get() > 0
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth.get()
    }
}

impl ExecutionZone for RecordingZone {
    fn run(&self, task: &mut dyn FnMut()) {
        self.entries.set(self.entries.get() + 1);
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        self.max_depth.set(self.max_depth.get().max(depth));
        BatchZone.run(task);
        self.depth.set(depth - 1);
    }
}
