#![forbid(unsafe_code)]

//! Drag engine stand-in.
//!
//! [`SimulatedEngine`] stores the options and callbacks it was created
//! with and records every reconfiguration. It never moves anything by
//! itself: [`DragSimulator`](crate::DragSimulator) drives gestures
//! through it.

use std::cell::{Cell, RefCell};

use hubsort_core::{OptionName, OptionValue, SortableOptions};
use hubsort_runtime::{DragEngine, EngineCallbacks, EngineConfig, EngineFactory};
use tracing::debug;

use crate::dom::NodeId;

/// In-memory engine bound to one container.
#[derive(Debug)]
pub struct SimulatedEngine {
    container: NodeId,
    options: SortableOptions,
    callbacks: EngineCallbacks<NodeId>,
    reconfigured: Vec<(OptionName, Option<OptionValue>)>,
    destroyed: bool,
}

impl SimulatedEngine {
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Callbacks as installed at creation.
    #[must_use]
    pub fn callbacks(&self) -> EngineCallbacks<NodeId> {
        self.callbacks.clone()
    }

    /// Every `option` call, in order.
    #[must_use]
    pub fn reconfigurations(&self) -> &[(OptionName, Option<OptionValue>)] {
        &self.reconfigured
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl DragEngine for SimulatedEngine {
    type Node = NodeId;

    fn option(&mut self, name: OptionName, value: Option<OptionValue>) {
        // The options table accepts any value of the right kind.
        if let Err(err) = self.options.set(name, value.clone()) {
            debug!(error = %err, "simulated engine ignored option");
            return;
        }
        self.reconfigured.push((name, value));
    }

    fn options(&self) -> &SortableOptions {
        &self.options
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

/// Creates [`SimulatedEngine`]s and counts them.
#[derive(Debug)]
pub struct SimulatedFactory {
    available: Cell<bool>,
    created: RefCell<Vec<NodeId>>,
}

impl Default for SimulatedFactory {
    fn default() -> Self {
        Self {
            available: Cell::new(true),
            created: RefCell::new(Vec::new()),
        }
    }
}

impl SimulatedFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory reporting no document, as on a server render.
    #[must_use]
    pub fn unavailable() -> Self {
        let factory = Self::default();
        factory.available.set(false);
        factory
    }

    /// Containers engines were created on, in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<NodeId> {
        self.created.borrow().clone()
    }
}

impl EngineFactory for SimulatedFactory {
    type Engine = SimulatedEngine;

    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn create(&self, container: &NodeId, config: EngineConfig<NodeId>) -> SimulatedEngine {
        self.created.borrow_mut().push(*container);
        SimulatedEngine {
            container: *container,
            options: config.options,
            callbacks: config.callbacks,
            reconfigured: Vec::new(),
            destroyed: false,
        }
    }
}
