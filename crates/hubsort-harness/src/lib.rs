#![forbid(unsafe_code)]

//! Test harness for hubsort.
//!
//! # Role
//! Everything the host layer needs from a browser, in memory: a document
//! tree ([`DomTree`]), a drag engine ([`SimulatedEngine`]), a render
//! scheduler ([`ManualScheduler`]), an execution zone ([`RecordingZone`])
//! and scripted gestures ([`DragSimulator`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! let board = Board::<char>::new();
//! let host = board.list(&["a", "b", "c"]);
//! let items = shared_list(['a', 'b', 'c']);
//! let region = board.region(host);
//! region.set_items(Rc::clone(&items));
//! region.init()?;
//! board.render();
//!
//! board.simulator().reorder(&region.engine().unwrap(), 0, 2);
//! assert_eq!(*items.borrow(), ['b', 'c', 'a']);
//! ```

pub mod dom;
pub mod engine;
pub mod scheduler;
pub mod simulator;
pub mod zone;

pub use dom::{DomTree, NodeId};
pub use engine::{SimulatedEngine, SimulatedFactory};
pub use scheduler::ManualScheduler;
pub use simulator::{CallbackOrder, DragSimulator, GestureOutcome};
pub use zone::RecordingZone;

use std::fmt;
use std::rc::Rc;

use hubsort_runtime::{
    DirectiveContext, DomRenderer, ExecutionZone, RenderScheduler, SortableConfig,
    SortableDirective, SortableService,
};

/// One application's worth of shared collaborators.
pub struct Board<T> {
    pub dom: DomTree,
    pub factory: Rc<SimulatedFactory>,
    pub scheduler: Rc<ManualScheduler>,
    pub zone: Rc<RecordingZone>,
    pub service: Rc<SortableService<T>>,
    config: SortableConfig,
}

impl<T> fmt::Debug for Board<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("dom", &self.dom)
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Default for Board<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Board<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dom: DomTree::new(),
            factory: Rc::new(SimulatedFactory::new()),
            scheduler: Rc::new(ManualScheduler::new()),
            zone: Rc::new(RecordingZone::new()),
            service: SortableService::new(),
            config: SortableConfig::default(),
        }
    }

    #[must_use]
    pub fn with_factory(mut self, factory: SimulatedFactory) -> Self {
        self.factory = Rc::new(factory);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SortableConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn context(&self) -> DirectiveContext<T, SimulatedFactory> {
        let renderer: Rc<dyn DomRenderer<NodeId>> = Rc::new(self.dom.clone());
        let scheduler: Rc<dyn RenderScheduler> = self.scheduler.clone();
        let zone: Rc<dyn ExecutionZone> = self.zone.clone();
        DirectiveContext::new(Rc::clone(&self.factory), renderer, scheduler)
            .with_zone(zone)
            .with_config(self.config.clone())
            .with_service(Rc::clone(&self.service))
    }

    /// A `ul` with one `li` per label.
    pub fn list(&self, labels: &[&str]) -> NodeId {
        let ul = self.dom.create_element("ul");
        for label in labels {
            let li = self.dom.create_element("li");
            self.dom.set_text(li, label);
            self.dom.append_child(ul, li);
        }
        ul
    }

    #[must_use]
    pub fn region(&self, host: NodeId) -> SortableDirective<T, SimulatedFactory> {
        SortableDirective::new(self.context(), host)
    }

    /// Complete a render pass, creating any pending engines.
    pub fn render(&self) -> usize {
        self.scheduler.render()
    }

    #[must_use]
    pub fn simulator(&self) -> DragSimulator {
        DragSimulator::new(self.dom.clone())
    }
}
