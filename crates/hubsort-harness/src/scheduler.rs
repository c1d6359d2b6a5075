#![forbid(unsafe_code)]

//! Render scheduling under test control.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use hubsort_runtime::RenderScheduler;

/// Queues after-render tasks until [`ManualScheduler::render`].
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Complete a render: run every queued task, including ones queued by
    /// the tasks themselves. Returns how many ran.
    pub fn render(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(task) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl RenderScheduler for ManualScheduler {
    fn after_next_render(&self, task: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tasks_wait_for_render() {
        let scheduler = Rc::new(ManualScheduler::new());
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let again = Rc::clone(&scheduler);
        scheduler.after_next_render(Box::new(move || {
            h.set(h.get() + 1);
            let h = Rc::clone(&h);
            again.after_next_render(Box::new(move || h.set(h.get() + 10)));
        }));
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.render(), 2);
        assert_eq!(hits.get(), 11);
    }
}
