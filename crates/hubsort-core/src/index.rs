#![forbid(unsafe_code)]

//! Picking the index pair that addresses bound data.

use crate::event::SortableEvent;

/// Old/new positions of the dragged item within its regions' data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventIndexes {
    pub old: Option<usize>,
    pub new: Option<usize>,
}

impl EventIndexes {
    /// The draggable pair when the engine reported both halves of it, the
    /// plain DOM pair otherwise.
    ///
    /// Draggable indexes skip filtered siblings, which are not part of the
    /// bound data.
    #[must_use]
    pub fn from_event<N>(event: &SortableEvent<N>) -> Self {
        match (event.old_draggable_index, event.new_draggable_index) {
            (Some(old), Some(new)) => Self {
                old: Some(old),
                new: Some(new),
            },
            _ => Self {
                old: event.old_index,
                new: event.new_index,
            },
        }
    }

    /// `old` as a binding index.
    #[must_use]
    pub fn old_position(&self) -> Option<isize> {
        self.old.and_then(as_position)
    }

    /// `new` as a binding index.
    #[must_use]
    pub fn new_position(&self) -> Option<isize> {
        self.new.and_then(as_position)
    }
}

/// Convert an engine index to a binding index; `None` if it does not fit.
#[must_use]
pub fn as_position(index: usize) -> Option<isize> {
    isize::try_from(index).ok()
}
