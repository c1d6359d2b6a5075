#![forbid(unsafe_code)]

//! The data input of a sortable region.

use std::fmt;
use std::rc::Rc;

use hubsort_core::{BindingError, BindingTarget, SequenceBinding, SequenceBindingGroup, SharedList};

use crate::forms::{FormArray, FormControl};
use crate::reactive::Observable;

/// What a region's rows are bound to.
pub enum SortableInput<T> {
    /// No data: the region only forwards engine events.
    Unbound,
    /// One sequence: a plain list, form array or signal.
    Target(Rc<dyn BindingTarget<T>>),
    /// Several index-aligned sequences moved together.
    Group(SequenceBindingGroup<T>),
}

impl<T> Default for SortableInput<T> {
    fn default() -> Self {
        Self::Unbound
    }
}

impl<T> Clone for SortableInput<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unbound => Self::Unbound,
            Self::Target(target) => Self::Target(Rc::clone(target)),
            Self::Group(group) => Self::Group(group.clone()),
        }
    }
}

impl<T> fmt::Debug for SortableInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => f.write_str("Unbound"),
            Self::Target(_) => f.write_str("Target(..)"),
            Self::Group(group) => f.debug_tuple("Group").field(group).finish(),
        }
    }
}

impl<T: Clone + 'static> SortableInput<T> {
    /// Fresh bindings for one event.
    ///
    /// `strict` refuses a target with no sequence capability instead of
    /// degrading it.
    pub fn bindings(&self, strict: bool) -> Result<SequenceBindingGroup<T>, BindingError> {
        match self {
            Self::Unbound => Ok(SequenceBindingGroup::empty()),
            Self::Target(target) if strict => {
                Ok(SequenceBinding::try_new(Rc::clone(target))?.into())
            }
            Self::Target(target) => Ok(SequenceBinding::new(Rc::clone(target)).into()),
            Self::Group(group) => Ok(group.clone()),
        }
    }
}

impl<T: Clone + 'static> From<SharedList<T>> for SortableInput<T> {
    fn from(list: SharedList<T>) -> Self {
        Self::Target(list)
    }
}

impl<T: Clone + PartialEq + 'static> From<Observable<Vec<T>>> for SortableInput<T> {
    fn from(signal: Observable<Vec<T>>) -> Self {
        Self::Target(Rc::new(signal))
    }
}

impl<V: Clone + 'static> From<FormArray<V>> for SortableInput<FormControl<V>> {
    fn from(array: FormArray<V>) -> Self {
        Self::Target(Rc::new(array))
    }
}

impl<T> From<Rc<dyn BindingTarget<T>>> for SortableInput<T> {
    fn from(target: Rc<dyn BindingTarget<T>>) -> Self {
        Self::Target(target)
    }
}

impl<T> From<SequenceBindingGroup<T>> for SortableInput<T> {
    fn from(group: SequenceBindingGroup<T>) -> Self {
        Self::Group(group)
    }
}
