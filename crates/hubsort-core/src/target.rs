#![forbid(unsafe_code)]

//! Capability surface of the sequences a binding can wrap.
//!
//! # Design
//!
//! A binding target never declares what it is. Instead it answers three
//! capability queries on [`BindingTarget`], each defaulting to "not
//! supported":
//!
//! | query              | capability                                    |
//! |--------------------|-----------------------------------------------|
//! | `as_form_array()`  | element-at, insert-at, remove-at and reset    |
//! | `as_signal()`      | read whole value, replace whole value         |
//! | `as_list()`        | positional get/insert/remove on a plain list  |
//!
//! [`TargetKind::probe`] turns the answers into a closed tag once, at
//! binding construction, in the order form array, signal, plain. A form
//! array may well also look like a list, which is why it is asked first.
//!
//! Every method takes `&self`: targets are shared with the host that
//! renders them, so mutation goes through interior mutability.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::FormError;

/// Positional access to a plain ordered collection.
pub trait ListOps<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<T>;

    /// Insert at `index`, shifting later elements right. `index` is
    /// already clamped to `0..=len()`.
    fn insert(&self, index: usize, item: T);

    /// Remove and return the element at `index`, or `None` past the end.
    fn remove(&self, index: usize) -> Option<T>;
}

/// Native operations of a collection of stateful field controls.
///
/// Controls carry their own validation and dirty state, so they are moved
/// with these operations rather than by splicing copies.
pub trait FormArrayOps<T> {
    /// Number of controls.
    fn len(&self) -> usize;

    /// Control handle at `index`, or `None` past the end.
    fn at(&self, index: usize) -> Option<T>;

    /// Insert a control at `index` (already clamped to `0..=len()`).
    fn insert(&self, index: usize, control: T) -> Result<(), FormError>;

    /// Remove the control at `index`. Out of range is a no-op.
    fn remove_at(&self, index: usize);

    /// Reset every control to its initial state.
    fn reset(&self);
}

/// A reactive container holding a whole sequence.
///
/// There is no element-level mutation: every structural change computes a
/// new sequence and hands it to [`SignalOps::set`] once.
pub trait SignalOps<T> {
    /// Current value.
    fn get(&self) -> Vec<T>;

    /// Replace the value wholesale.
    fn set(&self, next: Vec<T>);
}

/// Capability probe implemented by anything a binding can wrap.
pub trait BindingTarget<T> {
    fn as_form_array(&self) -> Option<&dyn FormArrayOps<T>> {
        None
    }

    fn as_signal(&self) -> Option<&dyn SignalOps<T>> {
        None
    }

    fn as_list(&self) -> Option<&dyn ListOps<T>> {
        None
    }
}

/// Which representation a binding dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Plain,
    FormSequence,
    SignalBacked,
}

impl TargetKind {
    /// Classify a target. First match wins; anything unrecognized is
    /// [`TargetKind::Plain`].
    #[must_use]
    pub fn probe<T>(target: &dyn BindingTarget<T>) -> Self {
        if target.as_form_array().is_some() {
            Self::FormSequence
        } else if target.as_signal().is_some() {
            Self::SignalBacked
        } else {
            Self::Plain
        }
    }

    /// Whether `target` answers the capability query this kind dispatches to.
    #[must_use]
    pub fn is_supported_by<T>(self, target: &dyn BindingTarget<T>) -> bool {
        match self {
            Self::FormSequence => target.as_form_array().is_some(),
            Self::SignalBacked => target.as_signal().is_some(),
            Self::Plain => target.as_list().is_some(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::FormSequence => "form-sequence",
            Self::SignalBacked => "signal-backed",
        }
    }
}

// ---------------------------------------------------------------------------
// Plain lists
// ---------------------------------------------------------------------------

/// A plain list shared between the host and its bindings.
pub type SharedList<T> = Rc<RefCell<Vec<T>>>;

/// Wrap `items` as a [`SharedList`].
#[must_use]
pub fn shared_list<T>(items: impl IntoIterator<Item = T>) -> SharedList<T> {
    Rc::new(RefCell::new(items.into_iter().collect()))
}

impl<T: Clone> ListOps<T> for RefCell<Vec<T>> {
    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.borrow().get(index).cloned()
    }

    fn insert(&self, index: usize, item: T) {
        let mut items = self.borrow_mut();
        let index = index.min(items.len());
        items.insert(index, item);
    }

    fn remove(&self, index: usize) -> Option<T> {
        let mut items = self.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }
}

impl<T: Clone> BindingTarget<T> for RefCell<Vec<T>> {
    fn as_list(&self) -> Option<&dyn ListOps<T>> {
        Some(self)
    }
}
