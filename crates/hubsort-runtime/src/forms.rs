#![forbid(unsafe_code)]

//! Stateful field controls and arrays of them.
//!
//! A [`FormControl`] is a shared handle: cloning it does not copy the
//! field, and two handles compare equal only when they are the same
//! control. That is what lets a drag move a control between arrays while
//! its dirty/touched state and validators travel with it.
//!
//! A [`FormArray`] is a form-sequence binding target. Bindings move its
//! controls with the array's own insert/remove operations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hubsort_core::{BindingTarget, FormArrayOps, FormError};

/// Validation rule: `Some(message)` when the value is invalid.
pub type Validator<V> = Rc<dyn Fn(&V) -> Option<String>>;

struct ControlState<V> {
    value: V,
    initial: V,
    dirty: bool,
    touched: bool,
    validators: Vec<Validator<V>>,
}

/// Shared handle to one field.
pub struct FormControl<V> {
    state: Rc<RefCell<ControlState<V>>>,
}

impl<V> Clone for FormControl<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V> PartialEq for FormControl<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<V: fmt::Debug> fmt::Debug for FormControl<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FormControl")
            .field("value", &state.value)
            .field("dirty", &state.dirty)
            .field("touched", &state.touched)
            .finish_non_exhaustive()
    }
}

impl<V: Clone + 'static> FormControl<V> {
    #[must_use]
    pub fn new(value: V) -> Self {
        Self {
            state: Rc::new(RefCell::new(ControlState {
                initial: value.clone(),
                value,
                dirty: false,
                touched: false,
                validators: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn with_validator(self, validator: impl Fn(&V) -> Option<String> + 'static) -> Self {
        self.state.borrow_mut().validators.push(Rc::new(validator));
        self
    }

    #[must_use]
    pub fn value(&self) -> V {
        self.state.borrow().value.clone()
    }

    /// Write a new value and mark the control dirty.
    pub fn set_value(&self, value: V) {
        let mut state = self.state.borrow_mut();
        state.value = value;
        state.dirty = true;
    }

    pub fn mark_touched(&self) {
        self.state.borrow_mut().touched = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.state.borrow().touched
    }

    /// Messages of every failing validator, in registration order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let (value, validators) = {
            let state = self.state.borrow();
            (state.value.clone(), state.validators.clone())
        };
        validators.iter().filter_map(|v| v(&value)).collect()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Back to the initial value, pristine and untouched.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.value = state.initial.clone();
        state.dirty = false;
        state.touched = false;
    }
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

struct ArrayState<V> {
    controls: Vec<FormControl<V>>,
    capacity: Option<usize>,
}

/// Ordered, optionally bounded collection of controls.
pub struct FormArray<V> {
    state: Rc<RefCell<ArrayState<V>>>,
}

impl<V> Clone for FormArray<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for FormArray<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FormArray")
            .field("controls", &state.controls)
            .field("capacity", &state.capacity)
            .finish()
    }
}

impl<V: Clone + 'static> FormArray<V> {
    #[must_use]
    pub fn new(controls: Vec<FormControl<V>>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ArrayState {
                controls,
                capacity: None,
            })),
        }
    }

    /// One fresh control per value.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(FormControl::new).collect())
    }

    /// Refuse inserts once `capacity` controls are held.
    #[must_use]
    pub fn with_capacity_limit(self, capacity: usize) -> Self {
        self.state.borrow_mut().capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().controls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<FormControl<V>> {
        self.state.borrow().controls.get(index).cloned()
    }

    /// Insert `control` at `index`, clamped to the end.
    pub fn insert(&self, index: usize, control: FormControl<V>) -> Result<(), FormError> {
        let mut state = self.state.borrow_mut();
        if let Some(capacity) = state.capacity
            && state.controls.len() >= capacity
        {
            return Err(FormError::CapacityExceeded { capacity });
        }
        let index = index.min(state.controls.len());
        state.controls.insert(index, control);
        Ok(())
    }

    pub fn push(&self, control: FormControl<V>) -> Result<(), FormError> {
        let len = self.len();
        self.insert(len, control)
    }

    /// Drop the control at `index`; out of range is a no-op.
    pub fn remove_at(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        if index < state.controls.len() {
            state.controls.remove(index);
        }
    }

    /// Current value of every control, in order.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.controls().iter().map(FormControl::value).collect()
    }

    /// Snapshot of the control handles.
    #[must_use]
    pub fn controls(&self) -> Vec<FormControl<V>> {
        self.state.borrow().controls.clone()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.controls().iter().all(FormControl::is_valid)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.controls().iter().any(FormControl::is_dirty)
    }

    pub fn reset(&self) {
        for control in self.controls() {
            control.reset();
        }
    }
}

impl<V: Clone + 'static> FormArrayOps<FormControl<V>> for FormArray<V> {
    fn len(&self) -> usize {
        FormArray::len(self)
    }

    fn at(&self, index: usize) -> Option<FormControl<V>> {
        FormArray::at(self, index)
    }

    fn insert(&self, index: usize, control: FormControl<V>) -> Result<(), FormError> {
        FormArray::insert(self, index, control)
    }

    fn remove_at(&self, index: usize) {
        FormArray::remove_at(self, index);
    }

    fn reset(&self) {
        FormArray::reset(self);
    }
}

impl<V: Clone + 'static> BindingTarget<FormControl<V>> for FormArray<V> {
    fn as_form_array(&self) -> Option<&dyn FormArrayOps<FormControl<V>>> {
        Some(self)
    }
}
