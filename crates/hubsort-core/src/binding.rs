#![forbid(unsafe_code)]

//! Uniform insert/get/remove over one sequence target.
//!
//! # Invariants
//!
//! 1. The target kind is probed once in [`SequenceBinding::new`] and never
//!    re-evaluated.
//! 2. A signal-backed target sees exactly one `set` per `insert`/`remove`.
//! 3. `get`/`remove` outside `0..len` return `None` and leave the target
//!    untouched. Negative indices are always out of range.
//! 4. `insert` follows splice rules: a negative index counts back from the
//!    end (floored at 0), an index past the end appends.
//!
//! # Failure Modes
//!
//! - **Unrecognized target**: the lenient constructor degrades to plain
//!   handling, which for a target without list capability turns every
//!   operation into a no-op. [`SequenceBinding::try_new`] reports
//!   [`BindingError::UnrecognizedTarget`] instead.
//! - **Native rejection**: a form array may refuse an insert; the error is
//!   returned as-is.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::error::BindingError;
use crate::target::{BindingTarget, TargetKind};

thread_local! {
    static DEGRADED_WARNED: Cell<bool> = const { Cell::new(false) };
}

/// Adapter over exactly one shared sequence target.
pub struct SequenceBinding<T> {
    target: Rc<dyn BindingTarget<T>>,
    kind: TargetKind,
}

impl<T> Clone for SequenceBinding<T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            kind: self.kind,
        }
    }
}

impl<T> fmt::Debug for SequenceBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceBinding")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> SequenceBinding<T> {
    /// Wrap `target`, classifying it by capability. Never fails.
    #[must_use]
    pub fn new(target: Rc<dyn BindingTarget<T>>) -> Self {
        let kind = TargetKind::probe(&*target);
        if !kind.is_supported_by(&*target) && !DEGRADED_WARNED.replace(true) {
            warn!(
                kind = kind.as_str(),
                "binding target exposes no sequence capability; operations will be no-ops"
            );
        }
        Self { target, kind }
    }

    /// Wrap `target`, refusing one that exposes no sequence capability.
    pub fn try_new(target: Rc<dyn BindingTarget<T>>) -> Result<Self, BindingError> {
        let kind = TargetKind::probe(&*target);
        if kind.is_supported_by(&*target) {
            Ok(Self { target, kind })
        } else {
            Err(BindingError::UnrecognizedTarget)
        }
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The wrapped target.
    #[must_use]
    pub fn target(&self) -> &Rc<dyn BindingTarget<T>> {
        &self.target
    }

    /// Current length of the wrapped sequence (0 when unsupported).
    #[must_use]
    pub fn len(&self) -> usize {
        match self.kind {
            TargetKind::FormSequence => self.target.as_form_array().map_or(0, |f| f.len()),
            TargetKind::SignalBacked => self.target.as_signal().map_or(0, |s| s.get().len()),
            TargetKind::Plain => self.target.as_list().map_or(0, |l| l.len()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `item` at `index`.
    ///
    /// For a form-sequence `item` is the array's own control handle.
    pub fn insert(&self, index: isize, item: T) -> Result<(), BindingError> {
        match self.kind {
            TargetKind::FormSequence => {
                if let Some(form) = self.target.as_form_array() {
                    form.insert(insertion_point(index, form.len()), item)?;
                }
            }
            TargetKind::SignalBacked => {
                if let Some(signal) = self.target.as_signal() {
                    let mut next = signal.get();
                    next.insert(insertion_point(index, next.len()), item);
                    signal.set(next);
                }
            }
            TargetKind::Plain => {
                if let Some(list) = self.target.as_list() {
                    list.insert(insertion_point(index, list.len()), item);
                }
            }
        }
        Ok(())
    }

    /// Element at `index`: the control handle for a form-sequence, the raw
    /// value otherwise.
    #[must_use]
    pub fn get(&self, index: isize) -> Option<T> {
        let index = usize::try_from(index).ok()?;
        match self.kind {
            TargetKind::FormSequence => self.target.as_form_array()?.at(index),
            TargetKind::SignalBacked => self.target.as_signal()?.get().get(index).cloned(),
            TargetKind::Plain => self.target.as_list()?.get(index),
        }
    }

    /// Remove and return the element at `index`, shifting later ones left.
    pub fn remove(&self, index: isize) -> Option<T> {
        match self.kind {
            TargetKind::FormSequence => {
                let form = self.target.as_form_array()?;
                let index = usize::try_from(index).ok()?;
                let control = form.at(index)?;
                form.remove_at(index);
                Some(control)
            }
            TargetKind::SignalBacked => {
                let signal = self.target.as_signal()?;
                let mut next = signal.get();
                let removed = element_index(index, next.len()).map(|i| next.remove(i));
                signal.set(next);
                removed
            }
            TargetKind::Plain => {
                let list = self.target.as_list()?;
                list.remove(usize::try_from(index).ok()?)
            }
        }
    }
}

impl<T: Clone + 'static> From<Rc<dyn BindingTarget<T>>> for SequenceBinding<T> {
    fn from(target: Rc<dyn BindingTarget<T>>) -> Self {
        Self::new(target)
    }
}

/// Splice position for `index` in a sequence of length `len`.
fn insertion_point(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

fn element_index(index: isize, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::target::{FormArrayOps, SignalOps, shared_list};
    use std::cell::RefCell;
    use tracing_test::traced_test;

    /// Signal double that counts wholesale writes.
    struct CountingSignal {
        value: RefCell<Vec<i32>>,
        sets: Cell<u32>,
    }

    impl CountingSignal {
        fn new(items: Vec<i32>) -> Rc<Self> {
            Rc::new(Self {
                value: RefCell::new(items),
                sets: Cell::new(0),
            })
        }
    }

    impl SignalOps<i32> for CountingSignal {
        fn get(&self) -> Vec<i32> {
            self.value.borrow().clone()
        }
        fn set(&self, next: Vec<i32>) {
            self.sets.set(self.sets.get() + 1);
            *self.value.borrow_mut() = next;
        }
    }

    impl BindingTarget<i32> for CountingSignal {
        fn as_signal(&self) -> Option<&dyn SignalOps<i32>> {
            Some(self)
        }
    }

    /// Form double whose controls are `Rc` handles.
    struct Controls {
        items: RefCell<Vec<Rc<str>>>,
        capacity: usize,
    }

    impl FormArrayOps<Rc<str>> for Controls {
        fn len(&self) -> usize {
            self.items.borrow().len()
        }
        fn at(&self, index: usize) -> Option<Rc<str>> {
            self.items.borrow().get(index).cloned()
        }
        fn insert(&self, index: usize, control: Rc<str>) -> Result<(), FormError> {
            let mut items = self.items.borrow_mut();
            if items.len() >= self.capacity {
                return Err(FormError::CapacityExceeded {
                    capacity: self.capacity,
                });
            }
            items.insert(index, control);
            Ok(())
        }
        fn remove_at(&self, index: usize) {
            let mut items = self.items.borrow_mut();
            if index < items.len() {
                items.remove(index);
            }
        }
        fn reset(&self) {}
    }

    impl BindingTarget<Rc<str>> for Controls {
        fn as_form_array(&self) -> Option<&dyn FormArrayOps<Rc<str>>> {
            Some(self)
        }
    }

    struct Opaque;
    impl BindingTarget<i32> for Opaque {}

    #[test]
    fn plain_insert_then_get_returns_item() {
        let list = shared_list([1, 2, 3]);
        let binding = SequenceBinding::<i32>::new(list.clone());
        binding.insert(1, 9).unwrap();
        assert_eq!(binding.get(1), Some(9));
        assert_eq!(*list.borrow(), vec![1, 9, 2, 3]);
    }

    #[test]
    fn signal_insert_then_get_returns_item() {
        let signal = CountingSignal::new(vec![1, 2]);
        let binding = SequenceBinding::<i32>::new(signal.clone());
        assert_eq!(binding.kind(), TargetKind::SignalBacked);
        binding.insert(0, 7).unwrap();
        assert_eq!(binding.get(0), Some(7));
    }

    #[test]
    fn form_insert_then_get_preserves_control_identity() {
        let controls = Rc::new(Controls {
            items: RefCell::new(vec![Rc::from("a"), Rc::from("b")]),
            capacity: 8,
        });
        let binding = SequenceBinding::<Rc<str>>::new(controls.clone());
        assert_eq!(binding.kind(), TargetKind::FormSequence);

        let control: Rc<str> = Rc::from("new");
        binding.insert(1, Rc::clone(&control)).unwrap();
        let fetched = binding.get(1).unwrap();
        assert!(Rc::ptr_eq(&fetched, &control));
    }

    #[test]
    fn form_rejection_is_reported() {
        let controls = Rc::new(Controls {
            items: RefCell::new(vec![Rc::from("a")]),
            capacity: 1,
        });
        let binding = SequenceBinding::<Rc<str>>::new(controls);
        let err = binding.insert(0, Rc::from("b")).unwrap_err();
        assert_eq!(
            err,
            BindingError::Form(FormError::CapacityExceeded { capacity: 1 })
        );
        assert_eq!(binding.len(), 1);
    }

    #[test]
    fn signal_setter_runs_once_per_mutation() {
        let signal = CountingSignal::new(vec![1, 2, 3]);
        let binding = SequenceBinding::<i32>::new(signal.clone());

        binding.insert(3, 4).unwrap();
        assert_eq!(signal.sets.get(), 1);

        assert_eq!(binding.remove(0), Some(1));
        assert_eq!(signal.sets.get(), 2);

        // Reads never write.
        let _ = binding.get(0);
        assert_eq!(signal.sets.get(), 2);
        assert_eq!(signal.get(), vec![2, 3, 4]);
    }

    #[test]
    fn out_of_range_access_is_absent() {
        let list = shared_list([10, 20, 30, 40, 50]);
        let binding = SequenceBinding::<i32>::new(list.clone());

        assert_eq!(binding.get(-1), None);
        assert_eq!(binding.get(100), None);
        assert_eq!(binding.remove(100), None);
        assert_eq!(binding.remove(-1), None);
        assert_eq!(*list.borrow(), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn signal_out_of_range_remove_keeps_value() {
        let signal = CountingSignal::new(vec![1, 2]);
        let binding = SequenceBinding::<i32>::new(signal.clone());
        assert_eq!(binding.remove(5), None);
        assert_eq!(signal.get(), vec![1, 2]);
    }

    #[test]
    fn insert_follows_splice_rules() {
        let list = shared_list(['a', 'b', 'c']);
        let binding = SequenceBinding::<char>::new(list.clone());

        binding.insert(99, 'z').unwrap();
        binding.insert(-1, 'y').unwrap();
        binding.insert(-99, 'x').unwrap();
        assert_eq!(*list.borrow(), vec!['x', 'a', 'b', 'c', 'y', 'z']);
    }

    #[test]
    fn remove_then_insert_restores_all_kinds() {
        let list = shared_list([1, 2, 3, 4]);
        let plain = SequenceBinding::<i32>::new(list.clone());
        let removed = plain.remove(2).unwrap();
        plain.insert(2, removed).unwrap();
        assert_eq!(*list.borrow(), vec![1, 2, 3, 4]);

        let signal = CountingSignal::new(vec![1, 2, 3, 4]);
        let reactive = SequenceBinding::<i32>::new(signal.clone());
        let removed = reactive.remove(0).unwrap();
        reactive.insert(0, removed).unwrap();
        assert_eq!(signal.get(), vec![1, 2, 3, 4]);

        let controls = Rc::new(Controls {
            items: RefCell::new(vec![Rc::from("a"), Rc::from("b")]),
            capacity: 4,
        });
        let form = SequenceBinding::<Rc<str>>::new(controls.clone());
        let before: Vec<Rc<str>> = controls.items.borrow().clone();
        let removed = form.remove(1).unwrap();
        form.insert(1, removed).unwrap();
        let after = controls.items.borrow();
        assert!(before.iter().zip(after.iter()).all(|(a, b)| Rc::ptr_eq(a, b)));
    }

    #[test]
    fn strict_construction_rejects_opaque_target() {
        let err = SequenceBinding::<i32>::try_new(Rc::new(Opaque)).unwrap_err();
        assert_eq!(err, BindingError::UnrecognizedTarget);
        assert!(SequenceBinding::<i32>::try_new(shared_list([1])).is_ok());
    }

    #[traced_test]
    #[test]
    fn lenient_construction_degrades_to_noops() {
        let binding = SequenceBinding::<i32>::new(Rc::new(Opaque));
        assert_eq!(binding.kind(), TargetKind::Plain);
        assert!(binding.insert(0, 1).is_ok());
        assert_eq!(binding.get(0), None);
        assert_eq!(binding.remove(0), None);
        assert!(binding.is_empty());
        assert!(logs_contain("no sequence capability"));
    }

    #[test]
    fn insertion_point_table() {
        assert_eq!(insertion_point(0, 0), 0);
        assert_eq!(insertion_point(2, 5), 2);
        assert_eq!(insertion_point(9, 5), 5);
        assert_eq!(insertion_point(-2, 5), 3);
        assert_eq!(insertion_point(-9, 5), 0);
    }
}
