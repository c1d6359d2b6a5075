#![forbid(unsafe_code)]

//! Index-aligned fan-out over parallel bindings.
//!
//! A [`SequenceBindingGroup`] keeps several "columns" in step: position `i`
//! of every payload belongs to binding `i`, and every operation hits the
//! same index in each binding.
//!
//! # Transactions
//!
//! There are none. Mutations apply binding by binding, in order. When a
//! binding fails, the error is returned immediately: earlier bindings stay
//! mutated and later ones are not touched. Callers that need all-or-nothing
//! behavior validate every payload before calling in.

use std::fmt;
use std::rc::Rc;

use crate::binding::SequenceBinding;
use crate::error::BindingError;
use crate::target::BindingTarget;

/// One extracted value per binding; `None` where a binding had nothing at
/// the requested index.
pub type Payload<T> = Vec<Option<T>>;

/// Ordered set of bindings mutated together.
pub struct SequenceBindingGroup<T> {
    bindings: Vec<SequenceBinding<T>>,
}

impl<T> Clone for SequenceBindingGroup<T> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
        }
    }
}

impl<T> fmt::Debug for SequenceBindingGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.bindings.iter()).finish()
    }
}

impl<T> Default for SequenceBindingGroup<T> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<T: Clone + 'static> SequenceBindingGroup<T> {
    #[must_use]
    pub fn new(bindings: Vec<SequenceBinding<T>>) -> Self {
        Self { bindings }
    }

    /// A group with no bindings: every operation is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build one lenient binding per target.
    #[must_use]
    pub fn from_targets(targets: impl IntoIterator<Item = Rc<dyn BindingTarget<T>>>) -> Self {
        Self {
            bindings: targets.into_iter().map(SequenceBinding::new).collect(),
        }
    }

    /// Build one strict binding per target, failing on the first
    /// unrecognized one.
    pub fn try_from_targets(
        targets: impl IntoIterator<Item = Rc<dyn BindingTarget<T>>>,
    ) -> Result<Self, BindingError> {
        let bindings = targets
            .into_iter()
            .map(SequenceBinding::try_new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    /// Whether synchronized-data handling is active at all.
    #[must_use]
    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn bindings(&self) -> &[SequenceBinding<T>] {
        &self.bindings
    }

    /// Insert `items[i]` into binding `i` at `index`.
    ///
    /// Items beyond the number of bindings are ignored; bindings beyond the
    /// number of items are left alone. Best-effort, no rollback.
    pub fn insert_across_all(
        &self,
        index: isize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), BindingError> {
        for (binding, item) in self.bindings.iter().zip(items) {
            binding.insert(index, item)?;
        }
        Ok(())
    }

    /// Like [`Self::insert_across_all`] for a payload that may have gaps:
    /// bindings whose slot is `None` are skipped.
    pub fn inject_payload(&self, index: isize, payload: Payload<T>) -> Result<(), BindingError> {
        for (binding, slot) in self.bindings.iter().zip(payload) {
            if let Some(item) = slot {
                binding.insert(index, item)?;
            }
        }
        Ok(())
    }

    /// Element `i` is `bindings[i].get(index)`.
    #[must_use]
    pub fn get_across_all(&self, index: isize) -> Payload<T> {
        self.bindings.iter().map(|b| b.get(index)).collect()
    }

    /// Remove `index` from every binding, in order.
    pub fn remove_across_all(&self, index: isize) -> Payload<T> {
        self.bindings.iter().map(|b| b.remove(index)).collect()
    }

    /// Move the row at `old` to `new` in every binding.
    ///
    /// Extraction completes across the whole group before injection starts.
    pub fn move_within(&self, old: isize, new: isize) -> Result<(), BindingError> {
        let extracted = self.remove_across_all(old);
        self.inject_payload(new, extracted)
    }
}

impl<T: Clone + 'static> From<SequenceBinding<T>> for SequenceBindingGroup<T> {
    fn from(binding: SequenceBinding<T>) -> Self {
        Self::new(vec![binding])
    }
}

impl<T: Clone + 'static> FromIterator<SequenceBinding<T>> for SequenceBindingGroup<T> {
    fn from_iter<I: IntoIterator<Item = SequenceBinding<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
