#![forbid(unsafe_code)]

//! Error types for the binding layer.

use thiserror::Error;

use crate::options::OptionName;

/// Failure reported by a form array's native mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The array refuses new controls once it holds `capacity` of them.
    #[error("form array is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}

/// Failure of a single binding operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Strict construction was requested and the target exposes no
    /// sequence capability at all.
    #[error("target exposes no sequence capability")]
    UnrecognizedTarget,

    /// The underlying form array rejected the mutation.
    #[error("form array rejected the control: {0}")]
    Form(#[from] FormError),
}

/// A user pull predicate failed while deciding whether a drag clones.
///
/// Never propagated past the clone policy: a failed check means "move".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pull check failed: {reason}")]
pub struct PullCheckError {
    pub reason: String,
}

impl PullCheckError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// An option value of the wrong shape was assigned to an option name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option `{name}` expects a {expected} value, got {found}")]
pub struct OptionTypeError {
    pub name: OptionName,
    pub expected: &'static str,
    pub found: &'static str,
}
