#![forbid(unsafe_code)]

//! Signal-backed sequences.
//!
//! [`Observable`] is the reactive container bindings treat as signal-backed;
//! [`BatchScope`] coalesces its notifications across a multi-step edit.

mod batch;
mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
