#![forbid(unsafe_code)]

//! Deciding whether a drag out of a region copies or moves.
//!
//! The decision is resolved once per event from the region's `group`
//! option:
//!
//! 1. a pull predicate exists: [`ClonePolicy::PredicateDecided`], asked per
//!    drag;
//! 2. else `pull` is the clone mode: [`ClonePolicy::AlwaysClone`];
//! 3. else [`ClonePolicy::NeverClone`].
//!
//! # Failure Modes
//!
//! A predicate that returns `Err` is logged at `debug!` and treated as a
//! move. Nothing escapes [`ClonePolicy::is_cloning`].

use std::fmt;

use tracing::debug;

use crate::options::{GroupOption, Pull, PullPredicate};

/// Outcome of a pull check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PullMode {
    /// The item leaves the source.
    Move,
    /// The source keeps the original and the destination receives a copy.
    Clone,
    /// The drag may not leave the source.
    Deny,
}

impl PullMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Clone => "clone",
            Self::Deny => "deny",
        }
    }
}

/// What a pull predicate gets to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullContext<'a> {
    /// Group name of the region the item is leaving.
    pub group: Option<&'a str>,
    /// Index the item had in the source, if known.
    pub old_index: Option<usize>,
}

/// Three-way clone decision.
#[derive(Clone, Default)]
pub enum ClonePolicy {
    AlwaysClone,
    #[default]
    NeverClone,
    PredicateDecided(PullPredicate),
}

impl fmt::Debug for ClonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysClone => f.write_str("AlwaysClone"),
            Self::NeverClone => f.write_str("NeverClone"),
            Self::PredicateDecided(_) => f.write_str("PredicateDecided(<predicate>)"),
        }
    }
}

impl ClonePolicy {
    /// Resolve from a region's `group` option.
    #[must_use]
    pub fn resolve(group: Option<&GroupOption>) -> Self {
        match group.and_then(GroupOption::policy).map(|p| &p.pull) {
            Some(Pull::Decide(predicate)) => Self::PredicateDecided(predicate.clone()),
            Some(Pull::Clone) => Self::AlwaysClone,
            _ => Self::NeverClone,
        }
    }

    /// Whether the drag described by `ctx` is a copy.
    #[must_use]
    pub fn is_cloning(&self, ctx: &PullContext<'_>) -> bool {
        match self {
            Self::AlwaysClone => true,
            Self::NeverClone => false,
            Self::PredicateDecided(predicate) => match predicate(ctx) {
                Ok(mode) => mode == PullMode::Clone,
                Err(err) => {
                    debug!(error = %err, group = ctx.group, "pull check failed; treating as move");
                    false
                }
            },
        }
    }
}
