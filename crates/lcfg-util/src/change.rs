/*
 * change.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Result status for mutating operations.
//!
//! Mutators in the core return `Result<Change, E>`. The error arm carries the
//! failure; `Ok` says whether anything actually happened, which lets callers
//! skip needless work (re-serialising, re-hashing) when a merge was a no-op.

use std::fmt;

/// What a successful mutation did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Change {
    /// Nothing changed.
    #[default]
    None,

    /// A new element was added.
    Added,

    /// An existing element was modified in place or via copy-on-write.
    Modified,

    /// An existing element was swapped for a different one.
    Replaced,

    /// An element was removed.
    Removed,
}

impl Change {
    /// True for every variant except [`Change::None`].
    pub fn is_changed(self) -> bool {
        self != Change::None
    }

    /// Fold two results from a compound operation.
    ///
    /// Any real change wins over `None`; two different kinds of change
    /// collapse to `Modified`.
    pub fn merge(self, other: Change) -> Change {
        match (self, other) {
            (Change::None, other) => other,
            (this, Change::None) => this,
            (this, other) if this == other => this,
            _ => Change::Modified,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Change::None => "none",
            Change::Added => "added",
            Change::Modified => "modified",
            Change::Replaced => "replaced",
            Change::Removed => "removed",
        };
        f.write_str(s)
    }
}
