//! Association set arithmetic
//!
//! Association endpoints replace the whole set. [`AssociationDiff`] describes
//! what a replacement does relative to the current set, so a consumer can
//! preview or report it. It never issues requests on its own.

use std::collections::BTreeSet;

/// Anything the backend identifies by a numeric id
pub trait Identified {
    fn id(&self) -> i64;
}

/// Ids of a slice of entities, in order
pub fn ids_of<T: Identified>(items: &[T]) -> Vec<i64> {
    items.iter().map(Identified::id).collect()
}

/// Effect of replacing `current` with `desired`
///
/// All three lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationDiff {
    /// In `desired` only
    pub added: Vec<i64>,
    /// In `current` only; dropped by the replacement
    pub removed: Vec<i64>,
    /// In both
    pub kept: Vec<i64>,
}

impl AssociationDiff {
    pub fn between<C, D>(current: C, desired: D) -> Self
    where
        C: IntoIterator<Item = i64>,
        D: IntoIterator<Item = i64>,
    {
        let current: BTreeSet<i64> = current.into_iter().collect();
        let desired: BTreeSet<i64> = desired.into_iter().collect();

        Self {
            added: desired.difference(&current).copied().collect(),
            removed: current.difference(&desired).copied().collect(),
            kept: current.intersection(&desired).copied().collect(),
        }
    }

    /// Diff from the entities currently associated to a desired id set.
    pub fn from_entities<T: Identified>(current: &[T], desired: &[i64]) -> Self {
        Self::between(current.iter().map(Identified::id), desired.iter().copied())
    }

    /// True when replacing would leave the set unchanged.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The set after the replacement, sorted.
    pub fn resulting(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.kept.iter().chain(&self.added).copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Display for AssociationDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} -{} ={}",
            self.added.len(),
            self.removed.len(),
            self.kept.len()
        )
    }
}
