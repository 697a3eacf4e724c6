//! Sort: in-place reordering.
//!
//! Every sort is a rebuild: live entries are taken out in order, stably
//! sorted, and the table is repopulated. Tombstones never survive a sort.

use crate::comparator::{Criterion, NaturalOrder, Pair, PathOrder};
use crate::container::Container;
use crate::path::Resolve;
use core::cmp::Ordering;

pub trait Sort: Container {
    /// Sorts by a named comparator or a custom pair comparator.
    /// `Criterion::default()` is key ascending (`kasc`).
    fn sort<'a>(&mut self, criterion: impl Into<Criterion<'a, Self::Value>>) -> &mut Self
    where
        Self::Value: NaturalOrder + 'a,
    {
        let criterion = criterion.into();
        tracing::trace!(criterion = criterion.label(), entries = self.len(), "sort");
        match criterion {
            Criterion::Named(c) => self.sort_with(|a, b| c.compare(a, b)),
            Criterion::Custom(mut f) => self.sort_with(|a, b| f(a, b)),
        }
    }

    /// Sorts with a custom comparator over whole entries.
    fn sort_with<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut(&Pair<Self::Value>, &Pair<Self::Value>) -> Ordering,
    {
        let mut pairs: Vec<Pair<Self::Value>> = self
            .table_mut()
            .take_live()
            .into_iter()
            .map(|(key, value)| Pair { key, value })
            .collect();
        pairs.sort_by(|a, b| compare(a, b));
        self.flush().from_array(pairs)
    }

    /// Sorts by the value resolved at `path` on each entry.
    fn sort_by<'a>(&mut self, path: &str, order: impl Into<PathOrder<'a, Self::Value>>) -> &mut Self
    where
        Self::Value: Resolve + NaturalOrder + 'a,
    {
        let mut order = order.into();
        tracing::trace!(path, ?order, entries = self.len(), "sort_by");
        self.sort_with(|a, b| order.compare(a.value.resolve(path), b.value.resolve(path)))
    }
}

impl<C: Container> Sort for C {}
