//! Hash: the base container.

use crate::container::Container;
use crate::options::Options;
use crate::slot_table::SlotTable;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

/// An ordered, string-keyed map with tombstone deletion.
///
/// Iteration follows insertion order, or the order of the last `sort`.
/// `del` only tombstones a slot; `clean` and `sort` compact.
///
/// ```
/// use ordered_hash::prelude::*;
///
/// let mut h = ordered_hash::create([("arthur", "dent"), ("ford", "prefect")], Options::new());
/// h.del("arthur");
/// assert_eq!(h.keys(), ["ford"]);
/// assert_eq!(h.raw_len(), 2);
/// h.clean();
/// assert_eq!(h.raw_len(), 1);
/// ```
#[derive(Clone)]
pub struct Hash<V, S = RandomState> {
    table: SlotTable<V, S>,
    options: Options,
}

impl<V> Hash<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default(), Options::default())
    }

    /// Builds a hash holding `entries` in order; later duplicates overwrite.
    pub fn from_entries<K, I>(entries: I, options: Options) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut h = Self::with_hasher(Default::default(), options);
        h.extend(entries);
        h
    }
}

impl<V, S> Hash<V, S> {
    pub fn with_hasher(hasher: S, options: Options) -> Self {
        Self {
            table: SlotTable::with_hasher(hasher),
            options,
        }
    }
}

impl<V, S> Container for Hash<V, S>
where
    S: BuildHasher + Clone + Default,
{
    type Value = V;
    type Hasher = S;

    fn table(&self) -> &SlotTable<V, S> {
        &self.table
    }

    fn table_mut(&mut self) -> &mut SlotTable<V, S> {
        &mut self.table
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn with_options(options: Options) -> Self {
        Self::with_hasher(S::default(), options)
    }
}

impl<V> Default for Hash<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, S> fmt::Debug for Hash<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.table
                    .iter()
                    .filter_map(|(k, slot)| slot.map(|v| (k, v))),
            )
            .finish()
    }
}

impl<K, V, S> Extend<(K, V)> for Hash<V, S>
where
    K: Into<String>,
    S: BuildHasher + Clone + Default,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Hash<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter, Options::default())
    }
}

/// Factory: a `Hash` pre-populated from `entries` with `options`.
pub fn create<V, K, I>(entries: I, options: Options) -> Hash<V>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    Hash::from_entries(entries, options)
}
