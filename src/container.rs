//! Container: the self-type contract every hash-like type implements.
//!
//! Implementors supply access to a `SlotTable`, their `Options`, and a way to
//! make a new empty instance of their own kind. Everything else, the
//! accessors here plus `Transform` and `Sort`, is provided on top and hands
//! back `Self`, so a wrapper type stays a wrapper through `map`, `filter`,
//! `find` and `map_reduce`.

use crate::comparator::Pair;
use crate::options::Options;
use crate::slot_table::SlotTable;
use core::hash::BuildHasher;

pub trait Container: Sized {
    type Value;
    type Hasher: BuildHasher + Clone + Default;

    fn table(&self) -> &SlotTable<Self::Value, Self::Hasher>;
    fn table_mut(&mut self) -> &mut SlotTable<Self::Value, Self::Hasher>;
    fn options(&self) -> &Options;

    /// A new, empty container of the implementing type carrying `options`.
    fn with_options(options: Options) -> Self;

    fn empty_like(&self) -> Self {
        Self::with_options(self.options().clone())
    }

    /// Number of live entries.
    fn len(&self) -> usize {
        self.table().live_len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored slots, tombstones included.
    fn raw_len(&self) -> usize {
        self.table().len()
    }

    /// Number of tombstoned slots awaiting `clean` or `sort`.
    fn tombstones(&self) -> usize {
        self.table().dead_len()
    }

    /// Live entries in iteration order.
    fn entries(&self) -> impl Iterator<Item = (&str, &Self::Value)> + '_ {
        self.table()
            .iter()
            .filter_map(|(k, slot)| slot.map(|v| (k, v)))
    }

    fn keys(&self) -> Vec<&str> {
        self.entries().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<&Self::Value> {
        self.entries().map(|(_, v)| v).collect()
    }

    fn set(&mut self, key: impl Into<String>, value: Self::Value) -> &mut Self {
        self.table_mut().upsert(key.into(), Some(value));
        self
    }

    fn get(&self, key: &str) -> Option<&Self::Value> {
        self.table().get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Self::Value> {
        self.table_mut().get_mut(key)
    }

    /// Raw slot: `None` if the key was never stored, `Some(None)` if deleted.
    fn slot(&self, key: &str) -> Option<Option<&Self::Value>> {
        self.table().slot(key)
    }

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Tombstones `key`. The slot stays in storage until `clean` or `sort`;
    /// a key that was never set gets a tombstone of its own.
    fn del(&mut self, key: &str) -> &mut Self {
        self.table_mut().tombstone(key);
        self
    }

    fn flush(&mut self) -> &mut Self {
        tracing::trace!(slots = self.raw_len(), "flush");
        self.table_mut().clear();
        self
    }

    /// Drops tombstones, keeping live entries in iteration order.
    fn clean(&mut self) -> &mut Self {
        let removed = self.table_mut().compact();
        tracing::trace!(removed, live = self.len(), "clean");
        self
    }

    /// Value at `index` of the live index view.
    fn at(&self, index: usize) -> Option<&Self::Value> {
        self.entries().nth(index).map(|(_, v)| v)
    }

    /// Position of `key` in the live index view.
    fn index(&self, key: &str) -> Option<usize> {
        self.entries().position(|(k, _)| k == key)
    }

    fn to_array(&self) -> Vec<Pair<Self::Value>>
    where
        Self::Value: Clone,
    {
        self.entries()
            .map(|(k, v)| Pair::new(k, v.clone()))
            .collect()
    }

    fn from_array<I>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = Pair<Self::Value>>,
    {
        for Pair { key, value } in pairs {
            self.table_mut().upsert(key, Some(value));
        }
        self
    }

    /// Like `from_array`, skipping entries without a value.
    fn from_slots<K, I>(&mut self, slots: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Self::Value>)>,
    {
        for (key, value) in slots {
            if let Some(value) = value {
                self.set(key, value);
            }
        }
        self
    }

    /// Calls `f(slot, key, ordinal)` for every stored slot, tombstones included.
    fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(Option<&Self::Value>, &str, usize),
    {
        for (i, (key, slot)) in self.table().iter().enumerate() {
            f(slot, key, i);
        }
        self
    }
}
