//! SlotTable: structural layer with insertion-ordered slots, tombstones and
//! stable handles.
//!
//! Every key that was ever `upsert`ed owns exactly one slot. A slot holds
//! `Some(value)` while live and `None` once tombstoned; slots are only
//! dropped wholesale by `clear` or `take_live`, which install a fresh
//! `SlotMap` so later inserts keep appending in order.

use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    slot: Option<V>,
    hash: u64,
}

#[derive(Clone)]
pub struct SlotTable<V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<V>>, // insertion ordered, never removed from individually
    dead: usize,
}

impl<V> SlotTable<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<V> Default for SlotTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, S> fmt::Debug for SlotTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.slot)))
            .finish()
    }
}

/// Iterator over the raw slots of a `SlotTable`, tombstones included.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, Option<&'a V>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(_k, e)| (e.key.as_str(), e.slot.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V, S> SlotTable<V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            dead: 0,
        }
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of tombstoned slots.
    pub fn dead_len(&self) -> usize {
        self.dead
    }

    pub fn live_len(&self) -> usize {
        self.slots.len() - self.dead
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    fn handle_slot(&self, h: Handle) -> Option<Option<&V>> {
        self.slots.get(h.raw_handle()).map(|e| e.slot.as_ref())
    }
}

impl<V, S> SlotTable<V, S>
where
    S: BuildHasher + Clone + Default,
{
    fn make_hash(&self, key: &str) -> u64 {
        self.hasher.hash_one(key)
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        let hash = self.make_hash(key);
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key == key)
                    .unwrap_or(false)
            })
            .map(|&k| Handle::new(k))
    }

    /// True when `key` owns a slot, live or tombstoned.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Raw slot for `key`: `None` if never stored, `Some(None)` if tombstoned.
    pub fn slot(&self, key: &str) -> Option<Option<&V>> {
        let h = self.find(key)?;
        self.handle_slot(h)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.slot(key).flatten()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let h = self.find(key)?;
        self.slots
            .get_mut(h.raw_handle())
            .and_then(|e| e.slot.as_mut())
    }

    /// Store `slot` under `key`, overwriting in place or appending a new slot.
    /// Returns the handle and the previous slot contents.
    pub fn upsert(&mut self, key: String, slot: Option<V>) -> (Handle, Option<V>) {
        let hash = self.make_hash(&key);
        let now_dead = slot.is_none();
        match self.index.entry(
            hash,
            |&kk| {
                self.slots
                    .get(kk)
                    .map(|e| e.key == key)
                    .unwrap_or(false)
            },
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => {
                let k = *o.get();
                let entry = match self.slots.get_mut(k) {
                    Some(entry) => entry,
                    None => unreachable!("index refers to a missing slot"),
                };
                let was_dead = entry.slot.is_none();
                let prev = core::mem::replace(&mut entry.slot, slot);
                match (was_dead, now_dead) {
                    (true, false) => self.dead -= 1,
                    (false, true) => self.dead += 1,
                    _ => {}
                }
                (Handle::new(k), prev)
            }
            hashbrown::hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(Entry { key, slot, hash });
                let _ = v.insert(k);
                if now_dead {
                    self.dead += 1;
                }
                (Handle::new(k), None)
            }
        }
    }

    /// Tombstone `key`, materializing a slot if it was never stored.
    pub fn tombstone(&mut self, key: &str) -> Option<V> {
        self.upsert(key.to_owned(), None).1
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.slots = SlotMap::with_key();
        self.index = HashTable::new();
        self.dead = 0;
    }

    /// Move every live entry out in slot order, leaving the table empty.
    pub fn take_live(&mut self) -> Vec<(String, V)> {
        let slots = core::mem::replace(&mut self.slots, SlotMap::with_key());
        self.index = HashTable::new();
        self.dead = 0;
        slots
            .into_iter()
            .filter_map(|(_, e)| e.slot.map(|v| (e.key, v)))
            .collect()
    }

    /// Drop tombstones, keeping live entries in order. Returns how many were dropped.
    pub fn compact(&mut self) -> usize {
        let dropped = self.dead;
        if dropped == 0 {
            return 0;
        }
        for (key, value) in self.take_live() {
            self.upsert(key, Some(value));
        }
        dropped
    }
}
