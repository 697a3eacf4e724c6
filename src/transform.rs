//! Transform: derived containers built from an existing one.
//!
//! `map`, `reduce` and `map_reduce` visit every stored slot, tombstones
//! included, in slot order. `filter` visits live entries only. `find` hands
//! every slot to the evaluator but only copies live entries.

use crate::container::Container;
use crate::path::Resolve;
use crate::query::QueryEvaluator;
use crate::slot_table::SlotTable;
use core::ops::Add;

/// Collects `map_reduce` contributions per group, in order of first emission.
pub struct Emitter<G> {
    groups: SlotTable<Vec<G>>,
}

impl<G> Emitter<G> {
    fn new() -> Self {
        Self {
            groups: SlotTable::new(),
        }
    }

    pub fn emit(&mut self, group: impl Into<String>, contribution: G) {
        let group = group.into();
        match self.groups.get_mut(&group) {
            Some(seq) => seq.push(contribution),
            None => {
                self.groups.upsert(group, Some(vec![contribution]));
            }
        }
    }
}

pub trait Transform: Container {
    /// A new container holding `f(slot, key, ordinal)` for every stored slot
    /// under the same key. Returning `None` tombstones the key in the result.
    fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Option<&Self::Value>, &str, usize) -> Option<Self::Value>,
    {
        let mut out = self.empty_like();
        for (i, (key, slot)) in self.table().iter().enumerate() {
            let mapped = f(slot, key, i);
            out.table_mut().upsert(key.to_owned(), mapped);
        }
        out
    }

    /// Additive fold: `initial + Σ f(slot, key, ordinal)`. A missing initial
    /// value starts from `N::default()`.
    fn reduce<N, F>(&self, initial: Option<N>, mut f: F) -> N
    where
        N: Add<Output = N> + Default,
        F: FnMut(Option<&Self::Value>, &str, usize) -> N,
    {
        self.table()
            .iter()
            .enumerate()
            .fold(initial.unwrap_or_default(), |acc, (i, (key, slot))| {
                acc + f(slot, key, i)
            })
    }

    /// Groups contributions emitted by `map_fn` and stores `reduce_fn(group,
    /// contributions)` under each group key, in order of first emission.
    fn map_reduce<G, M, R>(&self, mut map_fn: M, mut reduce_fn: R) -> Self
    where
        M: FnMut(&str, Option<&Self::Value>, &mut Emitter<G>),
        R: FnMut(&str, Vec<G>) -> Self::Value,
    {
        let mut emitter = Emitter::new();
        for (key, slot) in self.table().iter() {
            map_fn(key, slot, &mut emitter);
        }

        let groups = emitter.groups.take_live();
        tracing::trace!(groups = groups.len(), "map_reduce");

        let mut out = self.empty_like();
        for (group, contributions) in groups {
            let value = reduce_fn(&group, contributions);
            out.set(group, value);
        }
        out
    }

    /// A new container with the live entries for which `f(value, key, index)`
    /// is true, in order. `index` is the position in the live index view.
    fn filter<F>(&self, mut f: F) -> Self
    where
        Self::Value: Clone,
        F: FnMut(&Self::Value, &str, usize) -> bool,
    {
        let mut out = self.empty_like();
        for (i, (key, value)) in self.entries().enumerate() {
            if f(value, key, i) {
                out.set(key, value.clone());
            }
        }
        out
    }

    /// A new container with the live entries `query` passes.
    ///
    /// Each slot's subject is its value, or the value at `options.find_root`
    /// when one is configured. A slot without a verdict counts as failing;
    /// verdicts past the last slot are ignored. Evaluator errors are returned
    /// unchanged.
    fn find<Q>(&self, query: &Q) -> Result<Self, Q::Error>
    where
        Self::Value: Resolve + Clone,
        Q: QueryEvaluator<Self::Value> + ?Sized,
    {
        let root = self.options().find_root.as_deref();
        let subjects: Vec<Option<&Self::Value>> = self
            .table()
            .iter()
            .map(|(_k, slot)| match root {
                Some(path) => slot.and_then(|v| v.resolve(path)),
                None => slot,
            })
            .collect();
        let verdicts = query.pass(&subjects)?;

        let mut out = self.empty_like();
        for (i, (key, slot)) in self.table().iter().enumerate() {
            let pass = verdicts.get(i).copied().unwrap_or(false);
            if let (true, Some(value)) = (pass, slot) {
                out.set(key, value.clone());
            }
        }
        tracing::trace!(subjects = subjects.len(), matched = out.len(), "find");
        Ok(out)
    }
}

impl<C: Container> Transform for C {}
