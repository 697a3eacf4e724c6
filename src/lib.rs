//! ordered-hash: an ordered, string-keyed map with tombstone deletion,
//! positional access, and a small transform algebra (map, reduce, filter,
//! find, sort, map-reduce).
//!
//! Internal Design:
//!
//! Summary
//! - Goal: dictionary semantics plus array-like indexing and declarative
//!   re-ordering/filtering, without the caller writing loops.
//! - Layers:
//!   - SlotTable<V, S>: structural table of insertion-ordered slots keyed
//!     by `String`. A slot is `Some(value)` while live and `None` once
//!     tombstoned. Lookup goes through a `hashbrown::HashTable` index into
//!     a `slotmap::SlotMap`.
//!   - Container: the self-type contract. Implementors expose their table,
//!     their `Options`, and `with_options` to build an empty instance of
//!     their own kind. All accessors are provided methods.
//!   - Transform / Sort: blanket extensions of `Container` for derived
//!     containers (`map`, `reduce`, `map_reduce`, `filter`, `find`) and
//!     in-place reordering (`sort`, `sort_with`, `sort_by`).
//!   - Hash<V, S>: the base container.
//!
//! Storage model
//! - `del` is O(1): it overwrites the slot with a tombstone and keeps the
//!   key in storage. The live index view (`keys`, `values`, `len`, `at`,
//!   `index`) skips tombstones.
//! - `clean` and `sort` are the only compaction points. `sort` rebuilds the
//!   table from the sorted live entries, so it compacts as a side effect.
//! - `del` on a key that was never set still materializes a tombstone. It
//!   is visible through `slot`, `each` and `raw_len`, never through `keys`.
//!
//! Iteration contracts
//! - `each`, `map`, `reduce` and `map_reduce` see every raw slot in order,
//!   tombstones as `None`.
//! - `filter`, `to_array` and the index view see live entries only.
//! - `find` passes every raw slot to the evaluator (tombstones as `None`)
//!   and copies passing live entries.
//!
//! Ordering
//! - Named comparators form a closed enum (`kasc`, `kdesc`, `asc`, `desc`);
//!   unknown names are an `Error::UnknownComparator`.
//! - Sorting is stable.
//!
//! Notes and non-goals
//! - Single-threaded, no interior mutability, no locking.
//! - No persistence; `Options` and `Pair` are plain data.
//! - `Clone` copies the slot table; values are cloned with `V: Clone`,
//!   so `Rc` values stay shared between the clones.

mod comparator;
mod container;
pub mod error;
mod hash;
mod options;
pub mod path;
pub mod query;
pub mod slot_table;
mod slot_table_proptest;
mod sort;
mod transform;

// Public surface
pub use comparator::{Comparator, Criterion, NaturalOrder, Pair, PathOrder};
pub use container::Container;
pub use error::{Error, Result};
pub use hash::{create, Hash};
pub use options::Options;
pub use path::Resolve;
pub use query::{Query, QueryEvaluator};
pub use sort::Sort;
pub use transform::{Emitter, Transform};

/// Container traits and the types most call sites need.
pub mod prelude {
    pub use crate::{
        Comparator, Container, Criterion, Hash, Options, Pair, PathOrder, Sort, Transform,
    };
}
