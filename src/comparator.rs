//! Comparator table and ordering criteria for `sort` / `sort_by`.

use crate::error::{Error, Result};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde_json::Value;

/// A live key/value entry, as produced by `to_array` and seen by sort comparators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<V> {
    pub key: String,
    pub value: V,
}

impl<V> Pair<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Natural ordering over directly comparable values.
///
/// `None` marks a pair with no meaningful order (objects, mixed kinds); the
/// comparators treat such pairs as equal.
pub trait NaturalOrder {
    fn natural_cmp(&self, other: &Self) -> Option<Ordering>;
}

impl NaturalOrder for Value {
    fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

macro_rules! impl_natural_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl NaturalOrder for $t {
                #[inline]
                fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
                    self.partial_cmp(other)
                }
            }
        )*
    };
}

impl_natural_ord!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

fn natural<V: NaturalOrder>(a: &V, b: &V) -> Ordering {
    a.natural_cmp(b).unwrap_or(Ordering::Equal)
}

/// The named comparators: `kasc`, `kdesc`, `asc`, `desc`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Comparator {
    /// `kasc`: key ascending.
    #[default]
    KeyAsc,
    /// `kdesc`: key descending.
    KeyDesc,
    /// `asc`: value ascending.
    Asc,
    /// `desc`: value descending.
    Desc,
}

impl Comparator {
    pub const ALL: [Comparator; 4] = [
        Comparator::KeyAsc,
        Comparator::KeyDesc,
        Comparator::Asc,
        Comparator::Desc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Comparator::KeyAsc => "kasc",
            Comparator::KeyDesc => "kdesc",
            Comparator::Asc => "asc",
            Comparator::Desc => "desc",
        }
    }

    pub fn compare<V: NaturalOrder>(self, a: &Pair<V>, b: &Pair<V>) -> Ordering {
        match self {
            Comparator::KeyAsc => a.key.cmp(&b.key),
            Comparator::KeyDesc => b.key.cmp(&a.key),
            Comparator::Asc => natural(&a.value, &b.value),
            Comparator::Desc => natural(&b.value, &a.value),
        }
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownComparator(s.to_owned()))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type PairCmp<'a, V> = Box<dyn FnMut(&Pair<V>, &Pair<V>) -> Ordering + 'a>;
type PathCmp<'a, V> = Box<dyn FnMut(Option<&V>, Option<&V>) -> Ordering + 'a>;

/// How `sort` orders entries: a named comparator or a custom pair comparator.
pub enum Criterion<'a, V> {
    Named(Comparator),
    Custom(PairCmp<'a, V>),
}

impl<'a, V> Criterion<'a, V> {
    pub fn named(name: &str) -> Result<Self> {
        name.parse().map(Criterion::Named)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: FnMut(&Pair<V>, &Pair<V>) -> Ordering + 'a,
    {
        Criterion::Custom(Box::new(f))
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Criterion::Named(c) => c.name(),
            Criterion::Custom(_) => "custom",
        }
    }
}

impl<V> Default for Criterion<'_, V> {
    fn default() -> Self {
        Criterion::Named(Comparator::default())
    }
}

impl<V> From<Comparator> for Criterion<'_, V> {
    fn from(c: Comparator) -> Self {
        Criterion::Named(c)
    }
}

impl<V> fmt::Debug for Criterion<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Named(c) => f.debug_tuple("Named").field(c).finish(),
            Criterion::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How `sort_by` orders the values resolved at a path.
pub enum PathOrder<'a, V> {
    Asc,
    Desc,
    /// Receives the two resolved values directly; `None` when unresolvable.
    Custom(PathCmp<'a, V>),
}

impl<'a, V> PathOrder<'a, V> {
    /// Accepts `asc` or `desc`, case-insensitively.
    pub fn named(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("asc") {
            Ok(PathOrder::Asc)
        } else if name.eq_ignore_ascii_case("desc") {
            Ok(PathOrder::Desc)
        } else {
            Err(Error::UnknownComparator(name.to_owned()))
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: FnMut(Option<&V>, Option<&V>) -> Ordering + 'a,
    {
        PathOrder::Custom(Box::new(f))
    }

    pub(crate) fn compare(&mut self, a: Option<&V>, b: Option<&V>) -> Ordering
    where
        V: NaturalOrder,
    {
        match self {
            PathOrder::Asc => resolved_cmp(a, b),
            PathOrder::Desc => resolved_cmp(b, a),
            PathOrder::Custom(f) => f(a, b),
        }
    }
}

// Unresolved values order before resolved ones.
fn resolved_cmp<V: NaturalOrder>(a: Option<&V>, b: Option<&V>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => natural(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl<V> Default for PathOrder<'_, V> {
    fn default() -> Self {
        PathOrder::Asc
    }
}

impl<V> fmt::Debug for PathOrder<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOrder::Asc => f.write_str("Asc"),
            PathOrder::Desc => f.write_str("Desc"),
            PathOrder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
