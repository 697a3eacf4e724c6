//! Dotted-path resolution into nested values.

use serde_json::Value;

/// Reads a nested value at a dotted path such as `"stats.age"` or
/// `"tags.0"`. Unresolvable paths yield `None`.
pub trait Resolve {
    fn resolve(&self, path: &str) -> Option<&Self>;
}

impl Resolve for Value {
    fn resolve(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |cur, seg| match cur {
            Value::Object(map) => map.get(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

// Scalars have no inner structure; only the empty path names the value itself.
macro_rules! impl_leaf_resolve {
    ($($t:ty),* $(,)?) => {
        $(
            impl Resolve for $t {
                fn resolve(&self, path: &str) -> Option<&Self> {
                    path.is_empty().then_some(self)
                }
            }
        )*
    };
}

impl_leaf_resolve!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);
