//! Small pure helpers used by the combinators.
//!
//! `map_values` and `pick` operate on ordered maps (`BTreeMap`, so the
//! composite-state combinator gets deterministic key order for free);
//! `compose` is the right-to-left function composition underlying the
//! middleware chain.

use std::collections::BTreeMap;

/// A boxed unary endofunction, the element type of [`compose`].
pub type Unary<T> = Box<dyn Fn(T) -> T>;

/// Produce a new map with the same keys and every value replaced by
/// `f(value, key)`.
///
/// ```
/// use std::collections::BTreeMap;
/// use uniflow_core::functional::map_values;
///
/// let lengths = map_values(
///     &BTreeMap::from([("a", "x"), ("b", "yz")]),
///     |value, _key| value.len(),
/// );
/// assert_eq!(lengths, BTreeMap::from([("a", 1), ("b", 2)]));
/// ```
#[must_use]
pub fn map_values<K, V, W>(map: &BTreeMap<K, V>, mut f: impl FnMut(&V, &K) -> W) -> BTreeMap<K, W>
where
    K: Ord + Clone,
{
    map.iter().map(|(key, value)| (key.clone(), f(value, key))).collect()
}

/// Produce a new map retaining only the entries whose value satisfies `keep`.
#[must_use]
pub fn pick<K, V>(map: &BTreeMap<K, V>, mut keep: impl FnMut(&V) -> bool) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    map.iter()
        .filter(|&(_, value)| keep(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Compose unary functions right to left.
///
/// `compose(vec![f, g, h])` behaves as `|x| f(g(h(x)))`. An empty vector
/// composes to the identity function; a single function is returned as-is
/// rather than wrapped.
///
/// ```
/// use uniflow_core::functional::{compose, Unary};
///
/// let double: Unary<i32> = Box::new(|x| x * 2);
/// let add_one: Unary<i32> = Box::new(|x| x + 1);
/// // Right to left: add one first, then double.
/// assert_eq!(compose(vec![double, add_one])(3), 8);
/// assert_eq!(compose::<i32>(vec![])(3), 3);
/// ```
#[must_use]
pub fn compose<T: 'static>(mut funcs: Vec<Unary<T>>) -> Unary<T> {
    if funcs.len() == 1 {
        funcs.remove(0)
    } else {
        Box::new(move |arg| funcs.iter().rev().fold(arg, |acc, f| f(acc)))
    }
}
