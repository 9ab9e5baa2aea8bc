//! Category grouping

use crate::goal::Goal;
use indexmap::IndexMap;

/// Goals bucketed by category, in order of first appearance
pub type Grouped<T> = IndexMap<String, Vec<T>>;

/// Partition goals by category
///
/// Stable: categories keep the order they are first seen in, and goals keep
/// their relative order inside each bucket.
#[must_use]
pub fn group_by_category<I>(goals: I) -> Grouped<Goal>
where
    I: IntoIterator<Item = Goal>,
{
    group_by(goals, |goal| goal.category.clone())
}

/// Stable partition by an arbitrary string key
pub fn group_by<T, I, F>(items: I, mut key: F) -> Grouped<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> String,
{
    let mut grouped: Grouped<T> = IndexMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}
