// Copyright 2025 Cowboy AI, LLC.

//! Events: finite sets of outcomes
//!
//! An event is an immutable, ordered set of outcomes. All set operations
//! return new values without side effects.

use std::collections::BTreeSet;
use std::fmt;

/// A finite set of outcomes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event<T>(BTreeSet<T>);

impl<T: Ord + Clone> Event<T> {
    /// The empty event.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// An event holding a single outcome.
    pub fn singleton(outcome: T) -> Self {
        Self(BTreeSet::from([outcome]))
    }

    /// Build an event from any collection of outcomes.
    pub fn of(outcomes: impl IntoIterator<Item = T>) -> Self {
        outcomes.into_iter().collect()
    }

    /// Whether the outcome belongs to the event.
    pub fn contains(&self, outcome: &T) -> bool {
        self.0.contains(outcome)
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the event has no outcomes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate outcomes in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// First outcome in order, if any.
    pub fn first(&self) -> Option<&T> {
        self.0.first()
    }

    /// Set union.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Set intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// Set difference `self \ other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Complement relative to `space`.
    pub fn complement_in(&self, space: &Self) -> Self {
        space.difference(self)
    }

    /// Whether every outcome of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Whether the two events share no outcome.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Outcomes of `self` satisfying the predicate.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self(self.0.iter().filter(|x| predicate(x)).cloned().collect())
    }

    /// Union of a family of events.
    pub fn union_all<'a>(events: impl IntoIterator<Item = &'a Self>) -> Self
    where
        T: 'a,
    {
        let mut acc = BTreeSet::new();
        for event in events {
            acc.extend(event.0.iter().cloned());
        }
        Self(acc)
    }

    /// Borrow the underlying set.
    pub fn as_set(&self) -> &BTreeSet<T> {
        &self.0
    }
}

impl<T: Ord> FromIterator<T> for Event<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Ord> From<BTreeSet<T>> for Event<T> {
    fn from(set: BTreeSet<T>) -> Self {
        Self(set)
    }
}

impl<T: Ord> IntoIterator for Event<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl<T: fmt::Debug> fmt::Display for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_operations() {
        let space = Event::of(1..=6);
        let even = space.filter(|x| x % 2 == 0);
        let low = Event::of([1, 2, 3]);

        assert_eq!(even.union(&low), Event::of([1, 2, 3, 4, 6]));
        assert_eq!(even.intersection(&low), Event::singleton(2));
        assert_eq!(even.complement_in(&space), Event::of([1, 3, 5]));
        assert!(low.is_subset(&space));
        assert!(even.is_disjoint(&Event::of([1, 3])));
        assert_eq!(Event::union_all([&even, &low]).len(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::of([2, 1]).to_string(), "{1, 2}");
        assert_eq!(Event::<u8>::empty().to_string(), "{}");
    }
}
