#![deny(missing_docs)]
//! A tiny bounded memo with move-to-front recency ordering.
//!
//! [`Memo`] keeps `(input, result)` pairs in a flat vector. Lookups scan
//! linearly and swap a hit to the front, so frequently requested inputs are
//! found early. Inserts append at the back; once the structure grows past its
//! capacity the front entry is dropped. This is a deliberately simple recency
//! cache, not a true LRU: the capacity check happens *after* insertion, so the
//! memo can transiently hold one entry more than its nominal bound.
//!
//! [`Memoized`] wraps a function together with a [`Memo`] so repeated calls
//! with an input that is still cached return the stored result without
//! recomputation.
//!
//! The types here are single-threaded by design. Callers that share a memo
//! across threads wrap it in a lock themselves.

use std::borrow::Borrow;

/// A bounded recency cache of `(input, result)` pairs.
#[derive(Debug, Clone)]
pub struct Memo<I, R> {
    entries: Vec<(I, R)>,
    max: usize,
}

impl<I: PartialEq, R> Memo<I, R> {
    /// Creates an empty memo that holds at most `max` entries (plus one,
    /// transiently, during insertion).
    pub fn new(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max,
        }
    }

    /// Looks up a previously stored result.
    ///
    /// On a hit the found entry is swapped with the front entry, so hot
    /// inputs stay cheap to find.
    pub fn get<Q>(&mut self, input: &Q) -> Option<&R>
    where
        I: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let pos = self
            .entries
            .iter()
            .position(|(stored, _)| stored.borrow() == input)?;
        self.entries.swap(0, pos);
        Some(&self.entries[0].1)
    }

    /// Stores a result at the back of the memo.
    ///
    /// If the memo now exceeds its capacity, the front entry is dropped.
    pub fn insert(&mut self, input: I, result: R) {
        self.entries.push((input, result));
        if self.entries.len() > self.max {
            self.entries.remove(0);
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a result is stored for `input`, without touching
    /// the recency order.
    pub fn contains<Q>(&self, input: &Q) -> bool
    where
        I: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .any(|(stored, _)| stored.borrow() == input)
    }

    /// Drops all stored entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A function paired with a [`Memo`] over its inputs.
#[derive(Debug)]
pub struct Memoized<I, R, F> {
    memo: Memo<I, R>,
    func: F,
}

impl<I, R, F> Memoized<I, R, F>
where
    I: PartialEq + Clone,
    R: Clone,
    F: FnMut(&I) -> R,
{
    /// Wraps `func` with a memo that holds at most `max` results.
    pub fn new(func: F, max: usize) -> Self {
        Self {
            memo: Memo::new(max),
            func,
        }
    }

    /// Calls the wrapped function, returning a cached result when the input
    /// is still stored.
    pub fn call(&mut self, input: I) -> R {
        if let Some(result) = self.memo.get(&input) {
            return result.clone();
        }
        let result = (self.func)(&input);
        self.memo.insert(input, result.clone());
        result
    }

    /// Returns a reference to the underlying memo.
    pub fn memo(&self) -> &Memo<I, R> {
        &self.memo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_moves_entry_to_front() {
        let mut memo = Memo::new(4);
        memo.insert("a".to_string(), 1);
        memo.insert("b".to_string(), 2);
        memo.insert("c".to_string(), 3);

        assert_eq!(memo.get("c"), Some(&3));
        // `c` now sits at the front, `a` was swapped to its old slot.
        assert_eq!(memo.entries[0].0, "c");
        assert_eq!(memo.entries[2].0, "a");
    }

    #[test]
    fn insert_past_capacity_drops_front() {
        let mut memo = Memo::new(2);
        memo.insert(1, "one");
        memo.insert(2, "two");
        memo.insert(3, "three");

        assert_eq!(memo.len(), 2);
        assert!(!memo.contains(&1));
        assert!(memo.contains(&2));
        assert!(memo.contains(&3));
    }

    #[test]
    fn capacity_check_runs_after_insertion() {
        let mut memo = Memo::new(1);
        memo.insert(1, ());
        // The new entry is pushed first, then the front is trimmed, so the
        // survivor is the newest entry.
        memo.insert(2, ());
        assert_eq!(memo.len(), 1);
        assert!(memo.contains(&2));
    }

    #[test]
    fn memoized_skips_recomputation() {
        let mut calls = 0usize;
        let mut doubled = Memoized::new(
            |input: &u32| {
                calls += 1;
                input * 2
            },
            8,
        );

        assert_eq!(doubled.call(21), 42);
        assert_eq!(doubled.call(21), 42);
        assert_eq!(doubled.call(7), 14);
        drop(doubled);
        assert_eq!(calls, 2);
    }

    #[test]
    fn memoized_recomputes_after_eviction() {
        let mut calls = 0usize;
        let mut identity = Memoized::new(
            |input: &u32| {
                calls += 1;
                *input
            },
            2,
        );

        identity.call(1);
        identity.call(2);
        identity.call(3); // evicts 1
        identity.call(1); // recomputed
        drop(identity);
        assert_eq!(calls, 4);
    }
}
