//! Ordered k-way merge over the buffer and the levels of a dynamic index.

use core::iter::{FusedIterator, Zip};
use core::ops::Bound;
use core::slice;
use std::collections::btree_map;

use crate::index::Key;
use crate::index::owned::Level;

/// One sorted run of `(key, slot)` entries. A `None` slot is a tombstone.
#[derive(Clone)]
pub(crate) enum Source<'a, K, V> {
    Buffer(btree_map::Range<'a, K, Option<V>>),
    Run(Zip<slice::Iter<'a, K>, slice::Iter<'a, Option<V>>>),
}

impl<'a, K: Key, V> Source<'a, K, V> {
    /// Entries of `level` from position `pos` onward.
    pub(crate) fn run(level: &'a Level<K, V>, pos: usize) -> Self {
        let pos = pos.min(level.len());
        let keys = &level.keys_slice()[pos..];
        let slots = &level.values_slice()[pos..];
        Source::Run(keys.iter().zip(slots.iter()))
    }
}

impl<'a, K, V> Iterator for Source<'a, K, V> {
    type Item = (&'a K, &'a Option<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Source::Buffer(range) => range.next(),
            Source::Run(run) => run.next(),
        }
    }
}

/// Merges sources given newest first. For a key present in several sources
/// only the newest entry is yielded, tombstones included.
#[derive(Clone)]
pub(crate) struct MergeIter<'a, K, V> {
    sources: Vec<Source<'a, K, V>>,
    heads: Vec<Option<(&'a K, &'a Option<V>)>>,
}

impl<'a, K: Key, V> MergeIter<'a, K, V> {
    pub(crate) fn new(mut sources: Vec<Source<'a, K, V>>) -> Self {
        let heads = sources.iter_mut().map(Iterator::next).collect();
        Self { sources, heads }
    }
}

impl<'a, K: Key, V> Iterator for MergeIter<'a, K, V> {
    type Item = (&'a K, &'a Option<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut winner: Option<(usize, &'a K)> = None;
        for (i, head) in self.heads.iter().enumerate() {
            if let Some((key, _)) = head {
                match winner {
                    Some((_, best)) if *key >= best => {}
                    _ => winner = Some((i, *key)),
                }
            }
        }

        let (idx, key) = winner?;
        let item = self.heads[idx];
        for (head, source) in self.heads.iter_mut().zip(self.sources.iter_mut()) {
            if matches!(head, Some((k, _)) if *k == key) {
                *head = source.next();
            }
        }
        item
    }
}

/// Lazy, forward-only iterator over the visible entries of a dynamic index
/// in key order.
///
/// Cloning a cursor yields an independent cursor at the same position, so a
/// scan can be restarted from any point.
#[derive(Clone)]
pub struct Cursor<'a, K: Key, V> {
    merge: MergeIter<'a, K, V>,
    end: Bound<K>,
    done: bool,
}

impl<'a, K: Key, V> Cursor<'a, K, V> {
    pub(crate) fn new(merge: MergeIter<'a, K, V>, end: Bound<K>) -> Self {
        Self {
            merge,
            end,
            done: false,
        }
    }

    #[inline]
    fn past_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<'a, K: Key, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some((key, slot)) = self.merge.next() else {
                self.done = true;
                return None;
            };
            if self.past_end(key) {
                self.done = true;
                return None;
            }
            if let Some(value) = slot {
                return Some((key, value));
            }
        }
    }
}

impl<K: Key, V> FusedIterator for Cursor<'_, K, V> {}
