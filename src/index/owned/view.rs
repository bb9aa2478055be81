//! Read path shared by [`super::Dynamic`] and [`super::Snapshot`].

use core::ops::{Bound, RangeBounds};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::index::Key;
use crate::index::owned::Level;
use crate::index::owned::cursor::{Cursor, MergeIter, Source};

/// Borrowed buffer and levels, newest first.
pub(crate) struct View<'a, K: Key, V> {
    pub(crate) buffer: &'a BTreeMap<K, Option<V>>,
    pub(crate) levels: &'a [Option<Arc<Level<K, V>>>],
}

impl<'a, K: Key, V> View<'a, K, V> {
    /// The newest slot recorded for `key`. `Some(None)` is a tombstone.
    #[inline]
    fn newest_slot(&self, key: &K) -> Option<&'a Option<V>> {
        if let Some(slot) = self.buffer.get(key) {
            return Some(slot);
        }
        self.levels.iter().flatten().find_map(|level| level.get(key))
    }

    #[inline]
    pub(crate) fn find(&self, key: &K) -> Option<&'a V> {
        self.newest_slot(key)?.as_ref()
    }

    /// Whether any level, ignoring the buffer, holds an entry for `key`.
    #[inline]
    pub(crate) fn in_levels(&self, key: &K) -> bool {
        self.levels
            .iter()
            .flatten()
            .any(|level| level.contains_key(key))
    }

    fn merge_from(&self, start: Bound<&K>) -> MergeIter<'a, K, V> {
        let mut sources = Vec::with_capacity(self.levels.len() + 1);
        sources.push(Source::Buffer(
            self.buffer.range((start.cloned(), Bound::Unbounded)),
        ));
        for level in self.levels.iter().flatten() {
            let pos = match start {
                Bound::Included(key) => level.lower_bound(key),
                Bound::Excluded(key) => level.upper_bound(key),
                Bound::Unbounded => 0,
            };
            sources.push(Source::run(level, pos));
        }
        MergeIter::new(sources)
    }

    pub(crate) fn range<R: RangeBounds<K>>(&self, range: R) -> Cursor<'a, K, V> {
        let merge = self.merge_from(range.start_bound());
        Cursor::new(merge, range.end_bound().cloned())
    }

    pub(crate) fn lower_bound(&self, key: &K) -> Cursor<'a, K, V> {
        self.range((Bound::Included(*key), Bound::Unbounded))
    }
}
