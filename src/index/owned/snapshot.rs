use core::ops::RangeBounds;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::index::Key;
use crate::index::owned::Level;
use crate::index::owned::cursor::Cursor;
use crate::index::owned::view::View;

/// Read-only state of a [`crate::Dynamic`] at the time
/// [`crate::Dynamic::snapshot`] was called.
///
/// Levels are shared with the index through `Arc`, so taking a snapshot
/// copies only the buffer. Merges in the index replace level handles and
/// never touch the levels a snapshot holds.
#[derive(Clone)]
pub struct Snapshot<K: Key, V> {
    buffer: BTreeMap<K, Option<V>>,
    levels: Vec<Option<Arc<Level<K, V>>>>,
    len: usize,
}

impl<K: Key, V> Snapshot<K, V> {
    pub(crate) fn new(
        buffer: BTreeMap<K, Option<V>>,
        levels: Vec<Option<Arc<Level<K, V>>>>,
        len: usize,
    ) -> Self {
        Self {
            buffer,
            levels,
            len,
        }
    }

    #[inline]
    fn view(&self) -> View<'_, K, V> {
        View {
            buffer: &self.buffer,
            levels: &self.levels,
        }
    }

    #[inline]
    pub fn find(&self, key: &K) -> Option<&V> {
        self.view().find(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    #[inline]
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V> {
        self.view().lower_bound(key)
    }

    #[inline]
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Cursor<'_, K, V> {
        self.view().range(range)
    }

    #[inline]
    pub fn iter(&self) -> Cursor<'_, K, V> {
        self.view().range(..)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<K: Key, V> std::fmt::Debug for Snapshot<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.len)
            .field("buffer_len", &self.buffer.len())
            .field("levels", &self.levels.len())
            .finish()
    }
}
