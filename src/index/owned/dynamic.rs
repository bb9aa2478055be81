//! Dynamic PGM-index supporting insertions and deletions.
//!
//! Writes go to a small sorted buffer. When the buffer fills up it is merged,
//! together with the smaller levels, into the first level with room for the
//! result. Every level is an immutable [`Map`] built from scratch by the
//! merge, so reads never observe a half-built level.

use core::ops::RangeBounds;
use std::collections::{BTreeMap, TryReserveError};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::collections::Map;
use crate::config::DynamicConfig;
use crate::error::Result;
use crate::index::Key;
use crate::index::owned::cursor::{Cursor, MergeIter, Source};
use crate::index::owned::view::View;
use crate::index::owned::{Level, Snapshot};

/// A dynamic PGM-index mapping keys to values.
///
/// Level `i` holds at most `base_capacity * growth_factor^(i + 1)` entries;
/// level 0 is the smallest and newest. Reads consult the buffer first, then
/// the levels from newest to oldest, and the first entry found decides.
/// Erasing a key that lives in a level records a tombstone, which is dropped
/// once it is merged into the oldest non-empty level.
///
/// # Example
///
/// ```
/// use pgm_levels::Dynamic;
///
/// let mut index: Dynamic<u64, &str> = Dynamic::new();
///
/// index.insert_or_assign(5, "five").unwrap();
/// index.insert_or_assign(3, "three").unwrap();
///
/// assert_eq!(index.find(&5), Some(&"five"));
/// assert!(index.erase(&5).unwrap());
/// assert_eq!(index.find(&5), None);
/// assert_eq!(index.len(), 1);
/// ```
#[derive(Clone)]
pub struct Dynamic<K: Key, V> {
    config: DynamicConfig,
    buffer: BTreeMap<K, Option<V>>,
    levels: Vec<Option<Arc<Level<K, V>>>>,
    len: usize,
}

impl<K: Key, V> std::fmt::Debug for Dynamic<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level_lens: Vec<usize> = self
            .levels
            .iter()
            .map(|level| level.as_ref().map_or(0, |l| l.len()))
            .collect();
        f.debug_struct("Dynamic")
            .field("len", &self.len)
            .field("buffer_len", &self.buffer.len())
            .field("level_lens", &level_lens)
            .field("config", &self.config)
            .finish()
    }
}

impl<K: Key, V: Clone> Default for Dynamic<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Clone> Dynamic<K, V> {
    /// Create an empty index with the default configuration.
    pub fn new() -> Self {
        Self {
            config: DynamicConfig::default(),
            buffer: BTreeMap::new(),
            levels: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if `config` does not validate.
    pub fn with_config(config: DynamicConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Bulk-load sorted, unique entries into the smallest level they fit in.
    ///
    /// # Panics
    ///
    /// Debug builds will panic if keys are not sorted or contain duplicates.
    pub fn from_sorted(entries: Vec<(K, V)>, config: DynamicConfig) -> Result<Self> {
        let mut index = Self::with_config(config)?;
        if entries.is_empty() {
            return Ok(index);
        }

        let len = entries.len();
        let mut target = 0;
        while config.level_capacity(target) < len {
            target += 1;
        }

        let (keys, values): (Vec<K>, Vec<Option<V>>) =
            entries.into_iter().map(|(k, v)| (k, Some(v))).unzip();
        let level = Map::from_sorted_parts(keys, values, config.epsilon, config.epsilon_recursive)?;

        index.levels.resize(target + 1, None);
        index.levels[target] = Some(Arc::new(level));
        index.len = len;

        debug!(entries = len, level = target, "bulk-loaded dynamic index");
        Ok(index)
    }

    #[inline]
    fn view(&self) -> View<'_, K, V> {
        View {
            buffer: &self.buffer,
            levels: &self.levels,
        }
    }

    /// Insert `key`, replacing the value if it is already present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] if the merge this write triggers
    /// cannot allocate. The write itself is kept in the buffer and the
    /// levels are left as they were.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<()> {
        if self.find(&key).is_none() {
            self.len += 1;
        }
        self.buffer.insert(key, Some(value));
        self.flush_if_full()
    }

    /// Erase `key`. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Same as [`Dynamic::insert_or_assign`].
    pub fn erase(&mut self, key: &K) -> Result<bool> {
        if self.find(key).is_none() {
            return Ok(false);
        }

        if self.view().in_levels(key) {
            self.buffer.insert(*key, None);
        } else {
            self.buffer.remove(key);
        }
        self.len -= 1;
        self.flush_if_full()?;
        Ok(true)
    }

    /// The value stored for `key`.
    #[inline]
    pub fn find(&self, key: &K) -> Option<&V> {
        self.view().find(key)
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Cursor positioned at the first entry whose key is `>= key`.
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V> {
        self.view().lower_bound(key)
    }

    /// Cursor over the entries whose keys fall in `range`.
    #[inline]
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Cursor<'_, K, V> {
        self.view().range(range)
    }

    /// Cursor over every entry in key order.
    #[inline]
    pub fn iter(&self) -> Cursor<'_, K, V> {
        self.view().range(..)
    }

    /// Number of keys currently present.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of level slots, empty ones included.
    #[inline]
    pub fn levels_count(&self) -> usize {
        self.levels.len()
    }

    /// Entries held by level `level`, tombstones included.
    #[inline]
    pub fn level_len(&self, level: usize) -> usize {
        self.levels
            .get(level)
            .and_then(Option::as_ref)
            .map_or(0, |l| l.len())
    }

    /// Entries waiting in the buffer, tombstones included.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }

    /// Memory used by the learned models of every level plus an estimate of
    /// the buffer.
    pub fn index_size_in_bytes(&self) -> usize {
        let levels: usize = self
            .levels
            .iter()
            .flatten()
            .map(|level| level.index_size_in_bytes())
            .sum();
        levels + self.buffer_size_in_bytes()
    }

    /// Approximate memory usage in bytes, keys and values included.
    pub fn size_in_bytes(&self) -> usize {
        let levels: usize = self
            .levels
            .iter()
            .flatten()
            .map(|level| level.size_in_bytes())
            .sum();
        core::mem::size_of::<Self>()
            + self.levels.capacity() * core::mem::size_of::<Option<Arc<Level<K, V>>>>()
            + levels
            + self.buffer_size_in_bytes()
    }

    fn buffer_size_in_bytes(&self) -> usize {
        // B-tree nodes carry roughly one extra entry of overhead per entry.
        self.buffer.len() * (core::mem::size_of::<K>() + core::mem::size_of::<Option<V>>()) * 2
    }

    /// Frozen view of the current contents. Later writes to `self` are not
    /// visible through it.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        Snapshot::new(self.buffer.clone(), self.levels.clone(), self.len)
    }

    /// Merge the buffer into the levels now, even if it is not full.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.merge_buffer()
    }

    #[inline]
    fn flush_if_full(&mut self) -> Result<()> {
        if self.buffer.len() < self.config.base_capacity {
            return Ok(());
        }
        self.merge_buffer()
    }

    /// Smallest level that can take the buffer plus every level up to it.
    fn merge_target(&self) -> usize {
        let mut total = self.buffer.len();
        let mut target = 0;
        loop {
            total += self.level_len(target);
            if total <= self.config.level_capacity(target) {
                return target;
            }
            target += 1;
        }
    }

    #[instrument(level = "debug", skip(self), fields(buffered = self.buffer.len()))]
    fn merge_buffer(&mut self) -> Result<()> {
        let target = self.merge_target();
        let drop_tombstones = self
            .levels
            .iter()
            .skip(target + 1)
            .all(Option::is_none);

        let mut sources = Vec::with_capacity(target + 2);
        sources.push(Source::Buffer(self.buffer.range(..)));
        for level in self.levels.iter().take(target + 1).flatten() {
            sources.push(Source::run(level, 0));
        }
        let upper = self.buffer.len()
            + (0..=target).map(|i| self.level_len(i)).sum::<usize>();

        let mut keys: Vec<K> = Vec::new();
        let mut values: Vec<Option<V>> = Vec::new();
        reserve_exact(&mut keys, upper)?;
        reserve_exact(&mut values, upper)?;

        let mut dropped = 0usize;
        for (key, slot) in MergeIter::new(sources) {
            if slot.is_none() && drop_tombstones {
                dropped += 1;
                continue;
            }
            keys.push(*key);
            values.push(slot.clone());
        }

        let merged = keys.len();
        let level = if keys.is_empty() {
            None
        } else {
            Some(Arc::new(Map::from_sorted_parts(
                keys,
                values,
                self.config.epsilon,
                self.config.epsilon_recursive,
            )?))
        };

        if self.levels.len() <= target {
            self.levels.try_reserve(target + 1 - self.levels.len())?;
            self.levels.resize(target + 1, None);
        }
        for slot in &mut self.levels[..target] {
            *slot = None;
        }
        self.levels[target] = level;
        while matches!(self.levels.last(), Some(None)) {
            self.levels.pop();
        }
        self.buffer.clear();

        debug!(
            level = target,
            entries = merged,
            dropped_tombstones = dropped,
            "merged buffer"
        );
        Ok(())
    }
}

#[cfg(not(test))]
#[inline]
fn reserve_exact<T>(buf: &mut Vec<T>, additional: usize) -> core::result::Result<(), TryReserveError> {
    buf.try_reserve_exact(additional)
}

/// Fails once after `tests::fail_next_reserve` arms it.
#[cfg(test)]
fn reserve_exact<T>(buf: &mut Vec<T>, additional: usize) -> core::result::Result<(), TryReserveError> {
    let additional = if tests::FAIL_NEXT_RESERVE.with(|flag| flag.replace(false)) {
        usize::MAX
    } else {
        additional
    };
    buf.try_reserve_exact(additional)
}
