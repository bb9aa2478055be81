//! Sorted, immutable key-value storage located through a PGM-index.
//!
//! Every level of [`crate::Dynamic`] is one of these. It also works as a
//! standalone read-only map.

use core::fmt;
use core::ops::RangeBounds;

use crate::config::DynamicConfig;
use crate::error::Result;
use crate::index::Key;
use crate::index::external::Static;
use crate::util::range::range_to_indices;

/// Parallel arrays of unique sorted keys and their values, plus the learned
/// model over the keys.
///
/// An empty map carries no model; every query on it answers position 0.
///
/// # Example
///
/// ```
/// use pgm_levels::Map;
///
/// let map = Map::from_sorted_unique(vec![(10u32, 'a'), (20, 'b'), (30, 'c')], 8, 2).unwrap();
/// assert_eq!(map.get(&20), Some(&'b'));
/// assert_eq!(map.position(&25), None);
/// assert_eq!(map.lower_bound(&25), 2);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        bound = "K: serde::Serialize + serde::de::DeserializeOwned, V: serde::Serialize + serde::de::DeserializeOwned"
    )
)]
pub struct Map<K: Key, V> {
    keys: Vec<K>,
    values: Vec<V>,
    model: Option<Static<K>>,
}

impl<K: Key, V> Map<K, V> {
    /// Build from entries already sorted by key, without duplicates.
    ///
    /// Ordering is only checked by `debug_assert!`.
    pub fn from_sorted_unique(
        entries: Vec<(K, V)>,
        epsilon: usize,
        epsilon_recursive: usize,
    ) -> Result<Self> {
        let (keys, values) = entries.into_iter().unzip();
        Self::from_sorted_parts(keys, values, epsilon, epsilon_recursive)
    }

    pub(crate) fn from_sorted_parts(
        keys: Vec<K>,
        values: Vec<V>,
        epsilon: usize,
        epsilon_recursive: usize,
    ) -> Result<Self> {
        debug_assert_eq!(keys.len(), values.len());
        debug_assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "keys must be strictly increasing"
        );

        let model = if keys.is_empty() {
            None
        } else {
            Some(Static::new(&keys, epsilon, epsilon_recursive)?)
        };
        Ok(Self {
            keys,
            values,
            model,
        })
    }

    /// Sort `entries` by key and build. For a repeated key the entry that
    /// came last is kept.
    pub fn build<I>(entries: I, epsilon: usize, epsilon_recursive: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(K, V)> = entries.into_iter().collect();
        // Stable sort keeps equal keys in input order.
        entries.sort_by_key(|(key, _)| *key);

        let mut deduped: Vec<(K, V)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == key => last.1 = value,
                _ => deduped.push((key, value)),
            }
        }

        Self::from_sorted_unique(deduped, epsilon, epsilon_recursive)
    }

    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            model: None,
        }
    }

    /// Rank of the first key `>= key`.
    #[inline]
    pub fn lower_bound(&self, key: &K) -> usize {
        self.model
            .as_ref()
            .map_or(0, |model| model.lower_bound(&self.keys, key))
    }

    /// Rank of the first key `> key`.
    #[inline]
    pub fn upper_bound(&self, key: &K) -> usize {
        self.model
            .as_ref()
            .map_or(0, |model| model.upper_bound(&self.keys, key))
    }

    /// Rank of `key` if it is stored.
    #[inline]
    pub fn position(&self, key: &K) -> Option<usize> {
        let rank = self.lower_bound(key);
        match self.keys.get(rank) {
            Some(found) if found == key => Some(rank),
            _ => None,
        }
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|rank| &self.values[rank])
    }

    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.position(key).and_then(|rank| self.at(rank))
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    #[inline]
    fn at(&self, rank: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(rank)?, self.values.get(rank)?))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.at(0)
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.at(self.len().checked_sub(1)?)
    }

    /// Entries whose keys fall in `range`, in key order.
    pub fn range<R>(&self, range: R) -> impl DoubleEndedIterator<Item = (&K, &V)>
    where
        R: RangeBounds<K>,
    {
        let (start, end) = range_to_indices(
            range,
            self.len(),
            |key| self.lower_bound(key),
            |key| self.upper_bound(key),
        );
        let keys = &self.keys[start..end];
        let values = &self.values[start..end];
        keys.iter().zip(values)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + DoubleEndedIterator {
        self.iter_from(0)
    }

    /// Entries from rank `rank` to the end.
    pub fn iter_from(&self, rank: usize) -> impl ExactSizeIterator<Item = (&K, &V)> + DoubleEndedIterator {
        let rank = rank.min(self.len());
        let keys = &self.keys[rank..];
        let values = &self.values[rank..];
        keys.iter().zip(values)
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + DoubleEndedIterator {
        self.keys.iter()
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + DoubleEndedIterator {
        self.values.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Levels of the learned model; 0 for an empty map.
    pub fn height(&self) -> usize {
        self.model.as_ref().map_or(0, Static::height)
    }

    pub fn segments_count(&self) -> usize {
        self.model.as_ref().map_or(0, Static::segments_count)
    }

    /// Bytes taken by the learned model.
    pub fn index_size_in_bytes(&self) -> usize {
        self.model.as_ref().map_or(0, Static::size_in_bytes)
    }

    /// Bytes taken by the model plus the key and value arrays.
    pub fn size_in_bytes(&self) -> usize {
        self.index_size_in_bytes()
            + self.keys.capacity() * core::mem::size_of::<K>()
            + self.values.capacity() * core::mem::size_of::<V>()
    }

    #[inline]
    pub(crate) fn keys_slice(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn values_slice(&self) -> &[V] {
        &self.values
    }
}

impl<K: Key, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: Key, V: fmt::Debug> fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Key, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = core::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

impl<'a, K: Key, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = core::iter::Zip<core::slice::Iter<'a, K>, core::slice::Iter<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter().zip(self.values.iter())
    }
}

impl<K: Key, V> FromIterator<(K, V)> for Map<K, V> {
    /// Builds with the error bounds of [`DynamicConfig::default`].
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let config = DynamicConfig::default();
        // Only empty input can fail, and that is the empty map.
        Self::build(iter, config.epsilon, config.epsilon_recursive).unwrap_or_default()
    }
}
