//! Multi-level recursive PGM-index.
//!
//! Level 0 segments the keys. Each level above segments the first keys of
//! the level below, until the top is small enough to scan.

use core::ops::RangeBounds;

use tracing::trace;

use crate::error::{Error, Result};
use crate::index::model::build_segments;
use crate::index::{Key, Segment};
use crate::util::ApproxPos;
use crate::util::range::range_to_indices;
use crate::util::search::{adaptive_search, gallop_upper, pgm_add_eps, pgm_sub_eps};

/// Recursion stops once the top level has at most this many segments.
pub const MAX_TOP_LEVEL_SEGMENTS: usize = 32;

const LINEAR_SEARCH_THRESHOLD_SEGMENTS: usize = 32;

/// A multi-level recursive PGM-index.
///
/// The index does not own the keys. They must be stored separately and
/// passed to the query methods, unchanged since construction.
///
/// # Example
///
/// ```
/// use pgm_levels::index::external::Static;
///
/// let keys: Vec<u64> = (0..10000).collect();
/// let index = Static::new(&keys, 64, 4).unwrap();
///
/// assert!(index.contains(&keys, &5000));
/// assert_eq!(index.lower_bound(&keys, &5000), 5000);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound = "K: serde::Serialize + serde::de::DeserializeOwned")
)]
pub struct Static<K: Key> {
    epsilon: usize,
    epsilon_recursive: usize,
    len: usize,
    first_key: K,
    last_key: K,
    /// Level `d` occupies `segments[levels_offsets[d]..levels_offsets[d + 1]]`.
    levels_offsets: Vec<usize>,
    segments: Vec<Segment<K>>,
}

impl<K: Key> Static<K> {
    /// Build the index over sorted `keys`.
    ///
    /// `epsilon` bounds the rank error of level 0, `epsilon_recursive` the
    /// error of the levels above it. With `epsilon_recursive == 0` the index
    /// has a single level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if `keys` is empty.
    pub fn new(keys: &[K], epsilon: usize, epsilon_recursive: usize) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::EmptyInput);
        }

        let bottom = build_segments(keys, epsilon);
        Ok(Self::stack_levels(keys, bottom, epsilon, epsilon_recursive))
    }

    #[cfg(feature = "parallel")]
    pub fn new_parallel(keys: &[K], epsilon: usize, epsilon_recursive: usize) -> Result<Self> {
        use crate::index::model::build_segments_parallel;

        if keys.is_empty() {
            return Err(Error::EmptyInput);
        }

        let bottom = build_segments_parallel(keys, epsilon);
        Ok(Self::stack_levels(keys, bottom, epsilon, epsilon_recursive))
    }

    fn stack_levels(
        keys: &[K],
        bottom: Vec<Segment<K>>,
        epsilon: usize,
        epsilon_recursive: usize,
    ) -> Self {
        let mut segments = bottom;
        let mut levels_offsets = vec![0, segments.len()];
        let mut level_start = 0;

        while epsilon_recursive > 0 && segments.len() - level_start > MAX_TOP_LEVEL_SEGMENTS {
            let super_keys: Vec<K> = segments[level_start..].iter().map(|s| s.key).collect();
            let upper = build_segments(&super_keys, epsilon_recursive);

            if upper.len() >= super_keys.len() {
                break;
            }

            level_start = segments.len();
            segments.extend_from_slice(&upper);
            levels_offsets.push(segments.len());
        }

        let index = Self {
            epsilon,
            epsilon_recursive,
            len: keys.len(),
            first_key: keys[0],
            last_key: keys[keys.len() - 1],
            levels_offsets,
            segments,
        };

        trace!(
            keys = index.len,
            height = index.height(),
            segments = index.segments.len(),
            "built static index"
        );

        index
    }

    /// Segments of level `depth`. Level 0 models the keys themselves.
    ///
    /// # Panics
    ///
    /// Panics if `depth >= self.height()`.
    #[inline]
    pub fn level(&self, depth: usize) -> &[Segment<K>] {
        &self.segments[self.levels_offsets[depth]..self.levels_offsets[depth + 1]]
    }

    /// Index of the last segment in `level(depth)[lo..hi]` whose key is not
    /// greater than `key`, or `lo` when there is none.
    #[inline]
    fn find_segment(&self, depth: usize, key: &K, lo: usize, hi: usize) -> usize {
        let level = self.level(depth);
        let hi = hi.min(level.len());
        let lo = lo.min(hi.saturating_sub(1));

        if hi - lo <= LINEAR_SEARCH_THRESHOLD_SEGMENTS {
            let mut idx = lo;
            while idx + 1 < hi && level[idx + 1].key <= *key {
                idx += 1;
            }
            idx
        } else {
            lo + level[lo..hi]
                .partition_point(|s| s.key <= *key)
                .saturating_sub(1)
        }
    }

    /// Approximate lower-bound rank of `key`.
    ///
    /// The rank of the first key `>= key` lies in `[lo, hi]` and the window
    /// `hi - lo` is at most `2 * epsilon + 1`.
    #[inline]
    pub fn search(&self, key: &K) -> ApproxPos {
        if *key < self.first_key {
            return ApproxPos::new(0, 0, 0);
        }
        if *key > self.last_key {
            return ApproxPos::new(self.len, self.len, self.len);
        }

        let top = self.height() - 1;
        let mut idx = self.find_segment(top, key, 0, usize::MAX);

        for depth in (0..top).rev() {
            let predicted = self.level(depth + 1)[idx].predict(*key);
            let size = self.level(depth).len();
            let lo = pgm_sub_eps(predicted, self.epsilon_recursive + 1);
            let hi = pgm_add_eps(predicted, self.epsilon_recursive + 1, size);
            idx = self.find_segment(depth, key, lo, hi);
        }

        let pos = self.level(0)[idx].predict(*key);
        let lo = pgm_sub_eps(pos, self.epsilon);
        let hi = pgm_add_eps(pos, self.epsilon, self.len);

        ApproxPos::new(pos, lo, hi)
    }

    /// Position of the first element of `data` that is `>= key`.
    #[inline]
    pub fn lower_bound(&self, data: &[K], key: &K) -> usize {
        let approx = self.search(key);
        let hi = approx.hi.min(data.len());
        let lo = approx.lo.min(hi);
        adaptive_search(data, key, lo, hi)
    }

    /// Position of the first element of `data` that is `> key`.
    #[inline]
    pub fn upper_bound(&self, data: &[K], key: &K) -> usize {
        let from = self.lower_bound(data, key);
        gallop_upper(data, key, from)
    }

    #[inline]
    pub fn contains(&self, data: &[K], key: &K) -> bool {
        let pos = self.lower_bound(data, key);
        data.get(pos) == Some(key)
    }

    /// Number of keys the index was built for.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments across all levels.
    #[inline]
    pub fn segments_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of levels in the index.
    #[inline]
    pub fn height(&self) -> usize {
        self.levels_offsets.len() - 1
    }

    #[inline]
    pub fn epsilon(&self) -> usize {
        self.epsilon
    }

    #[inline]
    pub fn epsilon_recursive(&self) -> usize {
        self.epsilon_recursive
    }

    /// Approximate memory usage in bytes.
    pub fn size_in_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.segments.capacity() * core::mem::size_of::<Segment<K>>()
            + self.levels_offsets.capacity() * core::mem::size_of::<usize>()
    }

    /// `(start, end)` positions of the elements of `data` inside `range`.
    #[inline]
    pub fn range_indices<R>(&self, data: &[K], range: R) -> (usize, usize)
    where
        R: RangeBounds<K>,
    {
        range_to_indices(
            range,
            data.len(),
            |k| self.lower_bound(data, k),
            |k| self.upper_bound(data, k),
        )
    }

    #[inline]
    pub fn range<'a, R>(&self, data: &'a [K], range: R) -> impl DoubleEndedIterator<Item = &'a K>
    where
        R: RangeBounds<K>,
    {
        let (start, end) = self.range_indices(data, range);
        data[start..end].iter()
    }
}
