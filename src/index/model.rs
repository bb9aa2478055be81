//! Piecewise linear segmentation with a bounded rank error.
//!
//! A single pass keeps the cone of slopes, anchored at the first point of the
//! current segment, that predicts every point seen so far within `epsilon`.
//! When the next point would empty the cone the segment is closed and a new
//! one starts at that point.

use crate::index::{Key, Segment};

/// Cone of admissible slopes through the anchor of the open segment.
struct Cone {
    slope_lo: f64,
    slope_hi: f64,
}

impl Cone {
    fn new() -> Self {
        Self {
            slope_lo: f64::NEG_INFINITY,
            slope_hi: f64::INFINITY,
        }
    }

    fn add_point(&mut self, x_diff: f64, y_diff: f64, epsilon: f64) -> bool {
        // Distinct keys can still be zero apart once mapped to f64 (-0.0 and
        // 0.0). The anchor's own rank must then be close enough.
        if !(x_diff > 0.0) {
            return y_diff <= epsilon;
        }

        let new_lo = self.slope_lo.max((y_diff - epsilon) / x_diff);
        let new_hi = self.slope_hi.min((y_diff + epsilon) / x_diff);

        if new_lo > new_hi {
            return false;
        }

        self.slope_lo = new_lo;
        self.slope_hi = new_hi;
        true
    }

    /// Midpoint of the cone, never negative. Ranks only grow, so the upper
    /// slope is never below zero and a clamped midpoint stays in the cone.
    /// Non-negative slopes keep predictions monotone in the key.
    fn slope(&self) -> f64 {
        if self.slope_lo.is_infinite() || self.slope_hi.is_infinite() {
            0.0
        } else {
            ((self.slope_lo + self.slope_hi) / 2.0).max(0.0)
        }
    }
}

/// The `(key, rank)` points a key range contributes to the segmentation.
///
/// Only the first occurrence of a key is a point, so a run of duplicates
/// predicts the rank of its first element. The last element of a run is
/// replaced by `(successor(key), last_rank)` unless the run ends the input
/// or the next key already is the successor: keys just above a long run then
/// predict a rank at the end of the run instead of its start.
struct Points<'a, K: Key> {
    keys: &'a [K],
    pos: usize,
    end: usize,
    last: Option<K>,
}

impl<'a, K: Key> Points<'a, K> {
    fn new(keys: &'a [K], start: usize, end: usize) -> Self {
        Self {
            keys,
            pos: start,
            end,
            last: None,
        }
    }
}

impl<K: Key> Iterator for Points<'_, K> {
    type Item = (K, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.keys.len();
        while self.pos < self.end {
            let i = self.pos;
            self.pos += 1;

            let mut x = self.keys[i];
            if i > 0 && i + 1 < n && x == self.keys[i - 1] && x != self.keys[i + 1] {
                let next = x.successor();
                if next != self.keys[i + 1] {
                    x = next;
                }
            }

            if self.last == Some(x) {
                continue;
            }
            self.last = Some(x);
            return Some((x, i));
        }
        None
    }
}

/// Segment `keys[start..end]` into `out`. Spans are filled in afterwards.
///
/// `start` and `end` must not split a run of equal keys.
fn segment_range<K: Key>(
    keys: &[K],
    start: usize,
    end: usize,
    epsilon: usize,
    out: &mut Vec<Segment<K>>,
) {
    let eps = epsilon as f64;
    let mut points = Points::new(keys, start, end);
    let Some((mut first_key, mut first_rank)) = points.next() else {
        return;
    };
    let mut cone = Cone::new();

    for (key, rank) in points {
        let x_diff = key.offset_from(first_key);
        let y_diff = (rank - first_rank) as f64;

        if !cone.add_point(x_diff, y_diff, eps) {
            out.push(Segment::new(first_key, cone.slope(), first_rank, 0));
            first_key = key;
            first_rank = rank;
            cone = Cone::new();
        }
    }

    out.push(Segment::new(first_key, cone.slope(), first_rank, 0));
}

fn fill_covered<K: Key>(segments: &mut [Segment<K>], len: usize) {
    for i in 0..segments.len() {
        let end = segments.get(i + 1).map_or(len, |next| next.intercept);
        segments[i].covered = end - segments[i].intercept;
    }
}

/// Build the segments of one level over non-decreasing `keys`.
///
/// Every key's lower-bound rank is predicted within `epsilon` by the last
/// segment whose `key` is not greater than it. Deterministic.
pub fn build_segments<K: Key>(keys: &[K], epsilon: usize) -> Vec<Segment<K>> {
    debug_assert!(
        keys.windows(2).all(|w| w[0] <= w[1]),
        "keys must be sorted"
    );

    let mut segments = Vec::with_capacity(keys.len() / (2 * epsilon).max(1) + 1);
    segment_range(keys, 0, keys.len(), epsilon, &mut segments);
    fill_covered(&mut segments, keys.len());
    segments
}

#[cfg(feature = "parallel")]
pub fn build_segments_parallel<K: Key>(keys: &[K], epsilon: usize) -> Vec<Segment<K>> {
    use rayon::prelude::*;

    const PARALLEL_THRESHOLD: usize = 100_000;

    if keys.len() < PARALLEL_THRESHOLD {
        return build_segments(keys, epsilon);
    }

    let num_threads = rayon::current_num_threads().max(1);
    let chunk_size = keys.len().div_ceil(num_threads);

    let mut bounds = vec![0usize];
    let mut cut = chunk_size;
    while cut < keys.len() {
        while cut < keys.len() && keys[cut] == keys[cut - 1] {
            cut += 1;
        }
        if cut < keys.len() {
            bounds.push(cut);
        }
        cut += chunk_size;
    }
    bounds.push(keys.len());

    let partial_results: Vec<Vec<Segment<K>>> = bounds
        .par_windows(2)
        .map(|w| {
            let mut out = Vec::new();
            segment_range(keys, w[0], w[1], epsilon, &mut out);
            out
        })
        .collect();

    let mut segments: Vec<Segment<K>> = partial_results.into_iter().flatten().collect();
    fill_covered(&mut segments, keys.len());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_epsilon_bound<K: Key>(keys: &[K], segments: &[Segment<K>], epsilon: usize) {
        for &key in keys {
            let rank = keys.partition_point(|k| *k < key);
            let seg_idx = segments.partition_point(|s| s.key <= key).saturating_sub(1);
            let predicted = segments[seg_idx].predict(key);
            let error = predicted.abs_diff(rank);
            assert!(
                error <= epsilon,
                "error {} > epsilon {} for key {:?} at rank {}",
                error,
                epsilon,
                key,
                rank
            );
        }
    }

    #[test]
    fn test_build_segments_uniform() {
        let keys: Vec<u64> = (0..1000).collect();
        let segments = build_segments(&keys, 8);

        assert_eq!(segments.len(), 1);
        assert!(segments[0].slope >= 0.0);
        assert_eq!(segments[0].covered, 1000);
    }

    #[test]
    fn test_build_segments_single() {
        let keys: Vec<u64> = vec![42];
        let segments = build_segments(&keys, 8);
        assert_eq!(segments, vec![Segment::new(42, 0.0, 0, 1)]);
    }

    #[test]
    fn test_build_segments_empty() {
        let keys: Vec<u64> = vec![];
        assert!(build_segments(&keys, 8).is_empty());
    }

    #[test]
    fn test_build_segments_quadratic() {
        let keys: Vec<u64> = (0..1000).map(|i| i * i).collect();
        let segments = build_segments(&keys, 32);

        assert!(
            segments.len() > 1,
            "Quadratic data should need multiple segments"
        );
        assert_epsilon_bound(&keys, &segments, 32);
    }

    #[test]
    fn test_spans_tile_the_input() {
        let keys: Vec<u64> = (0..5000).map(|i| i * i % 7919 + i * 3).collect::<Vec<_>>();
        let mut keys = keys;
        keys.sort();
        let segments = build_segments(&keys, 4);

        assert_eq!(segments[0].intercept, 0);
        for w in segments.windows(2) {
            assert!(w[0].key < w[1].key);
            assert_eq!(w[0].end(), w[1].intercept);
        }
        assert_eq!(segments.last().map(|s| s.end()), Some(keys.len()));
    }

    #[test]
    fn test_epsilon_guarantee() {
        let keys: Vec<u64> = (0..10000).map(|i| i * 7 + (i % 13) * (i % 5)).collect();
        let mut keys = keys;
        keys.sort();
        for epsilon in [0, 1, 16, 64] {
            let segments = build_segments(&keys, epsilon);
            assert_epsilon_bound(&keys, &segments, epsilon);
        }
    }

    #[test]
    fn test_all_duplicates() {
        let keys = vec![7u32; 1000];
        let segments = build_segments(&keys, 4);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].predict(7), 0);
        assert_eq!(segments[0].covered, 1000);
    }

    #[test]
    fn test_duplicate_runs() {
        let mut keys = vec![1u64];
        keys.extend(std::iter::repeat(5).take(9));
        keys.push(9);
        let segments = build_segments(&keys, 1);
        assert_epsilon_bound(&keys, &segments, 1);

        // 6 falls past the run of fives: its lower bound is rank 10.
        let seg_idx = segments.partition_point(|s| s.key <= 6).saturating_sub(1);
        let predicted = segments[seg_idx].predict(6);
        assert!(predicted + 1 >= 10, "predicted {predicted} too far from 10");
    }

    #[test]
    fn test_many_duplicate_runs() {
        let keys: Vec<i64> = (0..20_000).map(|i| (i / 37) * 11 - 3000).collect();
        let segments = build_segments(&keys, 8);
        assert_epsilon_bound(&keys, &segments, 8);
    }

    #[test]
    fn test_deterministic() {
        let keys: Vec<u64> = (0..3000).map(|i| i * i / 3).collect();
        assert_eq!(build_segments(&keys, 16), build_segments(&keys, 16));
    }

    #[test]
    fn test_float_keys() {
        use crate::util::float::F64;

        let keys: Vec<F64> = (0..2000).map(|i| F64((i as f64).sqrt() * 10.0 - 50.0)).collect();
        let segments = build_segments(&keys, 4);
        assert_epsilon_bound(&keys, &segments, 4);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_bound() {
        let keys: Vec<u64> = (0..300_000u64).map(|i| (i / 3) * 5).collect();
        let segments = build_segments_parallel(&keys, 16);

        assert_eq!(segments.last().map(|s| s.end()), Some(keys.len()));
        for w in segments.windows(2) {
            assert!(w[0].key < w[1].key);
            assert_eq!(w[0].end(), w[1].intercept);
        }
        assert_epsilon_bound(&keys[..5000], &segments, 16);
    }
}
