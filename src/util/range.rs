use core::ops::{Bound, RangeBounds};

/// `(start, end)` positions of the elements inside `range`, given the
/// lower- and upper-bound functions of a sorted sequence of length `len`.
///
/// An inverted range yields an empty `(start, start)` pair.
#[inline]
pub fn range_to_indices<K, R, F, G>(range: R, len: usize, lower_bound: F, upper_bound: G) -> (usize, usize)
where
    R: RangeBounds<K>,
    F: Fn(&K) -> usize,
    G: Fn(&K) -> usize,
{
    let start = match range.start_bound() {
        Bound::Included(key) => lower_bound(key),
        Bound::Excluded(key) => upper_bound(key),
        Bound::Unbounded => 0,
    }
    .min(len);

    let end = match range.end_bound() {
        Bound::Included(key) => upper_bound(key),
        Bound::Excluded(key) => lower_bound(key),
        Bound::Unbounded => len,
    }
    .min(len);

    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices<R: RangeBounds<u32>>(data: &[u32], range: R) -> (usize, usize) {
        range_to_indices(
            range,
            data.len(),
            |k| data.partition_point(|x| x < k),
            |k| data.partition_point(|x| x <= k),
        )
    }

    #[test]
    fn test_bounds() {
        let data = [1u32, 3, 3, 5, 8];
        assert_eq!(indices(&data, ..), (0, 5));
        assert_eq!(indices(&data, 3..), (1, 5));
        assert_eq!(indices(&data, (Bound::Excluded(3), Bound::Unbounded)), (3, 5));
        assert_eq!(indices(&data, ..=3), (0, 3));
        assert_eq!(indices(&data, ..3), (0, 1));
        assert_eq!(indices(&data, 4..100), (3, 5));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let data = [1u32, 3, 5, 7];
        let (start, end) = indices(&data, (Bound::Included(6), Bound::Excluded(2)));
        assert_eq!(start, end);
    }
}
