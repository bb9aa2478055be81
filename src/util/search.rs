#[inline]
pub fn pgm_sub_eps(pos: usize, eps: usize) -> usize {
    pos.saturating_sub(eps)
}

/// One past `pos + eps`, clamped to `size`.
#[inline]
pub fn pgm_add_eps(pos: usize, eps: usize, size: usize) -> usize {
    let upper = pos.saturating_add(eps).saturating_add(1);
    if upper >= size { size } else { upper }
}

#[inline]
pub fn binary_search_branchless<K: Ord>(keys: &[K], key: &K, lo: usize, hi: usize) -> usize {
    if lo >= hi || lo >= keys.len() {
        return lo;
    }

    let hi = hi.min(keys.len());
    let slice = &keys[lo..hi];

    let mut size = slice.len();
    if size == 0 {
        return lo;
    }

    let mut base = 0usize;
    while size > 1 {
        let half = size / 2;
        let mid = base + half;
        base = if slice[mid] < *key { mid } else { base };
        size -= half;
    }

    let result = base + (slice[base] < *key) as usize;
    lo + result
}

#[inline]
pub fn linear_search<K: Ord>(keys: &[K], key: &K, lo: usize, hi: usize) -> usize {
    let hi = hi.min(keys.len());
    if hi <= lo {
        return lo;
    }

    let slice = &keys[lo..hi];
    let len = slice.len();
    let mut i = 0;

    while i + 4 <= len {
        if slice[i] >= *key {
            return lo + i;
        }
        if slice[i + 1] >= *key {
            return lo + i + 1;
        }
        if slice[i + 2] >= *key {
            return lo + i + 2;
        }
        if slice[i + 3] >= *key {
            return lo + i + 3;
        }
        i += 4;
    }

    while i < len {
        if slice[i] >= *key {
            return lo + i;
        }
        i += 1;
    }

    hi
}

const LINEAR_SEARCH_THRESHOLD: usize = 64;

/// First position in `keys[lo..hi]` holding a key `>= key`, or `hi`.
#[inline]
pub fn adaptive_search<K: Ord>(keys: &[K], key: &K, lo: usize, hi: usize) -> usize {
    let hi = hi.min(keys.len());
    if hi <= lo {
        return lo;
    }

    if (hi - lo) <= LINEAR_SEARCH_THRESHOLD {
        return linear_search(keys, key, lo, hi);
    }

    binary_search_branchless(keys, key, lo, hi)
}

/// First position at or after `from` holding a key `> key`.
///
/// Gallops forward so the cost depends on the distance to the answer, not
/// on the length of `keys`.
#[inline]
pub fn gallop_upper<K: Ord>(keys: &[K], key: &K, from: usize) -> usize {
    let len = keys.len();
    if from >= len || keys[from] > *key {
        return from.min(len);
    }

    let mut lo = from;
    let mut step = 1usize;
    loop {
        let probe = lo.saturating_add(step);
        if probe >= len {
            break;
        }
        if keys[probe] > *key {
            return probe - step + 1 + keys[probe - step + 1..probe].partition_point(|k| k <= key);
        }
        lo = probe;
        step = step.saturating_mul(2);
    }

    lo + 1 + keys[lo + 1..].partition_point(|k| k <= key)
}
