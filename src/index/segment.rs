use crate::index::Key;

/// A linear model over a contiguous run of ranks.
///
/// Predicts `intercept + slope * (key - self.key)` for keys in
/// `[self.key, next_segment.key)`. The ranks it accounts for are
/// `intercept..intercept + covered`, which replaces raw pointers into the
/// key array with an explicit `(start, length)` span.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment<K: Key> {
    pub key: K,
    pub slope: f64,
    pub intercept: usize,
    pub covered: usize,
}

impl<K: Key> Segment<K> {
    #[inline]
    pub fn new(key: K, slope: f64, intercept: usize, covered: usize) -> Self {
        Self {
            key,
            slope,
            intercept,
            covered,
        }
    }

    /// One past the last rank this segment accounts for.
    #[inline]
    pub fn end(&self) -> usize {
        self.intercept + self.covered
    }

    /// Predicted rank of `key`, rounded to nearest and clamped to the span.
    #[inline(always)]
    pub fn predict(&self, key: K) -> usize {
        let pos = self.predict_f64(key).round();
        // `as` maps NaN to 0, so the clamp also guards degenerate models.
        let pos = if pos <= 0.0 { 0 } else { pos as usize };
        pos.clamp(self.intercept, self.end())
    }

    #[inline(always)]
    pub fn predict_f64(&self, key: K) -> f64 {
        self.intercept as f64 + self.slope * key.offset_from(self.key)
    }
}

impl<K: Key> Default for Segment<K> {
    fn default() -> Self {
        Self {
            key: K::default(),
            slope: 0.0,
            intercept: 0,
            covered: 0,
        }
    }
}
