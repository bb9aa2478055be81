/// Approximate position returned by index search.
///
/// The first position holding a key `>= query` lies in the closed interval
/// `[lo, hi]`. A stored key is found at some position in `[lo, hi)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproxPos {
    /// The predicted position of the key.
    pub pos: usize,
    /// Lowest position the key can occupy.
    pub lo: usize,
    /// One past the highest position a stored key can occupy.
    pub hi: usize,
}

impl ApproxPos {
    #[inline]
    pub fn new(pos: usize, lo: usize, hi: usize) -> Self {
        Self { pos, lo, hi }
    }

    /// Number of positions left to search.
    #[inline]
    pub fn width(&self) -> usize {
        self.hi - self.lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(ApproxPos::new(5, 3, 8).width(), 5);
        assert_eq!(ApproxPos::default().width(), 0);
    }
}
