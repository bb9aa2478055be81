use core::fmt::Debug;

/// Numeric key type a PGM-index can learn over.
///
/// The set of implementors is closed: the primitive integers up to 64 bits
/// and the totally ordered float wrappers [`crate::util::float::F32`] and
/// [`crate::util::float::F64`].
pub trait Key: Copy + Ord + Default + Debug + Send + Sync + 'static {
    /// Signed distance `self - origin`, as used by the linear models.
    ///
    /// Computed in a wider domain than `f64` subtraction of both operands so
    /// that nearby large keys keep a non-zero distance.
    fn offset_from(self, origin: Self) -> f64;

    /// Smallest key strictly greater than `self`. Saturates at the maximum.
    fn successor(self) -> Self;
}

macro_rules! impl_key_int {
    ($($t:ty),*) => {
        $(
            impl Key for $t {
                #[inline(always)]
                fn offset_from(self, origin: Self) -> f64 {
                    (self as i128 - origin as i128) as f64
                }

                #[inline]
                fn successor(self) -> Self {
                    self.saturating_add(1)
                }
            }
        )*
    };
}

impl_key_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_unsigned() {
        assert_eq!(10u64.offset_from(4), 6.0);
        assert_eq!(4u64.offset_from(10), -6.0);
        assert_eq!(u64::MAX.offset_from(0), u64::MAX as f64);
    }

    #[test]
    fn test_offset_large_keys_distinct() {
        let base = u64::MAX - 10;
        assert_eq!((base + 1).offset_from(base), 1.0);
        assert_eq!((i64::MIN + 3).offset_from(i64::MIN), 3.0);
    }

    #[test]
    fn test_offset_signed() {
        assert_eq!((-5i32).offset_from(-10), 5.0);
        assert_eq!(i64::MAX.offset_from(i64::MIN), u64::MAX as f64);
    }

    #[test]
    fn test_successor() {
        assert_eq!(41u32.successor(), 42);
        assert_eq!((-1i8).successor(), 0);
        assert_eq!(u8::MAX.successor(), u8::MAX);
    }
}
