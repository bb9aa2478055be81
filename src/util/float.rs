//! Totally ordered floating point keys.
//!
//! `f32`/`f64` are not `Ord`, so they cannot be PGM keys directly. These
//! wrappers order values with `total_cmp`, which puts `-0.0` before `0.0`
//! and NaNs at the extremes. Indexed keys are expected to be finite.

use core::cmp::Ordering;

use crate::index::Key;

macro_rules! float_key {
    ($(#[$doc:meta])* $name:ident, $float:ty) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[repr(transparent)]
        pub struct $name(pub $float);

        impl $name {
            #[inline]
            pub fn get(self) -> $float {
                self.0
            }
        }

        impl From<$float> for $name {
            #[inline]
            fn from(value: $float) -> Self {
                Self(value)
            }
        }

        impl PartialEq for $name {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Key for $name {
            #[inline(always)]
            fn offset_from(self, origin: Self) -> f64 {
                self.0 as f64 - origin.0 as f64
            }

            fn successor(self) -> Self {
                let x = self.0;
                if x.is_nan() || x == <$float>::INFINITY {
                    return self;
                }
                let bits = x.to_bits();
                let next = if bits == (-0.0 as $float).to_bits() {
                    0
                } else if x == 0.0 {
                    1
                } else if x > 0.0 {
                    bits + 1
                } else {
                    bits - 1
                };
                Self(<$float>::from_bits(next))
            }
        }
    };
}

float_key!(
    /// `f64` key ordered by `total_cmp`.
    F64,
    f64
);

float_key!(
    /// `f32` key ordered by `total_cmp`.
    F32,
    f32
);
