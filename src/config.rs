//! Tuning knobs of the dynamic index.

use crate::error::{Error, Result};

/// Error bounds and merge policy of a [`crate::Dynamic`].
///
/// Level `i` holds at most `base_capacity * growth_factor^(i + 1)` entries.
/// The buffer is flushed once it holds `base_capacity` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DynamicConfig {
    /// Error bound of the bottom level of every static level
    pub epsilon: usize,

    /// Error bound of the upper levels
    pub epsilon_recursive: usize,

    /// Buffer size that triggers a flush
    pub base_capacity: usize,

    /// Capacity ratio between consecutive levels (at least 2)
    pub growth_factor: usize,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            epsilon: 64,
            epsilon_recursive: 4,
            base_capacity: 256,
            growth_factor: 2,
        }
    }
}

impl DynamicConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "base_capacity must be at least 1",
            });
        }
        if self.growth_factor < 2 {
            return Err(Error::InvalidConfig {
                reason: "growth_factor must be at least 2",
            });
        }
        Ok(())
    }

    /// Maximum number of entries level `level` may hold.
    #[inline]
    pub fn level_capacity(&self, level: usize) -> usize {
        let exp = u32::try_from(level.saturating_add(1)).unwrap_or(u32::MAX);
        self.growth_factor
            .checked_pow(exp)
            .and_then(|scale| scale.checked_mul(self.base_capacity))
            .unwrap_or(usize::MAX)
    }
}
