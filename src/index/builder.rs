use crate::collections::Map;
use crate::config::DynamicConfig;
use crate::error::Result;
use crate::index::Key;
use crate::index::external;
use crate::index::owned;

/// Builder for constructing PGM indices with custom parameters.
///
/// # Example
///
/// ```
/// use pgm_levels::index::Builder;
///
/// let data: Vec<u64> = (0..10000).collect();
///
/// let index = Builder::new()
///     .epsilon(128)
///     .epsilon_recursive(8)
///     .build(&data)
///     .unwrap();
///
/// assert_eq!(index.epsilon(), 128);
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    config: DynamicConfig,
    #[cfg(feature = "parallel")]
    parallel: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            config: DynamicConfig::default(),
            #[cfg(feature = "parallel")]
            parallel: false,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the epsilon (error bound) for the bottom level.
    pub fn epsilon(mut self, epsilon: usize) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set the epsilon (error bound) for the upper levels.
    pub fn epsilon_recursive(mut self, epsilon_recursive: usize) -> Self {
        self.config.epsilon_recursive = epsilon_recursive;
        self
    }

    /// Buffer size that makes a dynamic index flush.
    pub fn base_capacity(mut self, base_capacity: usize) -> Self {
        self.config.base_capacity = base_capacity;
        self
    }

    /// Capacity ratio between consecutive dynamic levels.
    pub fn growth_factor(mut self, growth_factor: usize) -> Self {
        self.config.growth_factor = growth_factor;
        self
    }

    #[cfg(feature = "parallel")]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> DynamicConfig {
        self.config
    }

    pub fn build<K: Key>(&self, data: &[K]) -> Result<external::Static<K>> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return external::Static::new_parallel(
                    data,
                    self.config.epsilon,
                    self.config.epsilon_recursive,
                );
            }
        }

        external::Static::new(data, self.config.epsilon, self.config.epsilon_recursive)
    }

    /// Build an immutable map, sorting `entries` first. Last duplicate wins.
    pub fn build_map<K: Key, V>(&self, entries: Vec<(K, V)>) -> Result<Map<K, V>> {
        Map::build(entries, self.config.epsilon, self.config.epsilon_recursive)
    }

    pub fn build_dynamic<K: Key, V: Clone>(&self) -> Result<owned::Dynamic<K, V>> {
        owned::Dynamic::with_config(self.config)
    }

    /// Bulk-load a dynamic index from sorted, unique entries.
    pub fn build_dynamic_from_sorted<K: Key, V: Clone>(
        &self,
        entries: Vec<(K, V)>,
    ) -> Result<owned::Dynamic<K, V>> {
        owned::Dynamic::from_sorted(entries, self.config)
    }
}
