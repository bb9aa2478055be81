use parking_lot::{RwLock, RwLockReadGuard};

use crate::config::DynamicConfig;
use crate::error::Result;
use crate::index::Key;
use crate::index::owned::{Dynamic, Snapshot};

/// A [`Dynamic`] behind a reader-writer lock, for one writer and many
/// reader threads.
///
/// Writers hold the write lock for the duration of the write and any merge
/// it triggers. Readers either take the read lock for a single lookup or
/// grab a [`Snapshot`] and release the lock immediately.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pgm_levels::SharedDynamic;
///
/// let shared: Arc<SharedDynamic<u64, u64>> = Arc::new(SharedDynamic::default());
/// shared.insert_or_assign(1, 10).unwrap();
///
/// let reader = Arc::clone(&shared);
/// std::thread::spawn(move || assert_eq!(reader.find(&1), Some(10)))
///     .join()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct SharedDynamic<K: Key, V> {
    inner: RwLock<Dynamic<K, V>>,
}

impl<K: Key, V: Clone> Default for SharedDynamic<K, V> {
    fn default() -> Self {
        Self::new(Dynamic::new())
    }
}

impl<K: Key, V: Clone> SharedDynamic<K, V> {
    pub fn new(index: Dynamic<K, V>) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }

    pub fn with_config(config: DynamicConfig) -> Result<Self> {
        Ok(Self::new(Dynamic::with_config(config)?))
    }

    pub fn insert_or_assign(&self, key: K, value: V) -> Result<()> {
        self.inner.write().insert_or_assign(key, value)
    }

    pub fn erase(&self, key: &K) -> Result<bool> {
        self.inner.write().erase(key)
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.write().flush()
    }

    /// A copy of the value stored for `key`.
    pub fn find(&self, key: &K) -> Option<V> {
        self.inner.read().find(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Frozen view that stays valid while writers keep going.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.inner.read().snapshot()
    }

    /// Read guard over the index, for scans that must see one consistent
    /// state without copying the buffer. Writers block until it is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, Dynamic<K, V>> {
        self.inner.read()
    }

    pub fn into_inner(self) -> Dynamic<K, V> {
        self.inner.into_inner()
    }
}
