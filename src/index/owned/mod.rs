//! Owned-data dynamic PGM index.
//!
//! - [`Dynamic`]: mutable map supporting inserts and erases
//! - [`Snapshot`]: frozen read-only view of a `Dynamic`
//! - [`SharedDynamic`]: a `Dynamic` behind a reader-writer lock
//! - [`Cursor`]: ordered iterator returned by the range queries of both
//!
//! For read-only owned maps, see [`crate::Map`].

mod cursor;
mod dynamic;
mod shared;
mod snapshot;
mod view;

pub use cursor::Cursor;
pub use dynamic::Dynamic;
pub use shared::SharedDynamic;
pub use snapshot::Snapshot;

use crate::collections::Map;

/// One level of a dynamic index. `None` values are tombstones.
pub(crate) type Level<K, V> = Map<K, Option<V>>;
