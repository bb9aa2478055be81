//! # pgm-levels
//!
//! A learned index over sorted numeric keys, the PGM-index, together with a
//! leveled dynamic variant that supports inserts and erases.
//!
//! A PGM-index replaces the inner nodes of a search tree with piecewise
//! linear models. Each model predicts where a key sits in the sorted array
//! within a fixed error `epsilon`, and a short search inside that window
//! finds the exact position.
//!
//! ## Quick Start
//!
//! ```rust
//! use pgm_levels::{Dynamic, Map, Static};
//!
//! // Model over a key array you keep yourself
//! let keys: Vec<u64> = (0..10000).map(|i| i * 2).collect();
//! let index = Static::new(&keys, 64, 4).unwrap();
//! assert_eq!(index.lower_bound(&keys, &501), 251);
//!
//! // Immutable map (like BTreeMap, read-only)
//! let map: Map<u64, &str> = vec![(1, "one"), (2, "two")].into_iter().collect();
//! assert_eq!(map.get(&1), Some(&"one"));
//!
//! // Mutable map with inserts and erases
//! let mut dynamic: Dynamic<i64, u32> = Dynamic::new();
//! dynamic.insert_or_assign(-4, 8).unwrap();
//! assert_eq!(dynamic.find(&-4), Some(&8));
//! ```
//!
//! ## Index Types
//!
//! - [`Static`]: multi-level recursive index over an external key slice
//! - [`Map`]: owned sorted keys and values plus a `Static`
//! - [`Dynamic`]: buffer plus geometrically growing levels of `Map`s
//! - [`SharedDynamic`]: `Dynamic` behind a reader-writer lock
//!
//! Keys are the primitive integers and the float wrappers [`F32`] and
//! [`F64`].
//!
//! ## Features
//!
//! - `parallel`: parallel segmentation of large inputs with rayon
//! - `serde`: serialization of the static structures and the configuration
//!
//! ## Performance
//!
//! Queries cost O(log n / log epsilon) model evaluations plus a search over
//! at most `2 * epsilon + 1` keys. Construction is a single O(n) pass per
//! level.

pub mod collections;
pub mod config;
pub mod error;
pub mod index;
pub mod util;

pub use collections::Map;
pub use config::DynamicConfig;
pub use error::{Error, Result};
pub use index::{Builder, Cursor, Dynamic, Key, SharedDynamic, Snapshot, Static};
pub use util::{ApproxPos, F32, F64};
