//! Owned collections backed by a PGM-index.

pub mod map;

pub use map::Map;
