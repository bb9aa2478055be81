//! External-keys PGM index.
//!
//! [`Static`] stores only the learned model. The sorted keys live elsewhere
//! and are passed to every query as a slice, so several indices (or none)
//! can share one key array.
//!
//! # Example
//!
//! ```
//! use pgm_levels::index::external::Static;
//!
//! let data: Vec<u64> = (0..10000).map(|i| i * 3).collect();
//! let pgm = Static::new(&data, 64, 4).unwrap();
//!
//! let approx = pgm.search(&3000);
//! assert!(approx.lo <= 1000 && 1000 < approx.hi);
//! assert!(pgm.contains(&data, &3000));
//! ```

mod r#static;

pub use r#static::{MAX_TOP_LEVEL_SEGMENTS, Static};
