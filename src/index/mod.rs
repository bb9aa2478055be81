//! PGM-index implementations.
//!
//! ## External-keys index ([`external`])
//!
//! [`external::Static`] stores only the learned model; the sorted keys are
//! passed to every query.
//!
//! ## Owned-data dynamic index ([`owned`])
//!
//! [`owned::Dynamic`] maps keys to values and supports inserts and erases
//! through a buffer plus levels of immutable [`crate::Map`]s.
//!
//! ## Building blocks
//!
//! - [`Key`]: numeric key types the models can learn over
//! - [`Segment`]: one linear model
//! - [`model`]: the segmentation pass shared by every index

mod builder;
pub mod key;

pub mod external;
pub mod model;
pub mod owned;
pub mod segment;

pub use builder::Builder;
pub use key::Key;
pub use segment::Segment;

pub use external::Static;
pub use owned::{Cursor, Dynamic, SharedDynamic, Snapshot};
