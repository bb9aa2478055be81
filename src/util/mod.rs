pub mod approx_pos;
pub mod float;
pub mod range;
pub mod search;

pub use approx_pos::ApproxPos;
pub use float::{F32, F64};
