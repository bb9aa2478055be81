use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input data cannot be empty")]
    EmptyInput,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// A merge could not reserve memory for the rebuilt level. The levels
    /// that existed before the merge are left untouched.
    #[error("allocation failed while merging levels: {0}")]
    Allocation(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
