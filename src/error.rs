//! Request-level errors.
//!
//! Only caller-side configuration problems surface here. Rules that do not
//! match and nodes that do not resolve are normal outcomes and never become
//! an `Error`.

use crate::dimension::Dimension;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("rule registry contains no rules")]
    EmptyRegistry,

    #[error("no rules registered for dimension {0}")]
    DimensionNotRegistered(Dimension),

    #[error("invalid reference time: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, Error>;
