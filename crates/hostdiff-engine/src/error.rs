//! Error types for the hostdiff-engine crate.

use std::fmt;

use thiserror::Error;

/// Which input of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// A snapshot buffer was not well-formed structured data.
///
/// Both inputs are always decoded, so when both are malformed the error
/// carries both causes.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decode snapshot A: {0}")]
    A(#[source] serde_json::Error),

    #[error("Failed to decode snapshot B: {0}")]
    B(#[source] serde_json::Error),

    #[error("Failed to decode both snapshots: A: {a}; B: {b}")]
    Both {
        a: serde_json::Error,
        b: serde_json::Error,
    },
}

impl DecodeError {
    /// The sides whose input failed to decode.
    pub fn sides(&self) -> Vec<Side> {
        match self {
            Self::A(_) => vec![Side::A],
            Self::B(_) => vec![Side::B],
            Self::Both { .. } => vec![Side::A, Side::B],
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
