use thiserror::Error;

/// Rejected structural mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("index {index} is out of range for a sequence of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("indices must be strictly ascending")]
    UnsortedIndices,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
