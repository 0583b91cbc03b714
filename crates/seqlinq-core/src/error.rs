use thiserror::Error;

/// Canonical result for every seqlinq crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unhashable element: {0}")]
    Unhashable(String),

    #[error("incomparable elements: {0}")]
    Incomparable(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("sequence contains no elements ({0})")]
    EmptySequence(&'static str),

    #[error("buffer limit exceeded in '{op}': more than {limit} elements")]
    BufferLimit { op: &'static str, limit: usize },

    // Caller closures map their own failures into this variant; the engine
    // never constructs it itself.
    #[error("callback failed: {0}")]
    Callback(String),
}

impl Error {
    /// Wrap an arbitrary caller-side failure for use inside `try_*` closures.
    pub fn callback(err: impl std::fmt::Display) -> Self {
        Error::Callback(err.to_string())
    }
}
