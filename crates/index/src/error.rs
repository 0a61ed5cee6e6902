use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted artifacts disagree with each other. Never rebuilt over.
    #[error("index corrupt: {0}")]
    Corrupt(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("refusing to insert a zero-length vector")]
    EmptyVector,

    #[error("Serialization error: {0}")]
    Serialize(String),
}
