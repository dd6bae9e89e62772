use thiserror::Error;

#[derive(Debug, Error)]
pub enum DscError {
    #[error("number of batch labels ({labels}) does not match number of samples ({samples})")]
    SampleCountMismatch { samples: usize, labels: usize },

    #[error("matrix row {row} has {found} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix of {n_features}x{n_samples} needs {expected} values, got {found}")]
    ShapeMismatch {
        n_features: usize,
        n_samples: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("malformed DSC record at line {line}: {message}")]
    Record { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {requested} permutation tasks failed")]
    PermutationFailures { failed: usize, requested: usize },
}
