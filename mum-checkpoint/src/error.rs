use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Subsequence(#[from] mum_subsequence::SubsequenceError),

    #[error("unsupported checkpoint format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("checkpoint is for dataset {found:?}, expected {expected:?}")]
    DatasetMismatch { found: String, expected: String },

    #[error("checkpoint is for model {found:?}, expected {expected:?}")]
    ModelMismatch { found: String, expected: String },

    #[error("no checkpoint found at {0}")]
    NotFound(String),
}

pub type CheckpointResult<T> = std::result::Result<T, CheckpointError>;
