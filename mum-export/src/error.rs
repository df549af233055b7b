use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unsupported export format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("malformed context key {key:?}: {reason}")]
    MalformedContext { key: String, reason: &'static str },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
