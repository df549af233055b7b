use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum FactError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("truncated frame: expected {needed} more bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("bad magic bytes: expected \"FACT\"")]
    BadMagic,

    #[error("unsupported frame version {0}")]
    UnsupportedVersion(u16),

    #[error("unknown discriminant {value} for {what}")]
    UnknownDiscriminant { what: &'static str, value: u8 },

    #[error("invalid utf-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("malformed {field}: {reason}")]
    MalformedField { field: &'static str, reason: &'static str },

    #[error("CRC32 mismatch: frame is corrupt")]
    CrcMismatch,

    #[error("fact_id mismatch: stored id does not match recomputed content hash")]
    FactIdMismatch,
}

pub type FactResult<T> = std::result::Result<T, FactError>;
