use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum NgramError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("context window K must be >= 1, got {0}")]
    InvalidOrder(u32),
}

pub type NgramResult<T> = std::result::Result<T, NgramError>;
