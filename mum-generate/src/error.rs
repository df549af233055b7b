use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("temperature must be > 0, got {0}")]
    InvalidTemperature(f64),

    #[error("repetitionPenalty must be >= 1.0, got {0}")]
    InvalidRepetitionPenalty(f64),
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;
