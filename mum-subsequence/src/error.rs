use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum SubsequenceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("minLen ({min_len}) must be <= maxLen ({max_len})")]
    InvalidLengthRange { min_len: u32, max_len: u32 },

    #[error("sampleRate must be in (0, 1], got {0}")]
    InvalidSampleRate(f64),

    #[error("counter is in state {state:?}; operation requires {expected}")]
    WrongState {
        state: crate::counter::CounterState,
        expected: &'static str,
    },
}

pub type SubsequenceResult<T> = std::result::Result<T, SubsequenceError>;
