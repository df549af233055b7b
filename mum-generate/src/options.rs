use mum_types::TokenId;

use crate::error::{GenerateError, GenerateResult};

/// spec open question 2: the repetition-penalty window size `W` is implicit
/// in the source; we name it here as a configuration parameter rather than
/// a hardcoded magic number, defaulting to the value the spec's own
/// example uses (`W=32`).
pub const DEFAULT_REPETITION_WINDOW: usize = 32;

/// Spec §4.3 `GenOpts`.
#[derive(Debug, Clone)]
pub struct GenOpts {
    pub max_tokens: usize,
    pub temperature: f64,
    pub top_k: usize,
    pub repetition_penalty: f64,
    pub budget_ms: Option<u64>,
    pub seed: Option<u64>,
    pub repetition_window: usize,
}

impl Default for GenOpts {
    fn default() -> Self {
        GenOpts {
            max_tokens: 256,
            temperature: 1.0,
            top_k: 0,
            repetition_penalty: 1.0,
            budget_ms: None,
            seed: None,
            repetition_window: DEFAULT_REPETITION_WINDOW,
        }
    }
}

impl GenOpts {
    pub fn validate(&self) -> GenerateResult<()> {
        if !(self.temperature > 0.0) {
            return Err(GenerateError::InvalidTemperature(self.temperature));
        }
        if self.repetition_penalty < 1.0 {
            return Err(GenerateError::InvalidRepetitionPenalty(self.repetition_penalty));
        }
        Ok(())
    }
}

/// Spec §4.3 `GenResult`.
#[derive(Debug, Clone)]
pub struct GenResult {
    pub bytes: Vec<u8>,
    pub emitted_tokens: Vec<TokenId>,
    pub timed_out: bool,
    pub compression_ratio: f64,
    pub macro_units_used: Vec<u32>,
}
