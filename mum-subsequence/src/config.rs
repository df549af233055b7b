use serde::{Deserialize, Serialize};

use crate::error::{SubsequenceError, SubsequenceResult};

/// Spec §4.1 `CountConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountConfig {
    pub min_len: u32,
    pub max_len: u32,
    pub max_subseq_len: u32,
    pub min_frequency: u64,
    pub sample_rate: f64,
    pub prune_interval: u64,
    pub max_entries: usize,
    pub prune_threshold_start: u64,
}

impl CountConfig {
    pub fn validate(&self) -> SubsequenceResult<()> {
        if self.min_len > self.max_len {
            return Err(SubsequenceError::InvalidLengthRange {
                min_len: self.min_len,
                max_len: self.max_len,
            });
        }
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(SubsequenceError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }

    /// The effective upper length bound for a sequence of length `seq_len`:
    /// `min(maxLen, maxSubseqLen, |s|)` per spec §4.1 step 1.
    pub fn effective_max_len(&self, seq_len: usize) -> usize {
        (self.max_len as usize)
            .min(self.max_subseq_len as usize)
            .min(seq_len)
    }
}

impl Default for CountConfig {
    fn default() -> Self {
        CountConfig {
            min_len: 2,
            max_len: 8,
            max_subseq_len: 8,
            min_frequency: 2,
            sample_rate: 1.0,
            prune_interval: 50_000,
            max_entries: 1_000_000,
            prune_threshold_start: 1,
        }
    }
}

/// Spec §4.1 `SelectConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    pub mdl_threshold: f64,
    pub max_macro_units: Option<usize>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        SelectConfig {
            mdl_threshold: 0.0,
            max_macro_units: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_min_len_greater_than_max_len() {
        let cfg = CountConfig {
            min_len: 10,
            max_len: 2,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SubsequenceError::InvalidLengthRange { .. })
        ));
    }

    #[test]
    fn rejects_bad_sample_rate() {
        let cfg = CountConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = CountConfig {
            sample_rate: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
