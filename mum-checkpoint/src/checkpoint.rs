//! `Checkpoint` (spec §4.6, §3): enough state to resume C1 ingestion
//! without re-reading bytes already consumed, plus whatever n-gram
//! accumulation (C2) had completed at flush time.

use serde::{Deserialize, Serialize};

use mum_subsequence::{CountConfig, StreamState, SubsequenceTable};
use mum_types::Model;

pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub dataset_id: String,
    pub model_id: String,
    pub state: StreamState,
    pub subsequence_config: CountConfig,
    pub subsequence_counts: SubsequenceTable,
    /// C2 (n-gram accumulation) runs once, after C1 finishes and MDL
    /// selection fixes the dictionary — it cannot start mid-C1, since its
    /// token alphabet depends on the final macro-unit set. Every
    /// checkpoint flushed during C1 therefore carries `Model::empty(k)`
    /// here; this field only holds real counts for a checkpoint written
    /// during or after C2, which this pipeline does not currently do (C2
    /// runs to completion without intermediate flushes). Kept non-`Option`
    /// so a future C2-resumable pipeline can start populating it without
    /// a schema change.
    pub partial_model: Model,
}

impl Checkpoint {
    pub fn new(
        dataset_id: impl Into<String>,
        model_id: impl Into<String>,
        state: StreamState,
        subsequence_config: CountConfig,
        subsequence_counts: SubsequenceTable,
        partial_model: Model,
    ) -> Self {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            dataset_id: dataset_id.into(),
            model_id: model_id.into(),
            state,
            subsequence_config,
            subsequence_counts,
            partial_model,
        }
    }
}

/// Drives periodic flushing (spec §4.6 "checkpointEvery"): a caller calls
/// `should_flush` after each sequence and flushes when it returns true.
#[derive(Debug, Clone, Copy)]
pub struct FlushSchedule {
    pub every: u64,
}

impl FlushSchedule {
    pub fn new(every: u64) -> Self {
        FlushSchedule { every: every.max(1) }
    }

    pub fn should_flush(&self, sequences_consumed: u64) -> bool {
        sequences_consumed > 0 && sequences_consumed % self.every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_schedule_fires_on_multiples() {
        let schedule = FlushSchedule::new(10);
        assert!(!schedule.should_flush(0));
        assert!(!schedule.should_flush(9));
        assert!(schedule.should_flush(10));
        assert!(schedule.should_flush(20));
    }

    #[test]
    fn flush_schedule_treats_zero_as_every_sequence() {
        let schedule = FlushSchedule::new(0);
        assert!(schedule.should_flush(1));
    }
}
