use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CountConfig;
use crate::error::{SubsequenceError, SubsequenceResult};
use crate::table::SubsequenceTable;

/// Spec §3 `StreamState`: the minimum needed to resume C1 ingestion
/// deterministically and to know when the next prune/checkpoint boundary
/// falls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamState {
    pub sequences_consumed: u64,
    pub bytes_consumed: u64,
    pub subsequence_observations: u64,
}

/// Spec §4.1 "State machine": `Empty -> Counting -> (periodic)
/// Counting-pruned -> Finalised -> Selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterState {
    Empty,
    Counting,
    Finalised,
    Selected,
}

/// Owns the subsequence table across sequence boundaries, so a caller (the
/// checkpointer, or the CLI driving cancellation) can suspend between
/// sequences without losing invariants (spec §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsequenceCounter {
    pub config: CountConfig,
    pub table: SubsequenceTable,
    pub state: StreamState,
    pub counter_state: CounterState,
    /// Bound used by MDL selection: total bytes observed, *before*
    /// sampling, across every ingested sequence (spec §4.1 step 4 "N").
    pub total_bytes_observed: u64,
}

impl SubsequenceCounter {
    pub fn new(config: CountConfig) -> SubsequenceResult<Self> {
        config.validate()?;
        Ok(SubsequenceCounter {
            config,
            table: SubsequenceTable::new(),
            state: StreamState::default(),
            counter_state: CounterState::Empty,
            total_bytes_observed: 0,
        })
    }

    /// Ingest a single byte sequence (spec §4.1 step 1). Sequences of
    /// length 0 are skipped silently.
    pub fn ingest_sequence(&mut self, seq: &[u8]) {
        if seq.is_empty() {
            return;
        }
        self.counter_state = CounterState::Counting;
        self.total_bytes_observed += seq.len() as u64;

        let max_len = self.config.effective_max_len(seq.len());
        let mut rng = rand::thread_rng();

        // Deterministic enumeration order (spec §5): length-ascending, then
        // start-ascending.
        for len in self.config.min_len as usize..=max_len {
            if len == 0 || len > seq.len() {
                continue;
            }
            for start in 0..=(seq.len() - len) {
                if self.config.sample_rate >= 1.0 || rng.gen_bool(self.config.sample_rate) {
                    self.table.increment(&seq[start..start + len]);
                    self.state.subsequence_observations += 1;
                    if self.config.prune_interval > 0
                        && self.state.subsequence_observations % self.config.prune_interval == 0
                    {
                        self.maybe_prune();
                    }
                }
            }
        }

        self.state.sequences_consumed += 1;
        self.state.bytes_consumed += seq.len() as u64;
    }

    /// Spec §4.1 step 2: if over `maxEntries`, repeatedly raise the drop
    /// threshold (starting at `pruneThresholdStart`, +1 per iteration,
    /// bounded at `pruneThresholdStart + 3`) until under the cap or the
    /// bound is exhausted. Lossy by design — memory safety, not exact
    /// counts, is the contract.
    fn maybe_prune(&mut self) {
        if self.table.len() <= self.config.max_entries {
            return;
        }
        let start = self.config.prune_threshold_start;
        for step in 0..=3u64 {
            let threshold = start + step;
            let dropped = self.table.prune_below_or_equal(threshold);
            tracing::debug!(threshold, dropped, remaining = self.table.len(), "pruned subsequence table");
            if self.table.len() <= self.config.max_entries {
                break;
            }
        }
    }

    /// Spec §4.1 step 3: one final forced prune regardless of interval, then
    /// transition to `Finalised`.
    pub fn finalize(&mut self) {
        self.maybe_prune();
        self.counter_state = CounterState::Finalised;
    }
}

/// Spec §4.1 public contract: `ingest(stream, config) -> SubsequenceTable`.
/// Consumes the whole iterator with no external suspension; callers needing
/// checkpoint/cancel boundaries should drive [`SubsequenceCounter`]
/// directly instead (the checkpointer crate does this).
pub fn ingest<I>(stream: I, config: CountConfig) -> SubsequenceResult<SubsequenceCounter>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut counter = SubsequenceCounter::new(config)?;
    for seq in stream {
        counter.ingest_sequence(seq.as_ref());
    }
    counter.finalize();
    Ok(counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequences_are_skipped() {
        let cfg = CountConfig {
            min_len: 1,
            ..Default::default()
        };
        let counter = ingest(vec![b"".to_vec(), b"ab".to_vec()], cfg).unwrap();
        assert_eq!(counter.state.sequences_consumed, 1);
    }

    #[test]
    fn config_error_surfaces_before_ingest() {
        let cfg = CountConfig {
            min_len: 10,
            max_len: 2,
            ..Default::default()
        };
        assert!(SubsequenceCounter::new(cfg).is_err());
    }

    #[test]
    fn memory_cap_is_honoured_at_sequence_boundaries() {
        // spec §8 universal invariant 6. `prune_interval = 1` checks the
        // cap after every observation, which is the strictest reading of
        // "never exceeds M at any observable sequence boundary" — with a
        // larger interval the table may transiently exceed M between
        // checks, which is the documented lossy-pruning trade-off (spec §9).
        let cfg = CountConfig {
            min_len: 1,
            max_len: 1,
            max_subseq_len: 1,
            min_frequency: 1,
            sample_rate: 1.0,
            prune_interval: 1,
            max_entries: 8,
            prune_threshold_start: 1,
        };
        let mut counter = SubsequenceCounter::new(cfg).unwrap();
        for b in 0u8..=255 {
            counter.ingest_sequence(&[b]);
            assert!(counter.table.len() <= 8);
        }
        counter.finalize();
        assert!(counter.table.len() <= 8);
    }

    #[test]
    fn finalize_transitions_state() {
        let mut counter = SubsequenceCounter::new(CountConfig::default()).unwrap();
        counter.ingest_sequence(b"abcabc");
        assert_eq!(counter.counter_state, CounterState::Counting);
        counter.finalize();
        assert_eq!(counter.counter_state, CounterState::Finalised);
    }
}
