use mum_types::MacroUnit;

use crate::config::SelectConfig;
use crate::counter::{CounterState, SubsequenceCounter};
use crate::error::{SubsequenceError, SubsequenceResult};

const DICT_OVERHEAD_BITS: f64 = 32.0;

struct Candidate {
    bytes: Vec<u8>,
    count: u64,
    score: f64,
}

/// Spec §4.1 step 4 "MDL selection". Spec §4.1's state machine requires
/// "only Finalised may transition to Selected" — this is the sole
/// transition point, so it takes the counter itself rather than a bare
/// table and advances `counter_state` to `Selected` on success.
///
/// `total_bytes_observed` is `N`, the total bytes observed pre-sampling
/// (spec: "Let N = total observed bytes"). The reference width
/// `ceil(log2(|V|+|dict|))` is computed against the pool of candidates that
/// pass the frequency filter, since the final dictionary size isn't known
/// until selection completes — an implementation choice documented in
/// DESIGN.md.
pub fn select_macro_units(
    counter: &mut SubsequenceCounter,
    select_config: &SelectConfig,
) -> SubsequenceResult<Vec<MacroUnit>> {
    if counter.counter_state != CounterState::Finalised {
        return Err(SubsequenceError::WrongState {
            state: counter.counter_state,
            expected: "Finalised",
        });
    }

    let total_bytes = counter.total_bytes_observed;
    let count_config = counter.config.clone();

    if total_bytes == 0 {
        counter.counter_state = CounterState::Selected;
        return Ok(Vec::new());
    }

    let pool: Vec<(&Vec<u8>, u64)> = counter
        .table
        .iter()
        .filter(|(bytes, &count)| {
            let len = bytes.len() as u32;
            len >= count_config.min_len
                && len <= count_config.max_len
                && count >= count_config.min_frequency
        })
        .map(|(bytes, &count)| (bytes, count))
        .collect();

    if pool.is_empty() {
        counter.counter_state = CounterState::Selected;
        return Ok(Vec::new());
    }

    let vocab_plus_dict = 256usize + pool.len();
    let ref_width_bits = (vocab_plus_dict as f64).log2().ceil().max(1.0);

    let mut candidates: Vec<Candidate> = pool
        .into_iter()
        .filter_map(|(bytes, count)| {
            let len_bits = bytes.len() as f64 * 8.0;
            let cost = len_bits + DICT_OVERHEAD_BITS;
            let savings = count as f64 * (len_bits - ref_width_bits);
            let score = (savings - cost) / total_bytes as f64;
            if score >= select_config.mdl_threshold {
                Some(Candidate {
                    bytes: bytes.clone(),
                    count,
                    score,
                })
            } else {
                None
            }
        })
        .collect();

    // Descending score; ties broken by first-observed byte pattern
    // (lexicographic), per spec §5 "Ordering guarantees".
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.bytes.cmp(&b.bytes))
    });

    if let Some(max) = select_config.max_macro_units {
        candidates.truncate(max);
    }

    let units = candidates
        .into_iter()
        .enumerate()
        .map(|(idx, c)| {
            MacroUnit::new(
                idx as u32,
                c.bytes,
                c.count,
                c.score,
                count_config.min_len,
                count_config.max_len,
                count_config.min_frequency,
            )
            .expect("candidate already satisfies length/frequency invariants")
        })
        .collect();

    counter.counter_state = CounterState::Selected;
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountConfig;
    use crate::counter::ingest;

    fn cfg(min_len: u32, max_len: u32, min_freq: u64) -> CountConfig {
        CountConfig {
            min_len,
            max_len,
            max_subseq_len: max_len,
            min_frequency: min_freq,
            sample_rate: 1.0,
            prune_interval: 1_000,
            max_entries: 1_000_000,
            prune_threshold_start: 1,
        }
    }

    #[test]
    fn s1_trivial_compression() {
        // spec §8 scenario S1.
        let cc = cfg(2, 3, 2);
        let mut counter = ingest(vec![b"abcabcabc".to_vec()], cc.clone()).unwrap();
        let sc = SelectConfig {
            mdl_threshold: 0.0,
            max_macro_units: None,
        };
        let units = select_macro_units(&mut counter, &sc).unwrap();
        assert_eq!(counter.counter_state, CounterState::Selected);
        assert!(!units.is_empty());
        assert!(units
            .iter()
            .any(|u| u.bytes == b"abc" || u.bytes == b"ab" || u.bytes == b"bc"));

        let encoded = mum_types::encode_bytes(b"abcabcabc", &units);
        assert!(encoded.len() < 9);
        assert_eq!(mum_types::decode_tokens(&encoded, &units), b"abcabcabc");
    }

    #[test]
    fn s2_no_pattern_input_selects_nothing() {
        // spec §8 scenario S2.
        let bytes: Vec<u8> = (0u8..=255).collect();
        let cc = cfg(2, 8, 2);
        let mut counter = ingest(vec![bytes], cc.clone()).unwrap();
        let sc = SelectConfig::default();
        let units = select_macro_units(&mut counter, &sc).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn zero_total_bytes_selects_nothing() {
        let cc = cfg(1, 2, 1);
        let mut counter = SubsequenceCounter::new(cc).unwrap();
        counter.finalize();
        let units = select_macro_units(&mut counter, &SelectConfig::default()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn max_macro_units_caps_selection() {
        let cc = cfg(2, 2, 2);
        let mut counter = ingest(
            vec![b"aabbccddaabbccdd".to_vec()],
            cc.clone(),
        )
        .unwrap();
        let sc = SelectConfig {
            mdl_threshold: -10.0,
            max_macro_units: Some(1),
        };
        let units = select_macro_units(&mut counter, &sc).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, 0);
    }

    #[test]
    fn selecting_before_finalise_is_rejected() {
        let cc = cfg(2, 2, 2);
        let mut counter = SubsequenceCounter::new(cc).unwrap();
        counter.ingest_sequence(b"aabbaabb");
        let err = select_macro_units(&mut counter, &SelectConfig::default()).unwrap_err();
        assert!(matches!(err, SubsequenceError::WrongState { .. }));
    }
}
