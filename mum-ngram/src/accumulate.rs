use mum_types::{MacroUnit, Model, TokenId};

use crate::encode::{DictionaryEncoder, Encoder};
use crate::error::{NgramError, NgramResult};

/// Spec §4.2 public contract: `accumulate(stream, dict, K) -> NgramModel`.
pub fn accumulate<I>(stream: I, dict: Vec<MacroUnit>, k: u32) -> NgramResult<Model>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    if k < 1 {
        return Err(NgramError::InvalidOrder(k));
    }

    let mut model = Model::empty(k);
    model.macro_units = dict;
    model.stats.macro_unit_count = model.macro_units.len() as u32;
    let encoder = DictionaryEncoder::new(&model.macro_units);

    // The encoder borrows `model.macro_units`; collect encoded sequences
    // first so we can mutate `model.ngrams` afterward without a borrow
    // conflict.
    let mut all_ids: Vec<Vec<TokenId>> = Vec::new();
    let mut seq_count = 0u64;
    let mut byte_count = 0u64;
    for seq in stream {
        let seq = seq.as_ref();
        if seq.is_empty() {
            continue;
        }
        let tokens = encoder.encode(seq);
        let ids: Vec<TokenId> = tokens.into_iter().map(|t| t.id()).collect();
        seq_count += 1;
        byte_count += seq.len() as u64;
        all_ids.push(ids);
    }
    drop(encoder);

    let mut token_count = 0u64;
    for ids in &all_ids {
        token_count += ids.len() as u64;
        for n in 1..=k {
            let ctx_len = (n - 1) as usize;
            if ids.len() < ctx_len {
                continue;
            }
            for t in ctx_len..ids.len() {
                let context = ids[t - ctx_len..t].to_vec();
                model.ngrams[(n - 1) as usize].record(context, ids[t]);
            }
        }
    }

    model.stats.seq_count = seq_count;
    model.stats.byte_count = byte_count;
    model.stats.token_count = token_count;
    for (i, table) in model.ngrams.iter().enumerate() {
        model.stats.distinct_contexts[i] = table.contexts.len() as u64;
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_order_below_one() {
        assert!(accumulate(vec![b"ab".to_vec()], vec![], 0).is_err());
    }

    #[test]
    fn accumulates_unigram_counts_with_empty_dictionary() {
        let model = accumulate(vec![b"aab".to_vec()], vec![], 2).unwrap();
        assert_eq!(model.stats.byte_count, 3);
        assert_eq!(model.stats.token_count, 3);
        // order-1 table has a single context key: the empty context.
        let order1 = &model.ngrams[0];
        let root = order1.contexts.get(&Vec::<TokenId>::new()).unwrap();
        assert_eq!(root.counts.get(&(b'a' as TokenId)), Some(&2));
        assert_eq!(root.counts.get(&(b'b' as TokenId)), Some(&1));
    }

    #[test]
    fn empty_sequences_are_skipped() {
        let model = accumulate(vec![Vec::new(), b"x".to_vec()], vec![], 2).unwrap();
        assert_eq!(model.stats.seq_count, 1);
    }
}
