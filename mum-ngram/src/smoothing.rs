//! Interpolated Kneser-Ney smoothing (spec §4.2 "Smoothed probability").
//!
//! The discount `D` is an implementation parameter the distilled spec
//! deliberately leaves open (spec §9, open question 1). `0.75` is the
//! standard modified-Kneser-Ney constant used when discounting against
//! a single fixed value rather than the count-bucketed `D1`/`D2`/`D3+`
//! variant; documented in DESIGN.md.

use std::collections::HashMap;

use mum_types::{Model, TokenId};

pub const DEFAULT_DISCOUNT: f64 = 0.75;

/// A perplexity above this is reported as `+inf` (spec §4.2) to avoid
/// overflow propagation from near-zero probabilities.
const PPL_CAP: f64 = 1.0e4;

pub struct KneserNeySmoother<'m> {
    model: &'m Model,
    discount: f64,
}

impl<'m> KneserNeySmoother<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self::with_discount(model, DEFAULT_DISCOUNT)
    }

    pub fn with_discount(model: &'m Model, discount: f64) -> Self {
        KneserNeySmoother { model, discount }
    }

    pub fn vocab_size(&self) -> u32 {
        self.model.byte_vocab_size + self.model.macro_units.len() as u32
    }

    /// `P(token | ctx)`, recursing down through back-off orders. The chain
    /// is linear (no branching), so this is `O(K)` per call rather than the
    /// naive-recursive blow-up the spec's design notes warn about (spec §9).
    pub fn probability(&self, ctx: &[TokenId], token: TokenId) -> f64 {
        let k = self.model.order();
        let order = k.min(ctx.len() as u32 + 1).max(1);
        let ctx_len = (order - 1) as usize;
        let trimmed = if ctx.len() > ctx_len {
            &ctx[ctx.len() - ctx_len..]
        } else {
            ctx
        };
        self.prob_at_order(order, trimmed, token)
    }

    fn prob_at_order(&self, order: u32, ctx: &[TokenId], token: TokenId) -> f64 {
        if order <= 1 {
            return 1.0 / self.vocab_size() as f64;
        }
        let table = &self.model.ngrams[(order - 1) as usize];
        let backoff_ctx: &[TokenId] = if ctx.is_empty() { &[] } else { &ctx[1..] };

        match table.contexts.get(ctx) {
            None => self.prob_at_order(order - 1, backoff_ctx, token),
            Some(counts) => {
                let total = counts.total() as f64;
                if total == 0.0 {
                    return self.prob_at_order(order - 1, backoff_ctx, token);
                }
                let c_xy = *counts.counts.get(&token).unwrap_or(&0) as f64;
                let discounted = (c_xy - self.discount).max(0.0);
                let lambda = self.discount * counts.distinct_continuations() as f64 / total;
                discounted / total + lambda * self.prob_at_order(order - 1, backoff_ctx, token)
            }
        }
    }

    /// Full distribution over the vocabulary for `ctx`, defensively
    /// renormalised to sum to 1 against floating-point drift (spec §8
    /// universal invariant 3).
    pub fn distribution(&self, ctx: &[TokenId]) -> HashMap<TokenId, f64> {
        let vocab = self.vocab_size();
        let mut map: HashMap<TokenId, f64> = HashMap::with_capacity(vocab as usize);
        let mut sum = 0.0;
        for id in 0..vocab {
            let p = self.probability(ctx, id);
            sum += p;
            map.insert(id, p);
        }
        if sum > 0.0 {
            for p in map.values_mut() {
                *p /= sum;
            }
        }
        map
    }
}

/// Spec §4.2 public contract.
pub fn next_token_distribution(ctx: &[TokenId], model: &Model) -> HashMap<TokenId, f64> {
    KneserNeySmoother::new(model).distribution(ctx)
}

/// Spec §4.2 public contract: perplexity over a raw byte sequence, encoded
/// through the model's own macro-unit dictionary.
pub fn perplexity(sequence: &[u8], model: &Model) -> f64 {
    let tokens = mum_types::encode_bytes(sequence, &model.macro_units);
    if tokens.is_empty() {
        return f64::INFINITY;
    }
    let ids: Vec<TokenId> = tokens.iter().map(|t| t.id()).collect();
    let smoother = KneserNeySmoother::new(model);

    let mut log_sum = 0.0;
    let mut scored = 0usize;
    for t in 1..ids.len() {
        let ctx_len = (model.order() as usize - 1).min(t);
        let ctx = &ids[t - ctx_len..t];
        let p = smoother.probability(ctx, ids[t]);
        log_sum += p.max(f64::MIN_POSITIVE).ln();
        scored += 1;
    }
    if scored == 0 {
        return f64::INFINITY;
    }
    let ppl = (-log_sum / scored as f64).exp();
    if !ppl.is_finite() || ppl > PPL_CAP {
        f64::INFINITY
    } else {
        ppl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::accumulate;

    #[test]
    fn distribution_sums_to_one_and_is_strictly_positive() {
        let model = accumulate(vec![b"abcabcabc".to_vec()], vec![], 3).unwrap();
        let smoother = KneserNeySmoother::new(&model);
        let dist = smoother.distribution(&[b'a' as TokenId, b'b' as TokenId]);
        let sum: f64 = dist.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
        assert!(dist.values().all(|&p| p > 0.0));
    }

    #[test]
    fn unknown_context_backs_off_without_panicking() {
        let model = accumulate(vec![b"hello".to_vec()], vec![], 3).unwrap();
        let smoother = KneserNeySmoother::new(&model);
        let p = smoother.probability(&[999, 998], b'h' as TokenId);
        assert!(p > 0.0 && p.is_finite());
    }

    #[test]
    fn empty_sequence_has_infinite_perplexity() {
        let model = accumulate(vec![b"hello world".to_vec()], vec![], 2).unwrap();
        assert_eq!(perplexity(b"", &model), f64::INFINITY);
    }

    #[test]
    fn perplexity_of_trained_sequence_is_finite_and_positive() {
        let model = accumulate(vec![b"abcabcabcabcabc".to_vec()], vec![], 3).unwrap();
        let ppl = perplexity(b"abcabcabcabcabc", &model);
        assert!(ppl.is_finite());
        assert!(ppl > 0.0);
    }
}
