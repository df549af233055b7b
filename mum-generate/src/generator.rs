use std::collections::HashMap;
use std::time::Instant;

use mum_ngram::KneserNeySmoother;
use mum_types::{Model, Token, TokenId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GenerateResult;
use crate::options::{GenOpts, GenResult};

enum AnyRng {
    Seeded(StdRng),
    Thread(rand::rngs::ThreadRng),
}

impl AnyRng {
    fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => AnyRng::Seeded(StdRng::seed_from_u64(s)),
            None => AnyRng::Thread(rand::thread_rng()),
        }
    }

    fn gen_unit(&mut self) -> f64 {
        match self {
            AnyRng::Seeded(r) => r.gen::<f64>(),
            AnyRng::Thread(r) => r.gen::<f64>(),
        }
    }
}

/// Spec §4.3 public contract: `generate(prompt, model, opts) -> GenResult`.
pub fn generate(prompt: &[u8], model: &Model, opts: &GenOpts) -> GenerateResult<GenResult> {
    opts.validate()?;

    let start = Instant::now();
    let smoother = KneserNeySmoother::new(model);
    let max_ctx = model.order().saturating_sub(1) as usize;

    let mut ids: Vec<TokenId> = mum_types::encode_bytes(prompt, &model.macro_units)
        .into_iter()
        .map(|t| t.id())
        .collect();

    let mut emitted: Vec<TokenId> = Vec::new();
    let mut out_bytes: Vec<u8> = Vec::new();
    let mut timed_out = false;
    let mut rng = AnyRng::from_seed(opts.seed);

    loop {
        if out_bytes.len() >= opts.max_tokens {
            break;
        }
        if let Some(budget) = opts.budget_ms {
            if start.elapsed().as_millis() as u64 >= budget {
                timed_out = true;
                break;
            }
        }

        let ctx_len = max_ctx.min(ids.len());
        let ctx = &ids[ids.len() - ctx_len..];
        let base_dist = smoother.distribution(ctx);

        let adjusted = apply_temperature(&base_dist, opts.temperature);
        let penalized = apply_repetition_penalty(
            &adjusted,
            &emitted,
            opts.repetition_penalty,
            opts.repetition_window,
        );
        let truncated = apply_top_k(&penalized, opts.top_k);

        let next = sample(&truncated, &base_dist, &mut rng);

        ids.push(next);
        emitted.push(next);
        let token = Token::from_id(next);
        match token {
            Token::Byte(b) => out_bytes.push(b),
            Token::Macro(macro_id) => {
                if let Some(mu) = model.macro_units.iter().find(|m| m.id == macro_id) {
                    out_bytes.extend_from_slice(&mu.bytes);
                }
            }
        }
    }

    let mut macro_units_used: Vec<u32> = emitted
        .iter()
        .filter_map(|&id| match Token::from_id(id) {
            Token::Macro(m) => Some(m),
            Token::Byte(_) => None,
        })
        .collect();
    macro_units_used.sort_unstable();
    macro_units_used.dedup();

    let compression_ratio = if out_bytes.is_empty() {
        0.0
    } else {
        emitted.len() as f64 / out_bytes.len() as f64
    };

    Ok(GenResult {
        bytes: out_bytes,
        emitted_tokens: emitted,
        timed_out,
        compression_ratio,
        macro_units_used,
    })
}

/// Spec §4.3 step 2: `logit <- log P / temperature`, converted back to a
/// probability distribution via softmax-style renormalisation. Clamps
/// `ln(0)` to a large negative finite value to avoid propagating `-inf`.
fn apply_temperature(dist: &HashMap<TokenId, f64>, temperature: f64) -> HashMap<TokenId, f64> {
    let mut logits: HashMap<TokenId, f64> = HashMap::with_capacity(dist.len());
    let mut max_logit = f64::NEG_INFINITY;
    for (&id, &p) in dist {
        let logit = p.max(f64::MIN_POSITIVE).ln() / temperature;
        logits.insert(id, logit);
        if logit > max_logit {
            max_logit = logit;
        }
    }
    let mut sum = 0.0;
    let mut out = HashMap::with_capacity(logits.len());
    for (id, logit) in logits {
        let e = (logit - max_logit).exp();
        sum += e;
        out.insert(id, e);
    }
    if sum > 0.0 {
        for p in out.values_mut() {
            *p /= sum;
        }
    }
    out
}

/// Spec §4.3 step 3: for each token id seen in the last `window` emitted
/// tokens, divide its mass by `penalty`, then renormalise.
fn apply_repetition_penalty(
    dist: &HashMap<TokenId, f64>,
    emitted: &[TokenId],
    penalty: f64,
    window: usize,
) -> HashMap<TokenId, f64> {
    if penalty <= 1.0 || emitted.is_empty() {
        return dist.clone();
    }
    let start = emitted.len().saturating_sub(window);
    let recent: std::collections::HashSet<TokenId> = emitted[start..].iter().copied().collect();

    let mut out: HashMap<TokenId, f64> = HashMap::with_capacity(dist.len());
    let mut sum = 0.0;
    for (&id, &p) in dist {
        let adjusted = if recent.contains(&id) { p / penalty } else { p };
        sum += adjusted;
        out.insert(id, adjusted);
    }
    if sum > 0.0 {
        for p in out.values_mut() {
            *p /= sum;
        }
    }
    out
}

/// Spec §4.3 step 4: keep only the `topK` highest-probability tokens.
/// `topK == 0` means "no truncation".
fn apply_top_k(dist: &HashMap<TokenId, f64>, top_k: usize) -> HashMap<TokenId, f64> {
    if top_k == 0 || top_k >= dist.len() {
        return dist.clone();
    }
    let mut ranked: Vec<(TokenId, f64)> = dist.iter().map(|(&id, &p)| (id, p)).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);
    let sum: f64 = ranked.iter().map(|(_, p)| p).sum();
    ranked
        .into_iter()
        .map(|(id, p)| (id, if sum > 0.0 { p / sum } else { p }))
        .collect()
}

/// Spec §4.3 step 5 + stop condition 3: sample from `dist`; if every mass
/// has been excluded by prior filtering, fall back to the lowest-ranked
/// token that still has positive mass in the unmodified base distribution.
fn sample(dist: &HashMap<TokenId, f64>, base_dist: &HashMap<TokenId, f64>, rng: &mut AnyRng) -> TokenId {
    let total: f64 = dist.values().sum();
    if total <= 0.0 {
        return base_dist
            .iter()
            .filter(|&(_, &p)| p > 0.0)
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(&id, _)| id)
            .unwrap_or(0);
    }

    let mut roll = rng.gen_unit() * total;
    let mut entries: Vec<(&TokenId, &f64)> = dist.iter().collect();
    entries.sort_by_key(|(&id, _)| id);
    for (&id, &p) in entries {
        if roll <= p {
            return id;
        }
        roll -= p;
    }
    entries_last_id(dist)
}

fn entries_last_id(dist: &HashMap<TokenId, f64>) -> TokenId {
    dist.keys().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mum_ngram::accumulate;

    fn trained_model() -> Model {
        accumulate(
            vec![b"Once upon a time there was a quiet village".to_vec(); 4],
            vec![],
            4,
        )
        .unwrap()
    }

    #[test]
    fn respects_max_tokens_byte_budget() {
        let model = trained_model();
        let opts = GenOpts {
            max_tokens: 16,
            ..Default::default()
        };
        let result = generate(b"Once", &model, &opts).unwrap();
        assert!(result.bytes.len() <= 16);
        assert!(!result.timed_out);
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let model = trained_model();
        let opts = GenOpts {
            max_tokens: 32,
            seed: Some(42),
            ..Default::default()
        };
        let a = generate(b"Once upon a time", &model, &opts).unwrap();
        let b = generate(b"Once upon a time", &model, &opts).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.emitted_tokens, b.emitted_tokens);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let model = trained_model();
        let opts = GenOpts {
            max_tokens: usize::MAX,
            budget_ms: Some(0),
            seed: Some(1),
            ..Default::default()
        };
        let result = generate(b"Once", &model, &opts).unwrap();
        assert!(result.timed_out);
    }

    #[test]
    fn rejects_nonpositive_temperature() {
        let model = trained_model();
        let opts = GenOpts {
            temperature: 0.0,
            ..Default::default()
        };
        assert!(generate(b"x", &model, &opts).is_err());
    }

    #[test]
    fn compression_ratio_is_tokens_over_bytes() {
        let model = trained_model();
        let opts = GenOpts {
            max_tokens: 24,
            seed: Some(7),
            ..Default::default()
        };
        let result = generate(b"Once", &model, &opts).unwrap();
        if !result.bytes.is_empty() {
            let expected = result.emitted_tokens.len() as f64 / result.bytes.len() as f64;
            assert!((result.compression_ratio - expected).abs() < 1e-12);
        }
    }
}
