//! Export/import (spec §4.5): a `Model` round-trips through
//! [`ExportedModel`] either verbatim (`Full`) or with low-frequency
//! n-gram entries dropped (`Compact`). Independent of that choice,
//! `max_macro_units` and `max_orders` cap the exported dictionary and
//! n-gram order count.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use mum_types::{ContextCounts, MacroUnit, Model, NgramTable, TokenId};

use crate::error::{ExportError, ExportResult};
use crate::format::{context_key, order_key, parse_context_key, ExportedModel, ExportedNgramTable, FORMAT_VERSION};

#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Full,
    /// Drops `(context, token)` counts below `min_count`, then drops any
    /// context left with no surviving counts. Pruning is deterministic:
    /// given the same model and threshold, the output is byte-identical.
    Compact { min_count: u64 },
}

/// Spec §4.5 caps, orthogonal to the `Full`/`Compact` count-threshold
/// choice above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportCaps {
    /// Keeps only the `n` macro-units with the highest `mdl_score`, ties
    /// broken by ascending id (the order they were selected in).
    pub max_macro_units: Option<usize>,
    /// Drops any n-gram table whose order exceeds `n`.
    pub max_orders: Option<u32>,
}

pub fn export(model: &Model, format: ExportFormat, caps: ExportCaps) -> ExportedModel {
    let min_count = match format {
        ExportFormat::Full => 0,
        ExportFormat::Compact { min_count } => min_count,
    };

    let kept_macro_units = select_kept_macro_units(&model.macro_units, caps.max_macro_units);
    let kept_ids: HashSet<u32> = kept_macro_units.iter().map(|mu| mu.id).collect();
    let token_kept = |id: TokenId| id < model.byte_vocab_size || kept_ids.contains(&(id - model.byte_vocab_size));

    let mut ngrams = BTreeMap::new();
    let mut dropped_contexts = 0u64;
    let mut dropped_counts = 0u64;
    let mut dropped_orders = 0u64;

    for table in &model.ngrams {
        if let Some(max_orders) = caps.max_orders {
            if table.order > max_orders {
                dropped_orders += 1;
                continue;
            }
        }

        let mut contexts = BTreeMap::new();
        for (context, counts) in &table.contexts {
            if context.iter().any(|&id| !token_kept(id)) {
                dropped_contexts += 1;
                continue;
            }
            let kept: BTreeMap<_, _> = counts
                .counts
                .iter()
                .filter(|&(&id, &c)| c >= min_count && token_kept(id))
                .map(|(&id, &c)| (id, c))
                .collect();
            if kept.is_empty() {
                dropped_contexts += 1;
                continue;
            }
            dropped_counts += (counts.counts.len() - kept.len()) as u64;
            contexts.insert(context_key(context), kept);
        }
        ngrams.insert(
            order_key(table.order),
            ExportedNgramTable {
                order: table.order,
                contexts,
            },
        );
    }

    if dropped_contexts > 0 || dropped_counts > 0 || dropped_orders > 0 {
        debug!(dropped_contexts, dropped_counts, dropped_orders, "export pruned entries");
    }

    ExportedModel {
        version: FORMAT_VERSION,
        byte_vocab_size: model.byte_vocab_size,
        macro_units: kept_macro_units,
        ngrams,
        stats: model.stats.clone(),
    }
}

/// Spec §4.5 "cap macro-units at `max_macro_units`, keeping the highest
/// MDL score". Ids are left untouched (not renumbered) since lookups
/// elsewhere (`decode_tokens`, generation) search by id rather than index.
fn select_kept_macro_units(macro_units: &[MacroUnit], max_macro_units: Option<usize>) -> Vec<MacroUnit> {
    let Some(cap) = max_macro_units else {
        return macro_units.to_vec();
    };
    if macro_units.len() <= cap {
        return macro_units.to_vec();
    }
    let mut ranked: Vec<&MacroUnit> = macro_units.iter().collect();
    ranked.sort_by(|a, b| {
        b.mdl_score
            .partial_cmp(&a.mdl_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(cap);
    ranked.into_iter().cloned().collect()
}

pub fn to_json(exported: &ExportedModel) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(exported)?)
}

pub fn from_json(json: &str) -> ExportResult<ExportedModel> {
    let exported: ExportedModel = serde_json::from_str(json)?;
    if exported.version != FORMAT_VERSION {
        return Err(ExportError::UnsupportedVersion {
            found: exported.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(exported)
}

pub fn to_model(exported: ExportedModel) -> ExportResult<Model> {
    let order = exported.ngrams.len() as u32;
    let mut ngrams = vec![NgramTable::default(); order as usize];
    for table in exported.ngrams.values() {
        if table.order == 0 || table.order > order {
            return Err(ExportError::MalformedContext {
                key: order_key(table.order),
                reason: "order outside [1, table count]",
            });
        }
        let mut out = NgramTable::new(table.order);
        for (key, counts) in &table.contexts {
            let context = parse_context_key(key).map_err(|reason| ExportError::MalformedContext {
                key: key.clone(),
                reason,
            })?;
            out.contexts.insert(
                context,
                ContextCounts {
                    counts: counts.iter().map(|(&k, &v)| (k, v)).collect(),
                },
            );
        }
        ngrams[(table.order - 1) as usize] = out;
    }

    Ok(Model {
        byte_vocab_size: exported.byte_vocab_size,
        macro_units: exported.macro_units,
        ngrams,
        stats: exported.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mum_types::TokenId;

    fn sample_model() -> Model {
        let mut model = Model::empty(2);
        model.ngrams[0].record(vec![], 5);
        model.ngrams[0].record(vec![], 5);
        model.ngrams[0].record(vec![], 6);
        model.ngrams[1].record(vec![5], 6);
        model
    }

    #[test]
    fn full_export_round_trips_exactly() {
        let model = sample_model();
        let exported = export(&model, ExportFormat::Full, ExportCaps::default());
        let json = to_json(&exported).unwrap();
        let reparsed = from_json(&json).unwrap();
        let rebuilt = to_model(reparsed).unwrap();

        assert_eq!(rebuilt.order(), model.order());
        let ctx: Vec<TokenId> = vec![];
        assert_eq!(
            rebuilt.ngrams[0].contexts[&ctx].counts[&5],
            model.ngrams[0].contexts[&ctx].counts[&5]
        );
    }

    #[test]
    fn compact_export_drops_entries_below_threshold() {
        let model = sample_model();
        let exported = export(&model, ExportFormat::Compact { min_count: 2 }, ExportCaps::default());
        let table = &exported.ngrams[&order_key(1)];
        let ctx_key = context_key(&[]);
        let counts = &table.contexts[&ctx_key];
        assert!(counts.contains_key(&5));
        assert!(!counts.contains_key(&6));
    }

    #[test]
    fn max_macro_units_keeps_the_highest_mdl_scores() {
        let mut model = Model::empty(1);
        model.macro_units = vec![
            MacroUnit::new(0, vec![b'a'], 10, 1.0, 1, 8, 1).unwrap(),
            MacroUnit::new(1, vec![b'b'], 10, 3.0, 1, 8, 1).unwrap(),
            MacroUnit::new(2, vec![b'c'], 10, 2.0, 1, 8, 1).unwrap(),
        ];
        let caps = ExportCaps {
            max_macro_units: Some(2),
            max_orders: None,
        };
        let exported = export(&model, ExportFormat::Full, caps);
        let ids: Vec<u32> = exported.macro_units.iter().map(|mu| mu.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn max_orders_drops_higher_order_tables_and_their_references() {
        let mut model = Model::empty(2);
        model.ngrams[0].record(vec![], 5);
        model.ngrams[1].record(vec![5], 9);
        let caps = ExportCaps {
            max_macro_units: None,
            max_orders: Some(1),
        };
        let exported = export(&model, ExportFormat::Full, caps);
        assert_eq!(exported.ngrams.len(), 1);
        assert!(exported.ngrams.contains_key(&order_key(1)));
    }

    #[test]
    fn dropped_macro_units_take_their_ngram_references_with_them() {
        let mut model = Model::empty(2);
        model.macro_units = vec![
            MacroUnit::new(0, vec![b'a'], 10, 1.0, 1, 8, 1).unwrap(),
            MacroUnit::new(1, vec![b'b'], 10, 5.0, 1, 8, 1).unwrap(),
        ];
        let macro_token_0 = model.byte_vocab_size;
        let macro_token_1 = model.byte_vocab_size + 1;
        model.ngrams[0].record(vec![], macro_token_0);
        model.ngrams[0].record(vec![], macro_token_1);
        model.ngrams[1].record(vec![macro_token_0], 5);

        let caps = ExportCaps {
            max_macro_units: Some(1),
            max_orders: None,
        };
        let exported = export(&model, ExportFormat::Full, caps);
        assert_eq!(exported.macro_units.len(), 1);
        assert_eq!(exported.macro_units[0].id, 1);

        let order1 = &exported.ngrams[&order_key(1)];
        let ctx_key = context_key(&[]);
        let counts = &order1.contexts[&ctx_key];
        assert!(!counts.contains_key(&macro_token_0));
        assert!(counts.contains_key(&macro_token_1));

        assert!(!exported.ngrams.contains_key(&order_key(2)) || !exported.ngrams[&order_key(2)].contexts.contains_key(&context_key(&[macro_token_0])));
    }

    #[test]
    fn rejects_unsupported_version() {
        let bad = r#"{"version":1,"byte_vocab_size":256,"macro_units":[],"ngrams":{},"stats":{"seq_count":0,"byte_count":0,"macro_unit_count":0,"token_count":0,"distinct_contexts":[]}}"#;
        assert!(matches!(
            from_json(bad),
            Err(ExportError::UnsupportedVersion { found: 1, expected: 2 })
        ));
    }

    #[test]
    fn compact_export_is_deterministic_across_runs() {
        let model = sample_model();
        let a = to_json(&export(&model, ExportFormat::Compact { min_count: 2 }, ExportCaps::default())).unwrap();
        let b = to_json(&export(&model, ExportFormat::Compact { min_count: 2 }, ExportCaps::default())).unwrap();
        assert_eq!(a, b);
    }
}
