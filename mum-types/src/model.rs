//! The n-gram context table and the top-level `Model` (spec §3).

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::macro_unit::MacroUnit;
use crate::token::TokenId;

/// Per-context counts for a single n-gram order. Kneser-Ney's "distinct
/// continuation" auxiliary (spec §3) is derived from `counts.len()` rather
/// than stored redundantly, since the two are definitionally equal: the
/// number of distinct tokens observed to follow a context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextCounts {
    pub counts: HashMap<TokenId, u64>,
}

impl ContextCounts {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn distinct_continuations(&self) -> u64 {
        self.counts.len() as u64
    }
}

/// Order-`n` table: context (the preceding `n-1` token ids) to the counts
/// of what followed it.
///
/// Serializes `contexts` with comma-joined decimal context keys rather than
/// the raw `Vec<TokenId>`: JSON object keys must be strings, and a model can
/// reach `serde_json` both through a checkpoint (spec §4.6) and through
/// export (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct NgramTable {
    pub order: u32,
    pub contexts: HashMap<Vec<TokenId>, ContextCounts>,
}

fn context_key(ctx: &[TokenId]) -> String {
    ctx.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn parse_context_key(key: &str) -> Result<Vec<TokenId>, String> {
    if key.is_empty() {
        return Ok(Vec::new());
    }
    key.split(',')
        .map(|part| {
            part.parse::<TokenId>()
                .map_err(|_| format!("invalid token id in context key: {part}"))
        })
        .collect()
}

impl Serialize for NgramTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("order", &self.order)?;
        let contexts: HashMap<String, &ContextCounts> =
            self.contexts.iter().map(|(ctx, counts)| (context_key(ctx), counts)).collect();
        map.serialize_entry("contexts", &contexts)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for NgramTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            order: u32,
            contexts: HashMap<String, ContextCounts>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut contexts = HashMap::with_capacity(raw.contexts.len());
        for (key, counts) in raw.contexts {
            let ctx = parse_context_key(&key).map_err(serde::de::Error::custom)?;
            contexts.insert(ctx, counts);
        }
        Ok(NgramTable { order: raw.order, contexts })
    }
}

impl NgramTable {
    pub fn new(order: u32) -> Self {
        NgramTable {
            order,
            contexts: HashMap::new(),
        }
    }

    pub fn record(&mut self, context: Vec<TokenId>, token: TokenId) {
        self.contexts
            .entry(context)
            .or_default()
            .counts
            .entry(token)
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub seq_count: u64,
    pub byte_count: u64,
    pub macro_unit_count: u32,
    pub token_count: u64,
    pub distinct_contexts: Vec<u64>,
}

/// The trained model: macro-unit dictionary plus `K` orders of n-gram
/// tables over the mixed vocabulary (spec §3 "Model").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub byte_vocab_size: u32,
    pub macro_units: Vec<MacroUnit>,
    pub ngrams: Vec<NgramTable>,
    pub stats: Stats,
}

impl Model {
    pub fn empty(k: u32) -> Self {
        Model {
            byte_vocab_size: crate::token::BYTE_VOCAB_SIZE,
            macro_units: Vec::new(),
            ngrams: (1..=k).map(NgramTable::new).collect(),
            stats: Stats {
                distinct_contexts: vec![0; k as usize],
                ..Default::default()
            },
        }
    }

    pub fn order(&self) -> u32 {
        self.ngrams.len() as u32
    }

    /// Spec §3 invariant: every token id referenced in any n-gram table is
    /// either a byte in `[0,256)` or refers to an element of `macro_units`.
    pub fn vocab_is_consistent(&self) -> bool {
        let max_macro_id = self.macro_units.iter().map(|m| m.id).max();
        for table in &self.ngrams {
            for (ctx, counts) in &table.contexts {
                for &id in ctx.iter().chain(counts.counts.keys()) {
                    if id >= self.byte_vocab_size {
                        let macro_idx = id - self.byte_vocab_size;
                        match max_macro_id {
                            Some(max_id) if macro_idx <= max_id => {}
                            _ => return false,
                        }
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_has_k_tables_and_consistent_vocab() {
        let model = Model::empty(3);
        assert_eq!(model.order(), 3);
        assert!(model.vocab_is_consistent());
    }

    #[test]
    fn ngram_table_serializes_with_string_context_keys_and_round_trips() {
        let mut table = NgramTable::new(2);
        table.record(vec![b'a' as TokenId], b'b' as TokenId);
        table.record(vec![], b'a' as TokenId);

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"97\""), "expected decimal context key, got {json}");
        assert!(json.contains("\"\""), "expected empty-context key, got {json}");

        let back: NgramTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.order, 2);
        assert_eq!(back.contexts.get(&vec![b'a' as TokenId]).unwrap().counts.get(&(b'b' as TokenId)), Some(&1));
        assert_eq!(back.contexts.get(&Vec::<TokenId>::new()).unwrap().counts.get(&(b'a' as TokenId)), Some(&1));
    }
}
