//! On-disk export shape (spec §4.5): a JSON document with contexts
//! rendered as delimiter-joined strings, since a `Vec<TokenId>` cannot be
//! used directly as a JSON object key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mum_types::{MacroUnit, Stats, TokenId};

pub const FORMAT_VERSION: u32 = 2;
const CONTEXT_DELIMITER: char = ',';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub version: u32,
    pub byte_vocab_size: u32,
    pub macro_units: Vec<MacroUnit>,
    pub ngrams: BTreeMap<String, ExportedNgramTable>,
    pub stats: Stats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportedNgramTable {
    pub order: u32,
    pub contexts: BTreeMap<String, BTreeMap<TokenId, u64>>,
}

/// `order_N` keys sort lexicographically, which only matches ascending
/// numeric order while `N` stays single-digit. `K` in practice is small
/// (spec §4.2 default range), so this is an accepted limitation rather
/// than a bug worth a custom sort key.
pub fn order_key(order: u32) -> String {
    format!("order_{order}")
}

pub fn context_key(context: &[TokenId]) -> String {
    context
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(&CONTEXT_DELIMITER.to_string())
}

pub fn parse_context_key(key: &str) -> Result<Vec<TokenId>, &'static str> {
    if key.is_empty() {
        return Ok(Vec::new());
    }
    key.split(CONTEXT_DELIMITER)
        .map(|part| part.parse::<TokenId>().map_err(|_| "non-numeric token id"))
        .collect()
}
