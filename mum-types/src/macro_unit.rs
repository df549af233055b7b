//! `MacroUnit` (spec §3): a variable-length byte pattern selected by MDL.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroUnit {
    pub id: u32,
    pub bytes: Vec<u8>,
    pub count: u64,
    pub mdl_score: f64,
    pub length: u32,
}

impl MacroUnit {
    /// Enforces `length == bytes.len()`, `minLen <= length <= maxLen`, and
    /// `count >= minFrequency` at the point of creation (the point at which
    /// they become immutable for the lifetime of the model, per spec §3).
    pub fn new(
        id: u32,
        bytes: Vec<u8>,
        count: u64,
        mdl_score: f64,
        min_len: u32,
        max_len: u32,
        min_frequency: u64,
    ) -> Result<Self, CoreError> {
        let length = bytes.len() as u32;
        if length < min_len || length > max_len {
            return Err(CoreError::Content(format!(
                "macro-unit length {length} outside [{min_len}, {max_len}]"
            )));
        }
        if count < min_frequency {
            return Err(CoreError::Content(format!(
                "macro-unit count {count} below minFrequency {min_frequency}"
            )));
        }
        Ok(MacroUnit {
            id,
            bytes,
            count,
            mdl_score,
            length,
        })
    }
}

/// Greedy longest-match segmentation against a macro-unit dictionary,
/// shared by C2's accumulator and C3's prompt encoder (spec §4.2
/// "Encoding").
///
/// Ties among equal-length matches break by lower macro-unit id, i.e. the
/// earlier MDL-selection order — `dict` is assumed to already be sorted by
/// ascending `id` when this matters, which is how [`select_dense_ids`]
/// leaves it.
pub fn encode_bytes(bytes: &[u8], dict: &[MacroUnit]) -> Vec<crate::token::Token> {
    use crate::token::Token;

    // Index candidate macro-units by their first byte so each position only
    // scans patterns that could possibly match, then picks the longest
    // (ties: lowest id) among those that do.
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let mut best: Option<&MacroUnit> = None;
        for mu in dict {
            if mu.bytes.is_empty() {
                continue;
            }
            if i + mu.bytes.len() > bytes.len() {
                continue;
            }
            if &bytes[i..i + mu.bytes.len()] != mu.bytes.as_slice() {
                continue;
            }
            best = match best {
                None => Some(mu),
                Some(cur) if mu.bytes.len() > cur.bytes.len() => Some(mu),
                Some(cur) if mu.bytes.len() == cur.bytes.len() && mu.id < cur.id => Some(mu),
                Some(cur) => Some(cur),
            };
        }
        match best {
            Some(mu) => {
                out.push(Token::Macro(mu.id));
                i += mu.bytes.len();
            }
            None => {
                out.push(Token::Byte(bytes[i]));
                i += 1;
            }
        }
    }
    out
}

/// Inverse of [`encode_bytes`]: reproduces the original bytes exactly
/// (spec §8 universal invariant 1).
pub fn decode_tokens(tokens: &[crate::token::Token], dict: &[MacroUnit]) -> Vec<u8> {
    use crate::token::Token;

    let mut out = Vec::new();
    for tok in tokens {
        match *tok {
            Token::Byte(b) => out.push(b),
            Token::Macro(id) => {
                if let Some(mu) = dict.iter().find(|m| m.id == id) {
                    out.extend_from_slice(&mu.bytes);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mu(id: u32, bytes: &[u8], count: u64) -> MacroUnit {
        MacroUnit::new(id, bytes.to_vec(), count, 0.0, 1, 8, 1).unwrap()
    }

    #[test]
    fn rejects_length_outside_range() {
        assert!(MacroUnit::new(0, vec![1, 2, 3], 5, 0.0, 4, 8, 1).is_err());
    }

    #[test]
    fn rejects_count_below_min_frequency() {
        assert!(MacroUnit::new(0, vec![1, 2], 1, 0.0, 1, 8, 5).is_err());
    }

    #[test]
    fn encode_decode_round_trip_with_empty_dict() {
        let s = b"hello world";
        let encoded = encode_bytes(s, &[]);
        assert_eq!(encoded.len(), s.len());
        assert_eq!(decode_tokens(&encoded, &[]), s);
    }

    #[test]
    fn encode_prefers_longest_match_ties_broken_by_id() {
        let dict = vec![mu(1, b"ab", 2), mu(0, b"abc", 2)];
        let encoded = encode_bytes(b"abcabc", &dict);
        assert_eq!(encoded, vec![crate::token::Token::Macro(0); 2]);
        assert_eq!(decode_tokens(&encoded, &dict), b"abcabc");
    }

    #[test]
    fn round_trips_for_arbitrary_mixed_input() {
        let dict = vec![mu(0, b"the ", 10), mu(1, b"ing", 5)];
        let s = b"the cat is running the dog is sitting";
        let encoded = encode_bytes(s, &dict);
        assert_eq!(decode_tokens(&encoded, &dict), s);
    }
}
