//! Content-addressed fact ids (spec §3, §4.4): a 48-byte id built from three
//! truncated SHA-256 segments over predicate, arguments, and qualifiers.
//! Per the canonical rule in spec §3, `time`, `scope_id`, `confidence`, and
//! `provenance` never participate in the hash — two facts that differ only
//! in when/where/how-confidently they were observed are the same fact.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::canon::canonicalize_string;
use crate::term::Term;

const SEGMENT_LEN: usize = 16;

fn truncated_sha256(bytes: &[u8]) -> [u8; SEGMENT_LEN] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; SEGMENT_LEN];
    out.copy_from_slice(&digest[..SEGMENT_LEN]);
    out
}

fn hash_predicate(predicate: &(String, String)) -> [u8; SEGMENT_LEN] {
    let namespace = canonicalize_string(&predicate.0);
    let name = canonicalize_string(&predicate.1);
    let mut bytes = Vec::with_capacity(namespace.len() + name.len() + 1);
    bytes.extend_from_slice(namespace.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(name.as_bytes());
    truncated_sha256(&bytes)
}

fn hash_terms(terms: &BTreeMap<String, Term>) -> [u8; SEGMENT_LEN] {
    let mut bytes = Vec::new();
    for (key, term) in terms {
        let canonical_key = canonicalize_string(key);
        bytes.extend_from_slice(&(canonical_key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(canonical_key.as_bytes());
        let term_bytes = term.canonical_hash_bytes();
        bytes.extend_from_slice(&(term_bytes.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&term_bytes);
    }
    truncated_sha256(&bytes)
}

/// `arguments` and `qualifiers` are `BTreeMap`s, so the byte representation
/// built by `hash_terms` already iterates keys in sorted order regardless
/// of the order callers inserted them in (spec §8 universal invariant 4).
pub fn compute_fact_id(
    predicate: &(String, String),
    arguments: &BTreeMap<String, Term>,
    qualifiers: Option<&BTreeMap<String, Term>>,
) -> [u8; 48] {
    let predicate_segment = hash_predicate(predicate);
    let arguments_segment = hash_terms(arguments);
    let empty = BTreeMap::new();
    let qualifiers_segment = hash_terms(qualifiers.unwrap_or(&empty));

    let mut out = [0u8; 48];
    out[0..16].copy_from_slice(&predicate_segment);
    out[16..32].copy_from_slice(&arguments_segment);
    out[32..48].copy_from_slice(&qualifiers_segment);
    out
}

pub fn fact_id_to_base64url(id: &[u8; 48]) -> String {
    URL_SAFE_NO_PAD.encode(id)
}
