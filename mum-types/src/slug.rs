//! Deterministic slugging for dataset/model ids (spec §6).
//!
//! "Dataset ids and model ids are deterministic slugs derived from
//! parameters (sanitised by lowercasing, replacing non-alphanumerics with
//! `_`, truncating to 120 chars); the mapping is a pure function of those
//! parameters."

const MAX_SLUG_LEN: usize = 120;

/// Lowercase, map every non-alphanumeric ASCII byte to `_`, then truncate.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_SLUG_LEN));
    for c in raw.chars() {
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push('_');
        }
    }
    out
}

/// Builds a slug from an ordered list of `(key, value)` parameter pairs.
/// Callers must pass parts in a fixed, documented order (not hash-map
/// iteration order) so the result is a pure function of the parameters, not
/// of incidental ordering.
pub fn derive_id(parts: &[(&str, String)]) -> String {
    let joined = parts
        .iter()
        .map(|(k, v)| format!("{k}_{v}"))
        .collect::<Vec<_>>()
        .join("-");
    slugify(&joined)
}
