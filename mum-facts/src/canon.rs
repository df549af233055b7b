//! Canonicalisation profile (spec §4.4 "Canonicalisation before
//! hashing/encoding"): trim, case-fold, NFC-normalise.

use unicode_normalization::UnicodeNormalization;

pub fn canonicalize_string(s: &str) -> String {
    s.trim().nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(canonicalize_string("  Alice "), "alice");
        assert_eq!(canonicalize_string("Alice"), "alice");
    }

    #[test]
    fn nfc_normalises_combining_sequences() {
        // "e" + combining acute vs precomposed "é" should canonicalize
        // identically.
        let decomposed = "e\u{0301}";
        let precomposed = "\u{00e9}";
        assert_eq!(
            canonicalize_string(decomposed),
            canonicalize_string(precomposed)
        );
    }
}
