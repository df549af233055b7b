use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// spec §3 "Subsequence table": a mapping from a packed byte-sequence key
/// (the literal bytes, base-2^8 encoded — i.e. the `Vec<u8>` itself) to a
/// `u64` observation count.
///
/// Serialized keys are hex strings rather than raw bytes: JSON object keys
/// must be strings, and a `Vec<u8>` key is not one.
#[derive(Debug, Clone, Default)]
pub struct SubsequenceTable {
    entries: HashMap<Vec<u8>, u64>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

impl Serialize for SubsequenceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(&to_hex(key), count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubsequenceTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SubsequenceTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of hex-encoded byte sequences to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = HashMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    let bytes = from_hex(&key)
                        .ok_or_else(|| serde::de::Error::custom("invalid hex subsequence key"))?;
                    entries.insert(bytes, count);
                }
                Ok(SubsequenceTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl SubsequenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &[u8]) {
        self.entries
            .entry(key.to_vec())
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &[u8]) -> u64 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &u64)> {
        self.entries.iter()
    }

    /// Drop every entry whose count is `<= threshold`. Returns the number of
    /// entries dropped.
    pub fn prune_below_or_equal(&mut self, threshold: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, &mut count| count > threshold);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_get() {
        let mut t = SubsequenceTable::new();
        t.increment(b"ab");
        t.increment(b"ab");
        t.increment(b"cd");
        assert_eq!(t.get(b"ab"), 2);
        assert_eq!(t.get(b"cd"), 1);
        assert_eq!(t.get(b"zz"), 0);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn prune_drops_low_count_entries() {
        let mut t = SubsequenceTable::new();
        t.increment(b"ab");
        t.increment(b"ab");
        t.increment(b"ab");
        t.increment(b"cd");
        let dropped = t.prune_below_or_equal(1);
        assert_eq!(dropped, 1);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(b"ab"), 3);
        assert_eq!(t.get(b"cd"), 0);
    }

    #[test]
    fn serializes_to_hex_keyed_json_and_round_trips() {
        let mut t = SubsequenceTable::new();
        t.increment(b"ab");
        t.increment(&[0xff, 0x00]);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"6162\""));
        assert!(json.contains("\"ff00\""));
        let back: SubsequenceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(b"ab"), 1);
        assert_eq!(back.get(&[0xff, 0x00]), 1);
    }
}
