//! `ProvenanceLink` (spec §3): a pointer from a fact back to the source
//! that justified it. The spec leaves the exact payload shape open; we
//! carry a source identifier plus an optional free-form detail string,
//! the minimal pair any provenance consumer needs to locate and describe
//! the originating record.

use crate::error::FactError;
use crate::wire::{ByteReader, ByteWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceLink {
    pub source: String,
    pub detail: Option<String>,
}

impl ProvenanceLink {
    pub fn new(source: impl Into<String>) -> Self {
        ProvenanceLink {
            source: source.into(),
            detail: None,
        }
    }

    pub fn with_detail(source: impl Into<String>, detail: impl Into<String>) -> Self {
        ProvenanceLink {
            source: source.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        w.write_string(&self.source);
        w.write_u8(self.detail.is_some() as u8);
        if let Some(d) = &self.detail {
            w.write_string(d);
        }
    }

    pub fn decode(r: &mut ByteReader) -> Result<Self, FactError> {
        let source = r.read_string("provenance.source")?;
        let has_detail = r.read_u8()? != 0;
        let detail = if has_detail {
            Some(r.read_string("provenance.detail")?)
        } else {
            None
        };
        Ok(ProvenanceLink { source, detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_and_without_detail() {
        for link in [
            ProvenanceLink::new("dataset:wiki"),
            ProvenanceLink::with_detail("dataset:wiki", "page 42"),
        ] {
            let mut w = ByteWriter::new();
            link.encode(&mut w);
            let bytes = w.into_bytes();
            let mut r = ByteReader::new(&bytes);
            assert_eq!(ProvenanceLink::decode(&mut r).unwrap(), link);
        }
    }
}
