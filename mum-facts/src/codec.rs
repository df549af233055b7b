//! Binary frame for a single fact (spec §4.4): magic, version, flags,
//! fact_id, predicate, arguments, polarity, scope path, optional time_ref,
//! optional confidence, provenance, qualifiers, trailing CRC32.

use std::collections::BTreeMap;

use crate::error::{FactError, FactResult};
use crate::fact::Fact;
use crate::id::compute_fact_id;
use crate::polarity::Polarity;
use crate::provenance::ProvenanceLink;
use crate::term::Term;
use crate::time_ref::TimeRef;
use crate::wire::{ByteReader, ByteWriter};

const MAGIC: &[u8; 4] = b"FACT";
const VERSION: u16 = 1;

const FLAG_HAS_TIME: u16 = 0x0001;
const FLAG_HAS_CONFIDENCE: u16 = 0x0002;
const FLAG_HAS_QUALIFIERS: u16 = 0x0004;

/// spec §4.4 `pred_string`: `namespace:name` as a single field. The
/// namespace is assumed free of `:`; the name may contain one since we only
/// split on the first occurrence.
const PREDICATE_DELIMITER: char = ':';
/// spec §4.4 `scope_path`: `/`-joined scope segments as a single field.
const SCOPE_PATH_DELIMITER: &str = "/";

fn encode_predicate(predicate: &(String, String)) -> String {
    format!("{}{PREDICATE_DELIMITER}{}", predicate.0, predicate.1)
}

fn decode_predicate(pred_string: &str) -> FactResult<(String, String)> {
    pred_string
        .split_once(PREDICATE_DELIMITER)
        .map(|(namespace, name)| (namespace.to_string(), name.to_string()))
        .ok_or(FactError::MalformedField {
            field: "pred_string",
            reason: "missing ':' separating namespace from name",
        })
}

fn decode_scope_path(scope_path: &str) -> Vec<String> {
    if scope_path.is_empty() {
        Vec::new()
    } else {
        scope_path.split(SCOPE_PATH_DELIMITER).map(String::from).collect()
    }
}

pub fn encode(fact: &Fact) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_raw(MAGIC);
    w.write_u16(VERSION);

    let mut flags = 0u16;
    if fact.time.is_some() {
        flags |= FLAG_HAS_TIME;
    }
    if fact.confidence.is_some() {
        flags |= FLAG_HAS_CONFIDENCE;
    }
    if fact.qualifiers.is_some() {
        flags |= FLAG_HAS_QUALIFIERS;
    }
    w.write_u16(flags);

    w.write_raw(&fact.fact_id);

    w.write_string(&encode_predicate(&fact.predicate));

    write_terms(&mut w, &fact.arguments);

    w.write_u8(fact.polarity.code());

    w.write_string(&fact.scope_id.join(SCOPE_PATH_DELIMITER));

    if let Some(time) = &fact.time {
        time.encode(&mut w);
    }
    if let Some(confidence) = fact.confidence {
        w.write_f64(confidence);
    }

    w.write_u16(fact.provenance.len() as u16);
    for link in &fact.provenance {
        link.encode(&mut w);
    }

    if let Some(qualifiers) = &fact.qualifiers {
        write_terms(&mut w, qualifiers);
    }

    let body = w.into_bytes();
    let crc = crc32fast::hash(&body);
    let mut framed = body;
    framed.extend_from_slice(&crc.to_le_bytes());
    framed
}

pub fn decode(bytes: &[u8]) -> FactResult<Fact> {
    if bytes.len() < 4 {
        return Err(FactError::Truncated {
            needed: 4,
            available: bytes.len(),
        });
    }
    let crc_offset = bytes.len().checked_sub(4).ok_or(FactError::Truncated {
        needed: 4,
        available: bytes.len(),
    })?;
    let (body, crc_bytes) = bytes.split_at(crc_offset);
    let stored_crc = u32::from_le_bytes(crc_bytes.try_into().unwrap());
    if crc32fast::hash(body) != stored_crc {
        return Err(FactError::CrcMismatch);
    }

    let mut r = ByteReader::new(body);

    let magic = r.read_raw(4)?;
    if magic != MAGIC {
        return Err(FactError::BadMagic);
    }
    let version = r.read_u16()?;
    if version != VERSION {
        return Err(FactError::UnsupportedVersion(version));
    }
    let flags = r.read_u16()?;

    let fact_id_bytes = r.read_raw(48)?;
    let mut fact_id = [0u8; 48];
    fact_id.copy_from_slice(fact_id_bytes);

    let predicate = decode_predicate(&r.read_string("pred_string")?)?;

    let arguments = read_terms(&mut r)?;

    let polarity = Polarity::from_code(r.read_u8()?)?;

    let scope_id = decode_scope_path(&r.read_string("scope_path")?);

    let time = if flags & FLAG_HAS_TIME != 0 {
        Some(TimeRef::decode(&mut r)?)
    } else {
        None
    };

    let confidence = if flags & FLAG_HAS_CONFIDENCE != 0 {
        Some(r.read_f64()?)
    } else {
        None
    };

    let provenance_len = r.read_u16()? as usize;
    let mut provenance = Vec::with_capacity(provenance_len);
    for _ in 0..provenance_len {
        provenance.push(ProvenanceLink::decode(&mut r)?);
    }

    let qualifiers = if flags & FLAG_HAS_QUALIFIERS != 0 {
        Some(read_terms(&mut r)?)
    } else {
        None
    };

    let fact = Fact {
        fact_id,
        predicate,
        arguments,
        polarity,
        scope_id,
        time,
        confidence,
        provenance,
        qualifiers,
    };

    if compute_fact_id(&fact.predicate, &fact.arguments, fact.qualifiers.as_ref()) != fact.fact_id
    {
        return Err(FactError::FactIdMismatch);
    }

    Ok(fact)
}

fn write_terms(w: &mut ByteWriter, terms: &BTreeMap<String, Term>) {
    w.write_u16(terms.len() as u16);
    for (name, term) in terms {
        w.write_string(name);
        term.encode(w);
    }
}

fn read_terms(r: &mut ByteReader) -> FactResult<BTreeMap<String, Term>> {
    let count = r.read_u16()? as usize;
    let mut out = BTreeMap::new();
    for _ in 0..count {
        let name = r.read_string("term.name")?;
        let term = Term::decode(r)?;
        out.insert(name, term);
    }
    Ok(out)
}
