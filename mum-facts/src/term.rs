//! `Term`: a tagged sum `Atom(AtomKind, Value) | Struct(Symbol,
//! OrderedMap<Name,Term>)` (spec §3, §9 design notes).
//!
//! `Struct` slots use a `BTreeMap` rather than an insertion-order map: its
//! iteration order is always the sorted key order, so purity with respect
//! to insertion order (spec §8 universal invariant 4) holds by construction
//! rather than needing a separate sort step.

use std::collections::BTreeMap;

use crate::canon::canonicalize_string;
use crate::error::{FactError, FactResult};
use crate::time_ref::TimeRef;
use crate::wire::{ByteReader, ByteWriter};

#[derive(Debug, Clone, PartialEq)]
pub enum AtomValue {
    Str(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Time(TimeRef),
    Entity(String),
    Symbol(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(AtomValue),
    Struct {
        name: String,
        slots: BTreeMap<String, Term>,
    },
}

impl Term {
    pub fn string_atom(s: impl Into<String>) -> Term {
        Term::Atom(AtomValue::Str(s.into()))
    }

    pub fn number_atom(n: f64) -> Term {
        Term::Atom(AtomValue::Number(n))
    }

    pub fn integer_atom(n: i64) -> Term {
        Term::Atom(AtomValue::Integer(n))
    }

    pub fn boolean_atom(b: bool) -> Term {
        Term::Atom(AtomValue::Boolean(b))
    }

    /// Canonicalised form used before hashing/encoding: string atom values
    /// are trimmed/case-folded/NFC-normalised; struct slot names are too,
    /// recursively.
    pub fn canonicalized(&self) -> Term {
        match self {
            Term::Atom(AtomValue::Str(s)) => Term::Atom(AtomValue::Str(canonicalize_string(s))),
            Term::Atom(other) => Term::Atom(other.clone()),
            Term::Struct { name, slots } => Term::Struct {
                name: canonicalize_string(name),
                slots: slots
                    .iter()
                    .map(|(k, v)| (canonicalize_string(k), v.canonicalized()))
                    .collect(),
            },
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        match self {
            Term::Atom(atom) => {
                w.write_u8(0x01);
                encode_atom(atom, w);
            }
            Term::Struct { name, slots } => {
                w.write_u8(0x02);
                w.write_string(name);
                w.write_u16(slots.len() as u16);
                for (slot_name, term) in slots {
                    w.write_string(slot_name);
                    term.encode(w);
                }
            }
        }
    }

    pub fn decode(r: &mut ByteReader) -> FactResult<Term> {
        match r.read_u8()? {
            0x01 => Ok(Term::Atom(decode_atom(r)?)),
            0x02 => {
                let name = r.read_string("struct.name")?;
                let count = r.read_u16()? as usize;
                let mut slots = BTreeMap::new();
                for _ in 0..count {
                    let slot_name = r.read_string("struct.slot.name")?;
                    let term = Term::decode(r)?;
                    slots.insert(slot_name, term);
                }
                Ok(Term::Struct { name, slots })
            }
            other => Err(FactError::UnknownDiscriminant {
                what: "term discriminator",
                value: other,
            }),
        }
    }

    /// Deterministic byte representation used only for content hashing
    /// (spec §3 fact_id). Distinct from the wire encoding so the hash
    /// input can stay stable even if the frame layout gains fields later.
    pub fn canonical_hash_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        self.canonicalized().encode(&mut w);
        w.into_bytes()
    }
}

const ATOM_STR: u8 = 0;
const ATOM_NUMBER: u8 = 1;
const ATOM_INTEGER: u8 = 2;
const ATOM_BOOLEAN: u8 = 3;
const ATOM_TIME: u8 = 4;
const ATOM_ENTITY: u8 = 5;
const ATOM_SYMBOL: u8 = 6;
const ATOM_NULL: u8 = 7;

fn encode_atom(atom: &AtomValue, w: &mut ByteWriter) {
    match atom {
        AtomValue::Str(s) => {
            w.write_u8(ATOM_STR);
            w.write_string(s);
        }
        AtomValue::Number(n) => {
            w.write_u8(ATOM_NUMBER);
            w.write_f64(*n);
        }
        AtomValue::Integer(n) => {
            w.write_u8(ATOM_INTEGER);
            w.write_i64(*n);
        }
        AtomValue::Boolean(b) => {
            w.write_u8(ATOM_BOOLEAN);
            w.write_u8(*b as u8);
        }
        AtomValue::Time(t) => {
            w.write_u8(ATOM_TIME);
            t.encode(w);
        }
        AtomValue::Entity(s) => {
            w.write_u8(ATOM_ENTITY);
            w.write_string(s);
        }
        AtomValue::Symbol(s) => {
            w.write_u8(ATOM_SYMBOL);
            w.write_string(s);
        }
        AtomValue::Null => {
            w.write_u8(ATOM_NULL);
        }
    }
}

fn decode_atom(r: &mut ByteReader) -> FactResult<AtomValue> {
    Ok(match r.read_u8()? {
        ATOM_STR => AtomValue::Str(r.read_string("atom.str")?),
        ATOM_NUMBER => AtomValue::Number(r.read_f64()?),
        ATOM_INTEGER => AtomValue::Integer(r.read_i64()?),
        ATOM_BOOLEAN => AtomValue::Boolean(r.read_u8()? != 0),
        ATOM_TIME => AtomValue::Time(TimeRef::decode(r)?),
        ATOM_ENTITY => AtomValue::Entity(r.read_string("atom.entity")?),
        ATOM_SYMBOL => AtomValue::Symbol(r.read_string("atom.symbol")?),
        ATOM_NULL => AtomValue::Null,
        other => {
            return Err(FactError::UnknownDiscriminant {
                what: "atom kind",
                value: other,
            })
        }
    })
}
