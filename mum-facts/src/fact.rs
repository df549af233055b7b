//! `Fact` (spec §3): a single piece of structured knowledge, identified by
//! a content hash over its predicate/arguments/qualifiers and carrying
//! non-identifying context (time, scope, confidence, provenance).

use std::collections::BTreeMap;

use crate::id::compute_fact_id;
use crate::polarity::Polarity;
use crate::provenance::ProvenanceLink;
use crate::term::Term;
use crate::time_ref::TimeRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub fact_id: [u8; 48],
    pub predicate: (String, String),
    pub arguments: BTreeMap<String, Term>,
    pub polarity: Polarity,
    pub scope_id: Vec<String>,
    pub time: Option<TimeRef>,
    pub confidence: Option<f64>,
    pub provenance: Vec<ProvenanceLink>,
    pub qualifiers: Option<BTreeMap<String, Term>>,
}

pub struct FactBuilder {
    predicate: (String, String),
    arguments: BTreeMap<String, Term>,
    polarity: Polarity,
    scope_id: Vec<String>,
    time: Option<TimeRef>,
    confidence: Option<f64>,
    provenance: Vec<ProvenanceLink>,
    qualifiers: Option<BTreeMap<String, Term>>,
}

impl FactBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        FactBuilder {
            predicate: (namespace.into(), name.into()),
            arguments: BTreeMap::new(),
            polarity: Polarity::Assert,
            scope_id: Vec::new(),
            time: None,
            confidence: None,
            provenance: Vec::new(),
            qualifiers: None,
        }
    }

    pub fn argument(mut self, name: impl Into<String>, term: Term) -> Self {
        self.arguments.insert(name.into(), term);
        self
    }

    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn scope(mut self, scope_id: Vec<String>) -> Self {
        self.scope_id = scope_id;
        self
    }

    pub fn time(mut self, time: TimeRef) -> Self {
        self.time = Some(time.normalized());
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn provenance(mut self, link: ProvenanceLink) -> Self {
        self.provenance.push(link);
        self
    }

    pub fn qualifier(mut self, name: impl Into<String>, term: Term) -> Self {
        self.qualifiers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), term);
        self
    }

    pub fn build(self) -> Fact {
        let fact_id = compute_fact_id(&self.predicate, &self.arguments, self.qualifiers.as_ref());
        Fact {
            fact_id,
            predicate: self.predicate,
            arguments: self.arguments,
            polarity: self.polarity,
            scope_id: self.scope_id,
            time: self.time,
            confidence: self.confidence,
            provenance: self.provenance,
            qualifiers: self.qualifiers,
        }
    }
}

impl Fact {
    /// True when the stored `fact_id` still matches the content it was
    /// derived from. Used after decode to catch tampered or stale frames.
    pub fn id_is_consistent(&self) -> bool {
        compute_fact_id(&self.predicate, &self.arguments, self.qualifiers.as_ref()) == self.fact_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_computes_consistent_fact_id() {
        let fact = FactBuilder::new("rel", "likes")
            .argument("subject", Term::string_atom("alice"))
            .argument("object", Term::string_atom("bob"))
            .confidence(0.9)
            .build();
        assert!(fact.id_is_consistent());
    }

    #[test]
    fn identity_ignores_time_scope_confidence_and_provenance() {
        let base = FactBuilder::new("rel", "likes")
            .argument("subject", Term::string_atom("alice"))
            .build();
        let decorated = FactBuilder::new("rel", "likes")
            .argument("subject", Term::string_atom("alice"))
            .confidence(0.5)
            .scope(vec!["doc-1".to_string()])
            .provenance(ProvenanceLink::new("dataset:wiki"))
            .time(TimeRef::Instant {
                at: 100,
                precision: crate::time_ref::Precision::Second,
            })
            .build();
        assert_eq!(base.fact_id, decorated.fact_id);
    }
}
