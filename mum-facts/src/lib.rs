//! Fact codec (spec §4.4): content-addressed facts and their binary frame.

mod canon;
mod codec;
mod error;
mod fact;
mod id;
mod polarity;
mod provenance;
mod term;
mod time_ref;
mod wire;

pub use codec::{decode, encode};
pub use error::{FactError, FactResult};
pub use fact::{Fact, FactBuilder};
pub use id::{compute_fact_id, fact_id_to_base64url};
pub use polarity::Polarity;
pub use provenance::ProvenanceLink;
pub use term::{AtomValue, Term};
pub use time_ref::{Precision, TimeRef};
