//! Shared data model and error taxonomy for the macro-unit model pipeline.
//!
//! This crate owns the types every other crate in the workspace builds on:
//! the mixed byte/macro-unit vocabulary ([`token`]), the macro-unit
//! dictionary entry ([`macro_unit`]), the trained [`model::Model`], the
//! shared error taxonomy ([`error`]), and the on-disk layout conventions
//! ([`cache`], [`slug`]).

pub mod cache;
pub mod error;
pub mod macro_unit;
pub mod model;
pub mod slug;
pub mod token;

pub use cache::{CacheLayout, ExistingDir};
pub use error::{CoreError, CoreResult};
pub use macro_unit::{decode_tokens, encode_bytes, MacroUnit};
pub use model::{ContextCounts, Model, NgramTable, Stats};
pub use slug::{derive_id, slugify};
pub use token::{Token, TokenId, BYTE_VOCAB_SIZE};
